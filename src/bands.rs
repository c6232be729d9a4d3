//! The fixed six-band split used to color the waveform.

use crate::foundation::core::Rgb8;

/// Number of frequency bands. Part of the rendering contract, not configurable.
pub const BAND_COUNT: usize = 6;

/// Frequencies at or above this are treated as open-ended (no lowpass).
pub const TOP_OF_RANGE_HZ: u32 = 20_000;

/// One of the six frequency bands, ordered low to high.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    Sub,
    Bass,
    LowMid,
    Mid,
    HighMid,
    High,
}

impl Band {
    /// All bands in ascending frequency order.
    pub const ALL: [Band; BAND_COUNT] = [
        Band::Sub,
        Band::Bass,
        Band::LowMid,
        Band::Mid,
        Band::HighMid,
        Band::High,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short identifier, also used for scratch file names and CLI flags.
    pub fn name(self) -> &'static str {
        match self {
            Band::Sub => "sub",
            Band::Bass => "bass",
            Band::LowMid => "lowmid",
            Band::Mid => "mid",
            Band::HighMid => "highmid",
            Band::High => "high",
        }
    }

    pub fn spec(self) -> &'static BandSpec {
        &BANDS[self.index()]
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Frequency range `[low_hz, high_hz)` and display color of a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandSpec {
    pub band: Band,
    pub low_hz: u32,
    pub high_hz: u32,
    pub color: Rgb8,
}

impl BandSpec {
    /// ffmpeg `-af` filter chain isolating this band.
    ///
    /// The lowest band is a plain lowpass and the top band a plain highpass.
    pub fn ffmpeg_filter(&self) -> String {
        if self.low_hz == 0 {
            format!("lowpass=f={}", self.high_hz)
        } else if self.high_hz >= TOP_OF_RANGE_HZ {
            format!("highpass=f={}", self.low_hz)
        } else {
            format!("highpass=f={},lowpass=f={}", self.low_hz, self.high_hz)
        }
    }
}

/// The band table, blue through cyan to near-white.
pub const BANDS: [BandSpec; BAND_COUNT] = [
    BandSpec {
        band: Band::Sub,
        low_hz: 0,
        high_hz: 60,
        color: Rgb8::new(20, 60, 140),
    },
    BandSpec {
        band: Band::Bass,
        low_hz: 60,
        high_hz: 250,
        color: Rgb8::new(30, 100, 180),
    },
    BandSpec {
        band: Band::LowMid,
        low_hz: 250,
        high_hz: 500,
        color: Rgb8::new(50, 140, 210),
    },
    BandSpec {
        band: Band::Mid,
        low_hz: 500,
        high_hz: 2000,
        color: Rgb8::new(70, 180, 230),
    },
    BandSpec {
        band: Band::HighMid,
        low_hz: 2000,
        high_hz: 6000,
        color: Rgb8::new(120, 210, 250),
    },
    BandSpec {
        band: Band::High,
        low_hz: 6000,
        high_hz: TOP_OF_RANGE_HZ,
        color: Rgb8::new(200, 240, 255),
    },
];

/// A value per band, indexed by [`Band`].
#[derive(Clone, Debug, PartialEq)]
pub struct BandSet<T>(pub [T; BAND_COUNT]);

impl<T> BandSet<T> {
    /// Build a set by evaluating `f` once per band, in band order.
    pub fn from_fn(mut f: impl FnMut(Band) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Band::ALL[i])))
    }

    /// Like [`BandSet::from_fn`], stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Band) -> Result<T, E>) -> Result<Self, E> {
        let mut out = Vec::with_capacity(BAND_COUNT);
        for band in Band::ALL {
            out.push(f(band)?);
        }
        match out.try_into() {
            Ok(arr) => Ok(Self(arr)),
            Err(_) => unreachable!("Band::ALL yields exactly BAND_COUNT entries"),
        }
    }

    pub fn get(&self, band: Band) -> &T {
        &self.0[band.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Band, &T)> {
        Band::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> std::ops::Index<Band> for BandSet<T> {
    type Output = T;

    fn index(&self, band: Band) -> &T {
        self.get(band)
    }
}

/// Colors of the fixed band table.
pub fn default_palette() -> BandSet<Rgb8> {
    BandSet::from_fn(|band| band.spec().color)
}
