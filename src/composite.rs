//! Per-instant color blending of band magnitudes.

use crate::{
    bands::{BandSet, default_palette},
    foundation::{
        core::Rgb8,
        error::{BandwaveError, BandwaveResult},
    },
};

/// Original-signal magnitude (0..=127 scale) below which a column is drawn as quiet.
pub const QUIET_THRESHOLD: f64 = 8.0;

/// Added to the band total so an all-zero instant blends to black instead of NaN.
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// What to paint for one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnPaint {
    /// Signal below threshold; drawn as the fixed quiet marker.
    Quiet,
    /// Signal present; drawn as a bar in the blended band color.
    Bar(Rgb8),
}

/// Blends band colors weighted by each band's share of the total band energy.
#[derive(Clone, Debug)]
pub struct BandColorCompositor {
    palette: BandSet<Rgb8>,
    quiet_threshold: f64,
}

impl Default for BandColorCompositor {
    fn default() -> Self {
        Self::new(default_palette())
    }
}

impl BandColorCompositor {
    pub fn new(palette: BandSet<Rgb8>) -> Self {
        Self {
            palette,
            quiet_threshold: QUIET_THRESHOLD,
        }
    }

    pub fn is_quiet(&self, amp: f64) -> bool {
        amp < self.quiet_threshold
    }

    /// Decide the paint for one instant from the original magnitude and the six band magnitudes.
    pub fn paint(&self, amp: f64, bands: &BandSet<f64>) -> BandwaveResult<ColumnPaint> {
        if self.is_quiet(amp) {
            return Ok(ColumnPaint::Quiet);
        }
        self.blend(bands).map(ColumnPaint::Bar)
    }

    /// Weighted average of the palette, clamped to `[0, 255]` and truncated per channel.
    pub fn blend(&self, bands: &BandSet<f64>) -> BandwaveResult<Rgb8> {
        let mut total = WEIGHT_EPSILON;
        for (band, &v) in bands.iter() {
            if !v.is_finite() || v < 0.0 {
                return Err(BandwaveError::malformed(format!(
                    "band '{band}' magnitude must be finite and >= 0 (got {v})"
                )));
            }
            total += v;
        }

        let mut acc = [0.0f64; 3];
        for (band, &v) in bands.iter() {
            let w = v / total;
            let c = self.palette[band].to_array();
            for (a, ch) in acc.iter_mut().zip(c) {
                *a += w * f64::from(ch);
            }
        }

        let [r, g, b] = acc.map(|c| c.clamp(0.0, 255.0) as u8);
        Ok(Rgb8::new(r, g, b))
    }
}
