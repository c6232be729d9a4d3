//! Peak data produced by `audiowaveform` and its reduction to magnitudes.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::foundation::error::{BandwaveError, BandwaveResult};

const DEFAULT_SAMPLES_PER_PIXEL: u32 = 256;
const DEFAULT_SAMPLE_RATE: u32 = 44_100;

fn default_samples_per_pixel() -> u32 {
    DEFAULT_SAMPLES_PER_PIXEL
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

/// One `audiowaveform` JSON document.
///
/// `data` holds interleaved `(min, max)` pairs, one pair per time-pixel. Values are kept as
/// `i64` on the way in so out-of-range input is reported instead of silently wrapped.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PeakData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u32>,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_samples_per_pixel")]
    pub samples_per_pixel: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    pub data: Vec<i64>,
}

impl PeakData {
    /// Construct an 8-bit document from already interleaved pairs.
    pub fn new(data: Vec<i64>, samples_per_pixel: u32, sample_rate: u32) -> Self {
        let length = (data.len() / 2) as u64;
        Self {
            version: Some(2),
            channels: Some(1),
            sample_rate,
            samples_per_pixel,
            bits: Some(8),
            length: Some(length),
            data,
        }
    }

    pub fn from_path(path: &Path) -> BandwaveResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open peak data '{}'", path.display()))?;
        let r = BufReader::new(f);
        serde_json::from_reader(r).map_err(|e| {
            BandwaveError::malformed(format!("parse peak data '{}': {e}", path.display()))
        })
    }

    pub fn from_json_str(s: &str) -> BandwaveResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| BandwaveError::malformed(format!("parse peak data: {e}")))
    }

    /// Number of `(min, max)` pairs.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 2
    }

    /// Track length implied by the peak count, in seconds.
    pub fn duration_secs(&self) -> BandwaveResult<f64> {
        if self.sample_rate == 0 {
            return Err(BandwaveError::degenerate("peak data sample_rate must be > 0"));
        }
        let samples = self.pixel_count() as f64 * f64::from(self.samples_per_pixel);
        Ok(samples / f64::from(self.sample_rate))
    }

    pub fn magnitudes(&self) -> BandwaveResult<Vec<f64>> {
        extract_magnitudes(&self.data)
    }
}

/// Reduce interleaved `(min, max)` pairs to `max(|min|, |max|)` per pair.
///
/// Every value must fit in `i8`. The absolute value saturates, so `-128` yields `127` and the
/// result always lies in `[0, 127]`.
pub fn extract_magnitudes(data: &[i64]) -> BandwaveResult<Vec<f64>> {
    if !data.len().is_multiple_of(2) {
        return Err(BandwaveError::malformed(format!(
            "peak stream must hold (min, max) pairs, got odd length {}",
            data.len()
        )));
    }

    data.chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let min = to_i8(pair[0], 2 * i)?;
            let max = to_i8(pair[1], 2 * i + 1)?;
            let mag = min.saturating_abs().max(max.saturating_abs());
            Ok(f64::from(mag))
        })
        .collect()
}

fn to_i8(v: i64, at: usize) -> BandwaveResult<i8> {
    i8::try_from(v).map_err(|_| {
        BandwaveError::malformed(format!(
            "peak value {v} at index {at} is outside [-128, 127]"
        ))
    })
}
