//! Bandwave renders an audio track's amplitude envelope as an image, coloring each column by
//! the frequency bands that dominate it.
//!
//! - Reduce peak data to magnitudes ([`extract_magnitudes`], [`PeakData`])
//! - Align sequences with [`resample_nearest`]
//! - Blend band colors with [`BandColorCompositor`]
//! - Draw and save with [`WaveformRenderer`]
//!
//! [`pipeline`] produces the peak data from an audio file using `ffmpeg` and `audiowaveform`.
#![forbid(unsafe_code)]

mod foundation;

pub mod bands;
pub mod composite;
pub mod peaks;
pub mod pipeline;
pub mod render;
pub mod resample;

pub use crate::foundation::core::{Dimensions, Rgb8};
pub use crate::foundation::error::{BandwaveError, BandwaveResult};

pub use crate::bands::{BAND_COUNT, BANDS, Band, BandSet, BandSpec, default_palette};
pub use crate::composite::{BandColorCompositor, ColumnPaint, QUIET_THRESHOLD};
pub use crate::peaks::{PeakData, extract_magnitudes};
pub use crate::pipeline::{Analyzer, TrackAnalysis};
pub use crate::render::{
    Canvas, Layout, RenderRequest, TextRasterizer, Theme, WaveformData, WaveformRenderer,
    WaveformStyle,
};
pub use crate::resample::{nearest_indices, resample_nearest};
