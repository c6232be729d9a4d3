//! Turning an audio file into [`WaveformData`] with external tools.
//!
//! Band splitting and peak extraction sit behind traits so the orchestration can run against
//! in-process fakes; the shipped implementations shell out to `ffmpeg` and `audiowaveform`.

pub mod audiowaveform;
pub mod ffmpeg;
pub mod label;

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context as _;

use crate::{
    bands::{Band, BandSet, BandSpec},
    foundation::error::{BandwaveError, BandwaveResult},
    peaks::PeakData,
    render::{RenderRequest, WaveformData},
};

pub use audiowaveform::AudiowaveformExtractor;
pub use ffmpeg::FfmpegSplitter;
pub use label::track_label;

/// Peak resolution requested from the extractor.
pub const PIXELS_PER_SECOND: u32 = 500;

/// Writes the part of `input` inside one frequency band to `out`.
pub trait BandSplitter {
    fn split(&self, input: &Path, band: &BandSpec, out: &Path) -> BandwaveResult<()>;
}

/// Produces peak data for an audio file, using `scratch_json` as its working file.
pub trait PeakExtractor {
    fn extract(&self, audio: &Path, scratch_json: &Path) -> BandwaveResult<PeakData>;
}

/// Everything the renderer needs about one track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackAnalysis {
    pub data: WaveformData,
    pub duration_secs: f64,
    pub label: String,
}

impl TrackAnalysis {
    /// Build from the original and per-band peak documents; duration comes from the original.
    pub fn from_peaks(
        original: &PeakData,
        bands: &BandSet<PeakData>,
        label: impl Into<String>,
    ) -> BandwaveResult<Self> {
        Ok(Self {
            data: WaveformData::from_peaks(original, bands)?,
            duration_secs: original.duration_secs()?,
            label: label.into(),
        })
    }

    /// Load previously extracted peak JSON files.
    pub fn from_peak_files(
        original: &Path,
        bands: &BandSet<PathBuf>,
        label: impl Into<String>,
    ) -> BandwaveResult<Self> {
        let original = PeakData::from_path(original)?;
        let bands = BandSet::try_from_fn(|band| PeakData::from_path(&bands[band]))?;
        Self::from_peaks(&original, &bands, label)
    }

    pub fn render_request(
        &self,
        out_path: impl Into<PathBuf>,
        width: u32,
        height: u32,
    ) -> RenderRequest {
        RenderRequest::new(self.duration_secs, self.label.clone(), out_path)
            .with_size(width, height)
    }
}

/// Runs band splitting and peak extraction for a track.
pub struct Analyzer<S, P> {
    splitter: S,
    extractor: P,
}

impl Analyzer<FfmpegSplitter, AudiowaveformExtractor> {
    /// `ffmpeg` for band filtering, `audiowaveform` for peaks.
    pub fn system() -> Self {
        Self::new(FfmpegSplitter::default(), AudiowaveformExtractor::default())
    }
}

impl<S: BandSplitter, P: PeakExtractor> Analyzer<S, P> {
    pub fn new(splitter: S, extractor: P) -> Self {
        Self {
            splitter,
            extractor,
        }
    }

    /// Split `input` into bands and extract peaks for the original and every band.
    ///
    /// Intermediate files live in a temporary directory removed on return.
    #[tracing::instrument(skip(self))]
    pub fn analyze(&self, input: &Path) -> BandwaveResult<TrackAnalysis> {
        if !input.is_file() {
            return Err(BandwaveError::degenerate(format!(
                "input file '{}' not found",
                input.display()
            )));
        }

        let scratch = tempfile::Builder::new()
            .prefix("bandwave-")
            .tempdir()
            .context("create scratch directory")?;
        let dir = scratch.path();

        let band_audio = BandSet::try_from_fn(|band: Band| -> BandwaveResult<PathBuf> {
            let spec = band.spec();
            let out = dir.join(format!("{}.wav", band.name()));
            self.splitter.split(input, spec, &out)?;
            tracing::info!(
                band = %band,
                low_hz = spec.low_hz,
                high_hz = spec.high_hz,
                "split band"
            );
            Ok(out)
        })?;

        let original = self.extractor.extract(input, &dir.join("original.json"))?;
        let band_peaks = BandSet::try_from_fn(|band| {
            let json = dir.join(format!("{}.json", band.name()));
            self.extractor.extract(&band_audio[band], &json)
        })?;
        tracing::debug!(
            pixels = original.pixel_count(),
            samples_per_pixel = original.samples_per_pixel,
            sample_rate = original.sample_rate,
            "extracted peaks"
        );

        TrackAnalysis::from_peaks(&original, &band_peaks, track_label(input))
    }
}

/// Run `cmd` to completion, mapping spawn failures and non-zero exits to [`BandwaveError::Tool`].
pub(crate) fn run_tool(tool: &'static str, cmd: &mut Command) -> BandwaveResult<()> {
    tracing::debug!(?cmd, "running external tool");
    let output = cmd.output().map_err(|e| {
        BandwaveError::tool(tool, format!("failed to spawn (is it installed and on PATH?): {e}"))
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BandwaveError::tool(
            tool,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }
    Ok(())
}
