use std::{path::Path, process::Command};

use crate::{
    foundation::error::BandwaveResult,
    peaks::PeakData,
    pipeline::{PIXELS_PER_SECOND, PeakExtractor},
};

/// Peak extraction with the `audiowaveform` binary, 8-bit output.
#[derive(Clone, Debug)]
pub struct AudiowaveformExtractor {
    pub pixels_per_second: u32,
}

impl Default for AudiowaveformExtractor {
    fn default() -> Self {
        Self {
            pixels_per_second: PIXELS_PER_SECOND,
        }
    }
}

impl AudiowaveformExtractor {
    pub fn command(&self, audio: &Path, out_json: &Path) -> Command {
        let mut cmd = Command::new("audiowaveform");
        cmd.arg("-i")
            .arg(audio)
            .arg("-o")
            .arg(out_json)
            .args([
                "--pixels-per-second",
                self.pixels_per_second.to_string().as_str(),
                "--bits",
                "8",
            ]);
        cmd
    }
}

impl PeakExtractor for AudiowaveformExtractor {
    fn extract(&self, audio: &Path, scratch_json: &Path) -> BandwaveResult<PeakData> {
        super::run_tool("audiowaveform", &mut self.command(audio, scratch_json))?;
        PeakData::from_path(scratch_json)
    }
}
