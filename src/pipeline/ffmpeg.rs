use std::{path::Path, process::Command};

use crate::{bands::BandSpec, foundation::error::BandwaveResult, pipeline::BandSplitter};

/// Band splitting with the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegSplitter {
    /// Output sample rate of the band files.
    pub sample_rate: u32,
}

impl Default for FfmpegSplitter {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
        }
    }
}

impl FfmpegSplitter {
    pub fn command(&self, input: &Path, band: &BandSpec, out: &Path) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-af", band.ffmpeg_filter().as_str()])
            .args(["-ar", self.sample_rate.to_string().as_str()])
            .arg(out);
        cmd
    }
}

impl BandSplitter for FfmpegSplitter {
    fn split(&self, input: &Path, band: &BandSpec, out: &Path) -> BandwaveResult<()> {
        super::run_tool("ffmpeg", &mut self.command(input, band, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::Band;

    #[test]
    fn command_filters_and_resamples() {
        let cmd = FfmpegSplitter::default().command(
            Path::new("in.flac"),
            Band::LowMid.spec(),
            Path::new("/tmp/lowmid.wav"),
        );
        assert_eq!(cmd.get_program(), "ffmpeg");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "-y",
                "-loglevel",
                "error",
                "-i",
                "in.flac",
                "-af",
                "highpass=f=250,lowpass=f=500",
                "-ar",
                "44100",
                "/tmp/lowmid.wav",
            ]
        );
    }
}
