use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type BandwaveResult<T> = Result<T, BandwaveError>;

/// Errors produced while extracting, compositing or rendering a waveform.
#[derive(thiserror::Error, Debug)]
pub enum BandwaveError {
    /// A peak stream or band magnitude that cannot be interpreted.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Input that is well formed but describes nothing renderable.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The finished raster could not be written.
    #[error("failed to encode image '{}': {source}", path.display())]
    Encode {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying encoder or I/O failure.
        #[source]
        source: image::ImageError,
    },

    /// An external tool was missing or exited unsuccessfully.
    #[error("{tool} failed: {message}")]
    Tool {
        /// Program name as invoked.
        tool: &'static str,
        /// Exit status and captured stderr.
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BandwaveError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    pub fn encode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Encode {
            path: path.into(),
            source,
        }
    }

    pub fn tool(tool: &'static str, message: impl Into<String>) -> Self {
        Self::Tool {
            tool,
            message: message.into(),
        }
    }
}
