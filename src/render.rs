//! Rasterization of the band-colored waveform image.

pub mod canvas;
pub mod style;
pub mod text;
pub mod timeline;
pub mod waveform;

pub use canvas::Canvas;
pub use style::{Layout, TextStyle, Theme, WaveformStyle};
pub use text::{TextOverlay, TextRasterizer, TextRun};
pub use timeline::{Tick, format_mss, ticks};
pub use waveform::{RenderRequest, WaveformData, WaveformRenderer};
