use crate::foundation::core::Rgb8;

/// Height of the title strip at the top of the image.
pub const TITLE_HEIGHT: u32 = 25;
/// Height of the timeline strip at the bottom of the image.
pub const TIMELINE_HEIGHT: u32 = 20;
/// Seconds between timeline ticks.
pub const TICK_INTERVAL_SECS: u32 = 30;
/// Tick mark length in pixels, downward from the timeline row.
pub const TICK_LENGTH: u32 = 5;
/// Full-scale magnitude of 8-bit peak data.
pub const FULL_SCALE: f64 = 127.0;

/// Fixed colors of the non-waveform elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb8,
    pub center_line: Rgb8,
    pub quiet: Rgb8,
    pub title: Rgb8,
    pub timeline: Rgb8,
    pub tick: Rgb8,
    pub text: Rgb8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb8::new(5, 10, 20),
            center_line: Rgb8::new(25, 50, 80),
            quiet: Rgb8::new(40, 80, 120),
            title: Rgb8::new(150, 200, 240),
            timeline: Rgb8::new(30, 60, 100),
            tick: Rgb8::new(60, 120, 180),
            text: Rgb8::new(100, 160, 220),
        }
    }
}

/// Font family, size and weight for one kind of label.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// CSS-style family list, tried in order before generic fallbacks.
    pub families: String,
    pub size_px: f32,
    pub bold: bool,
}

/// Everything about the look of a render that is not data.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformStyle {
    pub theme: Theme,
    pub title_font: TextStyle,
    pub label_font: TextStyle,
    /// Top-left of the title text.
    pub title_origin: (i64, i64),
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            title_font: TextStyle {
                families: "'DejaVu Sans Mono', monospace".to_owned(),
                size_px: 14.0,
                bold: true,
            },
            label_font: TextStyle {
                families: "'DejaVu Sans Mono', monospace".to_owned(),
                size_px: 12.0,
                bold: false,
            },
            title_origin: (10, 5),
        }
    }
}

/// Vertical partition of the canvas into title, waveform and timeline strips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// First row of the waveform area.
    pub waveform_top: u32,
    /// Row count of the waveform area.
    pub waveform_height: u32,
    /// Row of the center line.
    pub center_y: u32,
    /// Row of the timeline line; first row of the timeline strip.
    pub timeline_y: u32,
}

impl Layout {
    /// Returns `None` when the canvas is too short to hold both strips and a waveform row.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let waveform_height = height.checked_sub(TITLE_HEIGHT + TIMELINE_HEIGHT)?;
        if width == 0 || waveform_height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            waveform_top: TITLE_HEIGHT,
            waveform_height,
            center_y: TITLE_HEIGHT + waveform_height / 2,
            timeline_y: TITLE_HEIGHT + waveform_height,
        })
    }

    /// Rows of the waveform area as a half-open range.
    pub fn waveform_rows(&self) -> std::ops::Range<i64> {
        i64::from(self.waveform_top)..i64::from(self.timeline_y)
    }

    /// Half-height of a full-scale bar.
    pub fn half_height(&self) -> u32 {
        self.waveform_height / 2
    }

    /// Bar half-height for a magnitude on the 0..=127 scale.
    pub fn bar_height(&self, amp: f64) -> i64 {
        ((amp / FULL_SCALE) * f64::from(self.half_height())).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_partitions_height() {
        let l = Layout::new(4000, 350).unwrap();
        assert_eq!(l.waveform_height, 305);
        assert_eq!(l.center_y, 25 + 152);
        assert_eq!(l.timeline_y, 330);
        assert_eq!(l.waveform_rows(), 25..330);
    }

    #[test]
    fn too_short_canvas_has_no_layout() {
        assert!(Layout::new(10, 45).is_none());
        assert!(Layout::new(10, 20).is_none());
        assert!(Layout::new(0, 300).is_none());
        assert!(Layout::new(10, 46).is_some());
    }

    #[test]
    fn bar_height_scales_to_half_area() {
        let l = Layout::new(10, 345).unwrap();
        assert_eq!(l.half_height(), 150);
        assert_eq!(l.bar_height(127.0), 150);
        assert_eq!(l.bar_height(0.0), 0);
        assert_eq!(l.bar_height(5.0), 5);
        assert_eq!(l.bar_height(120.0), 141);
    }
}
