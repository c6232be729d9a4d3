use crate::foundation::error::{BandwaveError, BandwaveResult};

/// Straight (non-premultiplied) 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as an SVG/CSS `rgb(r,g,b)` paint.
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create validated dimensions; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> BandwaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(BandwaveError::degenerate(format!(
                "image dimensions must be non-zero (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 4000,
            height: 350,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_reject_zero_sides() {
        assert!(Dimensions::new(0, 10).is_err());
        assert!(Dimensions::new(10, 0).is_err());
        assert_eq!(Dimensions::new(3, 2).unwrap().pixel_count(), 6);
    }

    #[test]
    fn default_dimensions_match_cli_defaults() {
        let d = Dimensions::default();
        assert_eq!((d.width, d.height), (4000, 350));
    }

    #[test]
    fn css_paint_is_plain_rgb() {
        assert_eq!(Rgb8::new(5, 10, 20).to_css(), "rgb(5,10,20)");
    }
}
