use std::path::Path;

use crate::foundation::{
    core::{Dimensions, Rgb8},
    error::{BandwaveError, BandwaveResult},
};

/// Opaque RGB8 raster, tightly packed, row-major.
///
/// All writes are bounds-checked; coordinates outside the raster are dropped.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(dims: Dimensions, fill: Rgb8) -> Self {
        let mut data = Vec::with_capacity(dims.pixel_count() * 3);
        for _ in 0..dims.pixel_count() {
            data.extend_from_slice(&fill.to_array());
        }
        Self {
            width: dims.width,
            height: dims.height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        let o = self.offset(i64::from(x), i64::from(y))?;
        Some(Rgb8::new(self.data[o], self.data[o + 1], self.data[o + 2]))
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb8) {
        if let Some(o) = self.offset(x, y) {
            self.data[o..o + 3].copy_from_slice(&color.to_array());
        }
    }

    /// Fill row `y` across the full width.
    pub fn hline(&mut self, y: i64, color: Rgb8) {
        for x in 0..i64::from(self.width) {
            self.set_pixel(x, y, color);
        }
    }

    /// Fill column `x` over the inclusive row span `y0..=y1`, clipped to `clip` (half-open rows).
    pub fn vspan(&mut self, x: i64, y0: i64, y1: i64, clip: std::ops::Range<i64>, color: Rgb8) {
        let lo = y0.max(clip.start);
        let hi = y1.min(clip.end - 1);
        for y in lo..=hi {
            self.set_pixel(x, y, color);
        }
    }

    /// Composite a premultiplied RGBA8 layer of identical size over this canvas.
    pub fn blend_premul_rgba(&mut self, layer: &[u8]) -> BandwaveResult<()> {
        if layer.len() != self.data.len() / 3 * 4 {
            return Err(BandwaveError::malformed(
                "overlay layer must match canvas dimensions",
            ));
        }
        for (d, s) in self.data.chunks_exact_mut(3).zip(layer.chunks_exact(4)) {
            let inv = 255u16 - u16::from(s[3]);
            for i in 0..3 {
                d[i] = s[i].saturating_add(mul_div255(u16::from(d[i]), inv));
            }
        }
        Ok(())
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: &Path) -> BandwaveResult<()> {
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BandwaveError::encode(path, e))
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(Dimensions::new(w, h).unwrap(), Rgb8::new(1, 2, 3))
    }

    #[test]
    fn new_fills_every_pixel() {
        let c = canvas(4, 3);
        assert_eq!(c.data().len(), 4 * 3 * 3);
        assert!(c.data().chunks_exact(3).all(|p| p == [1, 2, 3]));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut c = canvas(2, 2);
        let before = c.data().to_vec();
        c.set_pixel(-1, 0, Rgb8::new(9, 9, 9));
        c.set_pixel(0, 2, Rgb8::new(9, 9, 9));
        c.set_pixel(2, 0, Rgb8::new(9, 9, 9));
        assert_eq!(c.data(), before.as_slice());
        assert_eq!(c.pixel(5, 5), None);
    }

    #[test]
    fn vspan_is_inclusive_and_clipped() {
        let mut c = canvas(1, 10);
        let red = Rgb8::new(255, 0, 0);
        c.vspan(0, -5, 20, 2..6, red);
        for y in 0..10 {
            let want = if (2..6).contains(&y) {
                red
            } else {
                Rgb8::new(1, 2, 3)
            };
            assert_eq!(c.pixel(0, y).unwrap(), want, "row {y}");
        }
    }

    #[test]
    fn premul_blend_handles_opaque_and_transparent() {
        let mut c = canvas(3, 1);
        let layer = [
            0, 0, 0, 0, // transparent: keep
            200, 100, 50, 255, // opaque: replace
            64, 64, 64, 128, // half
        ];
        c.blend_premul_rgba(&layer).unwrap();
        assert_eq!(c.pixel(0, 0).unwrap(), Rgb8::new(1, 2, 3));
        assert_eq!(c.pixel(1, 0).unwrap(), Rgb8::new(200, 100, 50));
        assert_eq!(c.pixel(2, 0).unwrap(), Rgb8::new(64, 65, 65));
    }

    #[test]
    fn blend_rejects_size_mismatch() {
        let mut c = canvas(2, 2);
        assert!(c.blend_premul_rgba(&[0; 4]).is_err());
    }

    #[test]
    fn save_to_missing_dir_reports_path() {
        let c = canvas(2, 2);
        let path = Path::new("/nonexistent-bandwave-dir/out.png");
        let err = c.save(path).unwrap_err();
        assert!(matches!(err, BandwaveError::Encode { .. }));
        assert!(err.to_string().contains("nonexistent-bandwave-dir"));
    }
}
