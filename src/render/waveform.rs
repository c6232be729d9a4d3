use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    bands::{Band, BandSet},
    composite::{BandColorCompositor, ColumnPaint},
    foundation::{
        core::Dimensions,
        error::{BandwaveError, BandwaveResult},
    },
    peaks::PeakData,
    render::{
        canvas::Canvas,
        style::{Layout, TICK_INTERVAL_SECS, TICK_LENGTH, WaveformStyle},
        text::{TextOverlay, TextRasterizer},
        timeline::{Tick, check_duration, ticks},
    },
    resample::{nearest_indices, resample_nearest},
};

/// Magnitude sequences for the original signal and each band.
///
/// Band sequences may differ in length from the original; they are aligned at render time.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveformData {
    pub original: Vec<f64>,
    pub bands: BandSet<Vec<f64>>,
}

impl WaveformData {
    pub fn new(original: Vec<f64>, bands: BandSet<Vec<f64>>) -> Self {
        Self { original, bands }
    }

    /// Reduce the original and per-band peak documents to magnitudes.
    pub fn from_peaks(original: &PeakData, bands: &BandSet<PeakData>) -> BandwaveResult<Self> {
        Ok(Self {
            original: original.magnitudes()?,
            bands: BandSet::try_from_fn(|band| bands[band].magnitudes())?,
        })
    }

    fn validate(&self) -> BandwaveResult<()> {
        if self.original.is_empty() {
            return Err(BandwaveError::degenerate(
                "original magnitude sequence is empty",
            ));
        }
        if let Some((i, v)) = self
            .original
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(BandwaveError::malformed(format!(
                "original magnitude at index {i} is {v}; expected a finite value >= 0"
            )));
        }
        for (band, values) in self.bands.iter() {
            if values.is_empty() {
                return Err(BandwaveError::degenerate(format!(
                    "band '{band}' magnitude sequence is empty"
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for one render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    pub duration_secs: f64,
    /// Text drawn in the title strip.
    pub label: String,
    pub out_path: PathBuf,
    pub dims: Dimensions,
}

impl RenderRequest {
    /// A request at the default 4000x350 size.
    pub fn new(duration_secs: f64, label: impl Into<String>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            duration_secs,
            label: label.into(),
            out_path: out_path.into(),
            dims: Dimensions::default(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.dims = Dimensions { width, height };
        self
    }
}

/// Draws the band-colored waveform image.
///
/// Holds only configuration; each call builds and owns a fresh canvas.
#[derive(Clone, Debug)]
pub struct WaveformRenderer {
    style: WaveformStyle,
    compositor: BandColorCompositor,
    fonts: TextRasterizer,
    parallel: bool,
}

impl WaveformRenderer {
    /// Default style, default band palette, system fonts.
    pub fn new() -> Self {
        Self::with_fonts(TextRasterizer::with_system_fonts())
    }

    pub fn with_fonts(fonts: TextRasterizer) -> Self {
        Self {
            style: WaveformStyle::default(),
            compositor: BandColorCompositor::default(),
            fonts,
            parallel: true,
        }
    }

    pub fn style(mut self, style: WaveformStyle) -> Self {
        self.style = style;
        self
    }

    pub fn compositor(mut self, compositor: BandColorCompositor) -> Self {
        self.compositor = compositor;
        self
    }

    /// Compute column colors on the rayon pool (default) or on the calling thread.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Render `data` into a canvas of exactly `req.dims`.
    #[tracing::instrument(skip(self, data), fields(samples = data.original.len()))]
    pub fn render(&self, data: &WaveformData, req: &RenderRequest) -> BandwaveResult<Canvas> {
        data.validate()?;
        let layout = self.layout(req)?;
        let marks = ticks(req.duration_secs, TICK_INTERVAL_SECS, layout.width)?;
        let theme = &self.style.theme;

        let mut canvas = Canvas::new(req.dims, theme.background);

        let center_y = i64::from(layout.center_y);
        canvas.hline(center_y, theme.center_line);

        let columns = self.column_paints(data, layout.width)?;
        let full_rows = 0..i64::from(layout.height);
        let wave_rows = layout.waveform_rows();
        for (x, (amp, paint)) in columns.into_iter().enumerate() {
            let x = x as i64;
            match paint {
                ColumnPaint::Quiet => {
                    canvas.vspan(x, center_y - 1, center_y + 1, full_rows.clone(), theme.quiet);
                }
                ColumnPaint::Bar(color) => {
                    let h = layout.bar_height(amp);
                    canvas.vspan(x, center_y - h, center_y + h, wave_rows.clone(), color);
                }
            }
        }

        let timeline_y = i64::from(layout.timeline_y);
        canvas.hline(timeline_y, theme.timeline);

        tracing::debug!(ticks = marks.len(), "drawing timeline");
        for tick in &marks {
            canvas.vspan(
                i64::from(tick.x),
                timeline_y,
                timeline_y + i64::from(TICK_LENGTH) - 1,
                full_rows.clone(),
                theme.tick,
            );
        }

        self.overlay_for(req, &layout, &marks)
            .composite_onto(&mut canvas, &self.fonts)?;
        Ok(canvas)
    }

    /// Text drawn by [`render`](Self::render): the title, then one `M:SS` label per tick.
    pub fn text_overlay(&self, req: &RenderRequest) -> BandwaveResult<TextOverlay> {
        let layout = self.layout(req)?;
        let marks = ticks(req.duration_secs, TICK_INTERVAL_SECS, layout.width)?;
        Ok(self.overlay_for(req, &layout, &marks))
    }

    fn overlay_for(&self, req: &RenderRequest, layout: &Layout, marks: &[Tick]) -> TextOverlay {
        let theme = &self.style.theme;
        let mut overlay = TextOverlay::new();
        let (tx, ty) = self.style.title_origin;
        overlay.push(tx, ty, req.label.as_str(), &self.style.title_font, theme.title);

        let label_top = i64::from(layout.timeline_y) + 3;
        for tick in marks {
            overlay.push(
                i64::from(tick.x) + 3,
                label_top,
                tick.label.as_str(),
                &self.style.label_font,
                theme.text,
            );
        }
        overlay
    }

    /// Render and encode to `req.out_path`, creating its parent directory if needed.
    pub fn render_to_file(&self, data: &WaveformData, req: &RenderRequest) -> BandwaveResult<()> {
        let canvas = self.render(data, req)?;
        ensure_parent_dir(&req.out_path)?;
        canvas.save(&req.out_path)?;
        tracing::info!(path = %req.out_path.display(), "wrote waveform image");
        Ok(())
    }

    fn layout(&self, req: &RenderRequest) -> BandwaveResult<Layout> {
        let dims = Dimensions::new(req.dims.width, req.dims.height)?;
        check_duration(req.duration_secs)?;
        Layout::new(dims.width, dims.height).ok_or_else(|| {
            BandwaveError::degenerate(format!(
                "image height {} leaves no room for the waveform area",
                dims.height
            ))
        })
    }

    /// Original magnitude and paint for every output column.
    fn column_paints(
        &self,
        data: &WaveformData,
        width: u32,
    ) -> BandwaveResult<Vec<(f64, ColumnPaint)>> {
        let n = data.original.len();
        let aligned: BandSet<Cow<'_, [f64]>> =
            BandSet::try_from_fn(|band| resample_nearest(&data.bands[band], n))?;
        let sample_for_column = nearest_indices(n, width as usize)?;
        tracing::debug!(samples = n, columns = width, "mapped samples to columns");

        let paint_at = |&i: &usize| -> BandwaveResult<(f64, ColumnPaint)> {
            let amp = data.original[i];
            let bands = BandSet::from_fn(|band: Band| aligned[band][i]);
            Ok((amp, self.compositor.paint(amp, &bands)?))
        };

        if self.parallel {
            sample_for_column.par_iter().map(paint_at).collect()
        } else {
            sample_for_column.iter().map(paint_at).collect()
        }
    }
}

impl Default for WaveformRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> BandwaveResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{foundation::core::Rgb8, render::style::Theme};

    fn renderer() -> WaveformRenderer {
        WaveformRenderer::with_fonts(TextRasterizer::empty())
    }

    fn flat(len: usize, v: f64) -> WaveformData {
        WaveformData::new(vec![v; len], BandSet::from_fn(|_| vec![v; len]))
    }

    #[test]
    fn canvas_matches_requested_size() {
        for (samples, w, h) in [(10, 37, 80), (5000, 120, 350), (1, 1, 46)] {
            let req = RenderRequest::new(30.0, "t", "unused.png").with_size(w, h);
            let canvas = renderer().render(&flat(samples, 60.0), &req).unwrap();
            assert_eq!((canvas.width(), canvas.height()), (w, h));
        }
    }

    #[test]
    fn silence_draws_quiet_marker_over_center_line() {
        let req = RenderRequest::new(10.0, "", "unused.png").with_size(20, 105);
        let canvas = renderer().render(&flat(8, 0.0), &req).unwrap();
        let layout = Layout::new(20, 105).unwrap();
        let theme = Theme::default();
        for x in [1, 10, 19] {
            for dy in [-1i64, 0, 1] {
                let y = (i64::from(layout.center_y) + dy) as u32;
                assert_eq!(canvas.pixel(x, y).unwrap(), theme.quiet);
            }
            assert_eq!(
                canvas.pixel(x, layout.center_y + 2).unwrap(),
                theme.background
            );
        }
    }

    #[test]
    fn clipped_bars_stay_inside_waveform_area() {
        let req = RenderRequest::new(10.0, "", "unused.png").with_size(8, 61);
        let canvas = renderer().render(&flat(4, 127.0), &req).unwrap();
        let layout = Layout::new(8, 61).unwrap();
        let bottom = i64::from(layout.center_y) + layout.bar_height(127.0);
        assert!(bottom >= i64::from(layout.timeline_y));
        let theme = Theme::default();
        for y in 0..layout.waveform_top {
            assert_eq!(canvas.pixel(4, y).unwrap(), theme.background);
        }
        // bottom row of the area is painted, the timeline row is not overwritten by the bar
        assert_ne!(
            canvas.pixel(4, layout.timeline_y - 1).unwrap(),
            theme.background
        );
        assert_eq!(canvas.pixel(4, layout.timeline_y).unwrap(), theme.timeline);
    }

    #[test]
    fn band_length_mismatch_is_aligned() {
        let data = WaveformData::new(
            vec![100.0; 10],
            BandSet::from_fn(|b| if b == Band::Sub { vec![50.0; 7] } else { vec![0.0; 13] }),
        );
        let req = RenderRequest::new(5.0, "", "unused.png").with_size(10, 100);
        let canvas = renderer().render(&data, &req).unwrap();
        let layout = Layout::new(10, 100).unwrap();
        let sub = Band::Sub.spec().color;
        let got = canvas.pixel(3, layout.center_y).unwrap();
        assert!(got.r.abs_diff(sub.r) <= 1 && got.g.abs_diff(sub.g) <= 1);
    }

    #[test]
    fn parallel_and_serial_paths_agree() {
        let original: Vec<f64> = (0..257).map(|i| f64::from(i % 128)).collect();
        let bands = BandSet::from_fn(|b| {
            (0..250)
                .map(|i| f64::from((i * (b.index() as i32 + 3)) % 97))
                .collect()
        });
        let data = WaveformData::new(original, bands);
        let req = RenderRequest::new(61.0, "", "unused.png").with_size(300, 120);
        let a = renderer().parallel(true).render(&data, &req).unwrap();
        let b = renderer().parallel(false).render(&data, &req).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn degenerate_requests_are_rejected_before_drawing() {
        let data = flat(4, 50.0);
        for req in [
            RenderRequest::new(0.0, "", "x.png").with_size(10, 100),
            RenderRequest::new(-3.0, "", "x.png").with_size(10, 100),
            RenderRequest::new(10.0, "", "x.png").with_size(0, 100),
            RenderRequest::new(10.0, "", "x.png").with_size(10, 0),
            RenderRequest::new(10.0, "", "x.png").with_size(10, 45),
        ] {
            assert!(matches!(
                renderer().render(&data, &req),
                Err(BandwaveError::DegenerateInput(_))
            ));
        }

        let mut empty_band = flat(4, 50.0);
        empty_band.bands.0[4].clear();
        let req = RenderRequest::new(10.0, "", "x.png").with_size(10, 100);
        let err = renderer().render(&empty_band, &req).unwrap_err();
        assert!(err.to_string().contains("highmid"));

        assert!(renderer().render(&flat(0, 0.0), &req).is_err());
    }

    #[test]
    fn malformed_band_values_bubble_up() {
        let mut data = flat(4, 50.0);
        data.bands.0[0][2] = f64::NAN;
        let req = RenderRequest::new(10.0, "", "x.png").with_size(4, 100);
        assert!(matches!(
            renderer().render(&data, &req),
            Err(BandwaveError::MalformedInput(_))
        ));
    }

    #[test]
    fn non_finite_or_negative_original_is_malformed() {
        let req = RenderRequest::new(10.0, "", "x.png").with_size(4, 100);
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let mut data = flat(4, 50.0);
            data.original[2] = bad;
            assert!(
                matches!(
                    renderer().render(&data, &req),
                    Err(BandwaveError::MalformedInput(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn overlay_holds_title_then_tick_labels() {
        let r = renderer();
        let req = RenderRequest::new(65.0, "Artist - Title", "x.png").with_size(131, 100);
        let overlay = r.text_overlay(&req).unwrap();
        let layout = Layout::new(131, 100).unwrap();
        let style = WaveformStyle::default();
        let theme = Theme::default();
        let label_top = i64::from(layout.timeline_y) + 3;

        let runs = overlay.runs();
        assert_eq!(runs.len(), 4);
        assert_eq!((runs[0].x, runs[0].top), (10, 5));
        assert_eq!(runs[0].text, "Artist - Title");
        assert_eq!(runs[0].style, style.title_font);
        assert_eq!(runs[0].color, theme.title);

        let placed: Vec<_> = runs[1..]
            .iter()
            .map(|r| (r.x, r.top, r.text.as_str()))
            .collect();
        assert_eq!(
            placed,
            [
                (3, label_top, "0:00"),
                (63, label_top, "0:30"),
                (123, label_top, "1:00"),
            ]
        );
        assert!(runs[1..].iter().all(|r| r.style == style.label_font && r.color == theme.text));
    }

    #[test]
    fn overlay_svg_has_one_text_element_per_run() {
        let req = RenderRequest::new(95.0, "Tom & Jerry", "x.png").with_size(400, 120);
        let overlay = renderer().text_overlay(&req).unwrap();
        let svg = overlay.to_svg(400, 120);
        assert_eq!(svg.matches("<text ").count(), 1 + 4);
        assert!(svg.contains(r#"<text x="10" "#));
        assert!(svg.contains(">Tom &amp; Jerry</text>"));
        assert!(svg.contains(">1:30</text>"));
        assert!(!svg.contains(">2:00</text>"));
        usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
    }

    #[test]
    fn custom_palette_is_used_for_bars() {
        let white = Rgb8::new(255, 255, 255);
        let r = renderer().compositor(BandColorCompositor::new(BandSet::from_fn(|_| white)));
        let req = RenderRequest::new(10.0, "", "x.png").with_size(4, 100);
        let canvas = r.render(&flat(4, 100.0), &req).unwrap();
        let layout = Layout::new(4, 100).unwrap();
        let got = canvas.pixel(1, layout.center_y).unwrap();
        assert!(got.to_array().iter().all(|&c| c >= 254));
    }
}
