use std::{fmt::Write as _, sync::Arc};

use anyhow::Context as _;
use usvg::fontdb::Family;

use crate::{
    foundation::{
        core::Rgb8,
        error::{BandwaveError, BandwaveResult},
    },
    render::{canvas::Canvas, style::TextStyle},
};

/// Ascent as a fraction of font size; converts a text top edge into an SVG baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Rasterizes text runs through `usvg`/`resvg` using a shared font database.
///
/// Family lookup falls back to generic families and finally to any loaded face. With no fonts
/// at all, text is skipped rather than treated as an error.
#[derive(Clone)]
pub struct TextRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl TextRasterizer {
    /// Fonts installed on the system.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded font database");
        Self::from_fontdb(Arc::new(db))
    }

    pub fn from_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// A rasterizer with no fonts; every run renders as nothing.
    pub fn empty() -> Self {
        Self::from_fontdb(Arc::new(usvg::fontdb::Database::new()))
    }

    fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: fallback_font_resolver(),
            ..Default::default()
        }
    }
}

/// A single line of text whose top-left corner sits at `(x, top)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: i64,
    pub top: i64,
    pub text: String,
    pub style: TextStyle,
    pub color: Rgb8,
}

/// Text runs collected during a render and composited onto the canvas in one pass.
#[derive(Clone, Debug, Default)]
pub struct TextOverlay {
    runs: Vec<TextRun>,
}

impl TextOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `text` with its top-left corner at `(x, top)`.
    pub fn push(
        &mut self,
        x: i64,
        top: i64,
        text: impl Into<String>,
        style: &TextStyle,
        color: Rgb8,
    ) {
        self.runs.push(TextRun {
            x,
            top,
            text: text.into(),
            style: style.clone(),
            color,
        });
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// SVG document sized like the canvas holding every queued run.
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for run in &self.runs {
            if run.text.trim().is_empty() {
                continue;
            }
            let baseline = run.top as f32 + run.style.size_px * ASCENT_RATIO;
            let weight = if run.style.bold { "bold" } else { "normal" };
            let _ = write!(
                svg,
                r#"<text x="{}" y="{baseline}" font-family="{}" font-size="{}" font-weight="{weight}" fill="{}" xml:space="preserve">{}</text>"#,
                run.x,
                escape_xml(&run.style.families),
                run.style.size_px,
                run.color.to_css(),
                escape_xml(&run.text),
            );
        }
        svg.push_str("</svg>");
        svg
    }

    /// Rasterize all runs and blend them over `canvas`.
    pub fn composite_onto(
        &self,
        canvas: &mut Canvas,
        fonts: &TextRasterizer,
    ) -> BandwaveResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        let (w, h) = (canvas.width(), canvas.height());
        let svg = self.to_svg(w, h);
        let tree =
            usvg::Tree::from_str(&svg, &fonts.options()).context("parse text overlay svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| BandwaveError::degenerate("failed to allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        canvas.blend_premul_rgba(pixmap.data())
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn to_fontdb_family(family: &usvg::FontFamily) -> Family<'_> {
    match family {
        usvg::FontFamily::Serif => Family::Serif,
        usvg::FontFamily::SansSerif => Family::SansSerif,
        usvg::FontFamily::Cursive => Family::Cursive,
        usvg::FontFamily::Fantasy => Family::Fantasy,
        usvg::FontFamily::Monospace => Family::Monospace,
        usvg::FontFamily::Named(name) => Family::Name(name.as_str()),
    }
}

/// Tries the run's families, then monospace and sans-serif, then whatever face is loaded.
fn fallback_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(to_fontdb_family)
                .chain([Family::Monospace, Family::SansSerif])
                .collect();
            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}
