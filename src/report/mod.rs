//! PDF report rendering.
//!
//! A report is a single US-letter document: title, analysis timestamp, the
//! analyzed image scaled to fit a 4x3 inch box, and the analysis text with
//! its HTML markup and icons stripped. Text wraps and flows onto further
//! pages as needed.
//!
//! Text is set in the builtin Helvetica faces, which only cover Latin-1.
//! Results translated into scripts outside it (Greek, Cyrillic, Arabic,
//! Devanagari, Gujarati, Thai, CJK, Hangul) still produce a complete file,
//! but those glyphs do not render legibly.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{AppError, Result};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 25.4;
const IMAGE_BOX_WIDTH: f32 = 101.6;
const IMAGE_BOX_HEIGHT: f32 = 76.2;
const IMAGE_DPI: f32 = 300.0;
const BODY_FONT_SIZE: f32 = 11.0;
const BODY_LINE_HEIGHT: f32 = 5.5;
const WRAP_COLUMNS: usize = 85;

pub const REPORT_TITLE: &str = "Fruit Freshness Analysis Report";

/// Icons emitted by the formatter; the builtin PDF fonts cannot draw them.
const ICONS: &[&str] = &["📊", "🍎", "✅", "❌", "ℹ️", "🎯", "📝"];

/// Where the report for `image_path` goes: `report_{stem}.pdf` in `reports_dir`.
pub fn report_path(reports_dir: &Path, image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    reports_dir.join(format!("report_{}.pdf", stem))
}

/// Remove the formatter's markup so the text reads cleanly on paper.
pub fn strip_markup(result: &str) -> String {
    let mut clean = result
        .replace("<strong>", "")
        .replace("</strong>", "")
        .replace("<br>", "\n");
    for icon in ICONS {
        clean = clean.replace(icon, "");
    }
    clean
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Greedy word wrap at `columns` characters. Blank lines are preserved.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
            if needed > columns && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

/// Render the report, returning whether a complete file now exists at
/// `output_path`. On failure nothing is left behind at that path.
pub fn generate_pdf_report(image_path: &Path, analysis_result: &str, output_path: &Path) -> bool {
    let partial = output_path.with_extension("pdf.partial");
    let outcome = render(image_path, analysis_result, &partial)
        .and_then(|_| std::fs::rename(&partial, output_path).map_err(AppError::from));

    match outcome {
        Ok(()) => {
            info!("Report written to {}", output_path.display());
            crate::metrics::record_report(true);
            true
        }
        Err(e) => {
            error!("Error generating PDF: {}", e);
            let _ = std::fs::remove_file(&partial);
            crate::metrics::record_report(false);
            false
        }
    }
}

/// Cursor over the current page, adding pages as text runs past the margin.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, text: &str, size: f32, line_height: f32, font: &IndirectFontRef) {
        self.ensure_room(line_height);
        self.y -= line_height;
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }
}

fn render(image_path: &Path, analysis_result: &str, output_path: &Path) -> Result<()> {
    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Report(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Report(e.to_string()))?;

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT - MARGIN,
    };

    writer.text(REPORT_TITLE, 24.0, 10.0, &bold);
    writer.gap(8.0);

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writer.text(&format!("Analysis Date: {}", timestamp), BODY_FONT_SIZE, BODY_LINE_HEIGHT, &regular);
    writer.gap(5.0);

    // A broken image should not cost the reader the text
    match embed_image(&mut writer, image_path) {
        Ok(()) => writer.gap(8.0),
        Err(e) => warn!("Skipping image in report: {}", e),
    }

    writer.text("Analysis Results:", 14.0, 8.0, &bold);
    writer.gap(3.0);

    for line in wrap_text(&strip_markup(analysis_result), WRAP_COLUMNS) {
        writer.text(&line, BODY_FONT_SIZE, BODY_LINE_HEIGHT, &regular);
    }

    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AppError::Report(e.to_string()))?;
    Ok(())
}

fn embed_image(writer: &mut PageWriter<'_>, image_path: &Path) -> Result<()> {
    let decoded = image::open(image_path).map_err(|e| AppError::Report(e.to_string()))?;
    // Alpha channels are not supported by the embedder
    let buffer = decoded.to_rgb8();
    let (width_px, height_px) = buffer.dimensions();
    let rgb = image::DynamicImage::ImageRgb8(buffer);

    let natural_width = width_px as f32 / IMAGE_DPI * 25.4;
    let natural_height = height_px as f32 / IMAGE_DPI * 25.4;
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return Err(AppError::Report("image has no pixels".to_string()));
    }
    let scale = (IMAGE_BOX_WIDTH / natural_width).min(IMAGE_BOX_HEIGHT / natural_height);
    let height = natural_height * scale;

    writer.ensure_room(height);
    writer.y -= height;

    Image::from_dynamic_image(&rgb).add_to_layer(
        writer.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(writer.y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}
