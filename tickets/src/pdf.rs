//! Single-page PDF for 80mm roll paper.
//!
//! DESIGN
//! ======
//! The page is 80mm wide and exactly as tall as the laid-out lines need, so
//! a roll printer feeds one continuous ticket. Text uses the standard Type 1
//! Courier faces (no embedding) with `WinAnsiEncoding`; characters outside
//! Latin-1 are printed as `?`. The font size is chosen so `columns`
//! monospace characters span the printable width, capped at 9pt.

use std::fmt::Write;

use crate::layout::{Emphasis, Line};

/// 80mm in PDF points.
pub const PAGE_WIDTH_PT: f32 = 226.77;

const MARGIN_PT: f32 = 8.0;
const MAX_FONT_SIZE_PT: f32 = 9.0;
/// Courier advance width as a fraction of the font size.
const COURIER_ADVANCE: f32 = 0.6;
const LEADING: f32 = 1.25;

/// Font size that fits `columns` Courier glyphs between the margins.
#[must_use]
pub fn font_size_for(columns: usize) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let columns = columns.max(1) as f32;
    let usable = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
    (usable / (COURIER_ADVANCE * columns)).min(MAX_FONT_SIZE_PT)
}

/// Page height in points for `line_count` lines at `font_size`.
#[must_use]
pub fn page_height_for(line_count: usize, font_size: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let rows = line_count.max(1) as f32;
    2.0 * MARGIN_PT + rows * font_size * LEADING
}

/// Render laid-out lines as a complete PDF file.
#[must_use]
pub fn render_pdf(lines: &[Line], columns: usize) -> Vec<u8> {
    let font_size = font_size_for(columns);
    let height = page_height_for(lines.len(), font_size);
    let content = content_stream(lines, font_size, height);

    let mut objects: Vec<Vec<u8>> = Vec::with_capacity(6);
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    objects.push(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec());
    objects.push(
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH_PT:.2} {height:.2}] \
             /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
        )
        .into_bytes(),
    );
    objects.push(font_object("Courier"));
    objects.push(font_object("Courier-Bold"));

    let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    stream.extend_from_slice(&content);
    stream.extend_from_slice(b"\nendstream");
    objects.push(stream);

    let mut out: Vec<u8> = Vec::with_capacity(1024 + content.len());
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

fn font_object(base: &str) -> Vec<u8> {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>").into_bytes()
}

fn content_stream(lines: &[Line], font_size: f32, height: f32) -> Vec<u8> {
    let mut out = Vec::new();
    let leading = font_size * LEADING;
    let mut y = height - MARGIN_PT - font_size;

    for line in lines {
        if !line.text.trim().is_empty() {
            let font = match line.emphasis {
                Emphasis::Normal => "F1",
                Emphasis::Strong => "F2",
            };
            out.extend_from_slice(format!("BT /{font} {font_size:.2} Tf {MARGIN_PT:.2} {y:.2} Td (").as_bytes());
            out.extend_from_slice(&encode_text(&line.text));
            out.extend_from_slice(b") Tj ET\n");
        }
        y -= leading;
    }
    out
}

/// Encode text as a PDF literal string body in `WinAnsiEncoding`.
#[must_use]
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            c if (c as u32) < 0x20 => {}
            c => out.push(u8::try_from(c as u32).unwrap_or(b'?')),
        }
    }
    out
}

#[cfg(test)]
#[path = "pdf_test.rs"]
mod tests;
