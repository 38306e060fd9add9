use super::*;

fn lines(n: usize) -> Vec<Line> {
    (0..n).map(|i| Line::new(format!("line {i}"), Emphasis::Normal)).collect()
}

fn as_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|b| if b.is_ascii() { char::from(*b) } else { '.' }).collect()
}

#[test]
fn document_has_header_and_trailer() {
    let pdf = render_pdf(&lines(3), 42);
    let text = as_latin1(&pdf);
    assert!(text.starts_with("%PDF-1.4\n"));
    assert!(text.ends_with("%%EOF\n"));
    assert!(text.contains("/Type /Catalog"));
    assert!(text.contains("/BaseFont /Courier "));
    assert!(text.contains("/BaseFont /Courier-Bold"));
    assert!(text.contains("(line 2) Tj"));
}

#[test]
fn xref_offsets_point_at_objects() {
    let pdf = render_pdf(&lines(5), 42);
    let text = as_latin1(&pdf);

    let startxref = text.rfind("startxref\n").expect("startxref");
    let offset: usize = text[startxref + "startxref\n".len()..]
        .lines()
        .next()
        .and_then(|v| v.parse().ok())
        .expect("xref offset");
    assert!(text[offset..].starts_with("xref\n0 7\n"));

    let entries: Vec<usize> = text[offset..]
        .lines()
        .skip(3)
        .take(6)
        .map(|l| l[..10].parse().expect("entry offset"))
        .collect();
    for (index, entry) in entries.iter().enumerate() {
        assert!(text[*entry..].starts_with(&format!("{} 0 obj\n", index + 1)));
    }
}

#[test]
fn stream_length_matches_content() {
    let pdf = render_pdf(&lines(4), 42);
    let text = as_latin1(&pdf);
    let length_at = text.find("/Length ").expect("length") + "/Length ".len();
    let length: usize = text[length_at..]
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .expect("length value");
    let start = text.find("stream\n").expect("stream") + "stream\n".len();
    let end = text.find("\nendstream").expect("endstream");
    assert_eq!(end - start, length);
}

#[test]
fn page_grows_with_line_count() {
    let size = font_size_for(42);
    assert!(page_height_for(40, size) > page_height_for(10, size));
    assert!(page_height_for(0, size) > 0.0);
}

#[test]
fn font_shrinks_for_wide_layouts_and_is_capped() {
    assert!(font_size_for(64) < font_size_for(42));
    assert!((font_size_for(10) - 9.0).abs() < f32::EPSILON);
    let width = font_size_for(42) * 0.6 * 42.0;
    assert!(width <= PAGE_WIDTH_PT - 16.0 + 0.01);
}

#[test]
fn encode_text_escapes_delimiters() {
    assert_eq!(encode_text(r"a(b)c\d"), br"a\(b\)c\\d".to_vec());
}

#[test]
fn encode_text_maps_latin1_and_replaces_others() {
    assert_eq!(encode_text("ñé"), vec![0xF1, 0xE9]);
    assert_eq!(encode_text("€→"), b"??".to_vec());
    assert_eq!(encode_text("a\tb"), b"ab".to_vec());
}

#[test]
fn strong_lines_use_bold_font() {
    let pdf = render_pdf(&[Line::new("TOTAL", Emphasis::Strong)], 42);
    let text = as_latin1(&pdf);
    assert!(text.contains("BT /F2 "));
    assert!(!text.contains("BT /F1 "));
}

#[test]
fn blank_lines_emit_no_text_operators() {
    let pdf = render_pdf(&[Line::new("", Emphasis::Normal), Line::new("   ", Emphasis::Normal)], 42);
    let text = as_latin1(&pdf);
    assert!(!text.contains(" Tj"));
}
