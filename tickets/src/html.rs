//! Printable HTML page for the browser print dialog.

use std::fmt::Write;

use crate::layout::{Emphasis, Line};

#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    pub title: String,
    /// Open the print dialog as soon as the page loads.
    pub auto_print: bool,
}

const STYLE: &str = "@page { size: 80mm auto; margin: 0; }
body { margin: 0; padding: 4mm; width: 72mm; font-family: 'Courier New', Courier, monospace; font-size: 11px; line-height: 1.25; }
.line { white-space: pre; }
.strong { font-weight: bold; }";

/// Render laid-out lines as a standalone HTML document sized for 80mm paper.
#[must_use]
pub fn render_html(lines: &[Line], options: &HtmlOptions) -> String {
    let mut out = String::with_capacity(512 + lines.len() * 64);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(&options.title));
    let _ = writeln!(out, "<style>\n{STYLE}\n</style>");
    out.push_str("</head>\n<body>\n");

    for line in lines {
        let class = match line.emphasis {
            Emphasis::Normal => "line",
            Emphasis::Strong => "line strong",
        };
        let text = if line.text.is_empty() { "&#160;".to_owned() } else { escape(&line.text) };
        let _ = writeln!(out, "<div class=\"{class}\">{text}</div>");
    }

    if options.auto_print {
        out.push_str("<script>window.addEventListener('load', function () { window.print(); });</script>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Escape text for element content and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_lines_and_title() {
        let lines = vec![Line::new("<b>Tom & Jerry's</b>", Emphasis::Normal)];
        let html = render_html(&lines, &HtmlOptions { title: "a<b".into(), auto_print: false });
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&#39;s&lt;/b&gt;"));
        assert!(html.contains("<title>a&lt;b</title>"));
        assert!(!html.contains("<b>Tom"));
    }

    #[test]
    fn sizes_page_for_80mm_paper() {
        let html = render_html(&[], &HtmlOptions::default());
        assert!(html.contains("size: 80mm auto"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn strong_lines_get_bold_class_and_blank_lines_keep_height() {
        let lines = vec![Line::new("TOTAL", Emphasis::Strong), Line::new("", Emphasis::Normal)];
        let html = render_html(&lines, &HtmlOptions::default());
        assert!(html.contains("<div class=\"line strong\">TOTAL</div>"));
        assert!(html.contains("<div class=\"line\">&#160;</div>"));
    }

    #[test]
    fn auto_print_script_is_optional() {
        let with = render_html(&[], &HtmlOptions { title: String::new(), auto_print: true });
        let without = render_html(&[], &HtmlOptions { title: String::new(), auto_print: false });
        assert!(with.contains("window.print()"));
        assert!(!without.contains("window.print()"));
    }
}
