//! Printable order tickets for 80mm thermal paper.
//!
//! This crate owns document layout for `server` and `cli`. Documents are laid
//! out once as fixed-width [`Line`]s and then rendered to one of three
//! [`TicketFormat`]s: plain text (what a thermal printer receives), a
//! printable HTML page, or a single-page PDF. Nothing here performs I/O.

pub mod document;
pub mod html;
pub mod layout;
pub mod money;
pub mod pdf;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use document::{ClosureReport, KitchenTicket, Letterhead, Receipt, TicketItem, TicketOrder};
pub use html::HtmlOptions;
pub use layout::{Emphasis, Layout, Line};
pub use money::format_money;

/// Default characters per line for 80mm paper with the printer's standard font.
pub const DEFAULT_COLUMNS: usize = 42;

/// Narrowest layout we will produce. Anything below this cannot fit a price column.
pub const MIN_COLUMNS: usize = 24;

/// Widest layout we will produce (condensed font on 80mm paper).
pub const MAX_COLUMNS: usize = 64;

/// Error returned when parsing a [`TicketFormat`] or [`TicketKind`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("unknown ticket format: {0} (expected text, html or pdf)")]
    UnknownFormat(String),
    #[error("unknown ticket kind: {0} (expected receipt or kitchen)")]
    UnknownKind(String),
}

/// Output encoding for a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketFormat {
    #[default]
    Text,
    Html,
    Pdf,
}

impl TicketFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for TicketFormat {
    type Err = TicketError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            other => Err(TicketError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Which order document to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketKind {
    /// Customer-facing receipt with prices and total.
    #[default]
    Receipt,
    /// Kitchen copy without prices.
    Kitchen,
}

impl TicketKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Kitchen => "kitchen",
        }
    }
}

impl FromStr for TicketKind {
    type Err = TicketError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "receipt" => Ok(Self::Receipt),
            "kitchen" => Ok(Self::Kitchen),
            other => Err(TicketError::UnknownKind(other.to_owned())),
        }
    }
}

/// Shop-wide print settings shared by every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    pub columns: usize,
    pub currency_symbol: String,
    pub letterhead: Letterhead,
}

impl PrintSettings {
    /// Build settings, clamping `columns` into `MIN_COLUMNS..=MAX_COLUMNS`.
    #[must_use]
    pub fn new(columns: usize, currency_symbol: impl Into<String>, letterhead: Letterhead) -> Self {
        Self {
            columns: columns.clamp(MIN_COLUMNS, MAX_COLUMNS),
            currency_symbol: currency_symbol.into(),
            letterhead,
        }
    }

    #[must_use]
    pub fn money(&self, cents: i64) -> String {
        format_money(cents, &self.currency_symbol)
    }
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, "$", Letterhead::default())
    }
}

/// A document that can be laid out on thermal paper.
pub trait Printable {
    /// Title used for the HTML `<title>` and PDF file names.
    fn title(&self) -> String;

    /// Lay the document out as fixed-width lines.
    fn lines(&self, settings: &PrintSettings) -> Vec<Line>;
}

/// Render lines as plain text, one `\n`-terminated row per line.
#[must_use]
pub fn render_text(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.text);
        out.push('\n');
    }
    out
}

/// Lay out and encode a document in the requested format.
#[must_use]
pub fn render(doc: &dyn Printable, format: TicketFormat, settings: &PrintSettings) -> Vec<u8> {
    let lines = doc.lines(settings);
    match format {
        TicketFormat::Text => render_text(&lines).into_bytes(),
        TicketFormat::Html => {
            let options = HtmlOptions { title: doc.title(), auto_print: true };
            html::render_html(&lines, &options).into_bytes()
        }
        TicketFormat::Pdf => pdf::render_pdf(&lines, settings.columns),
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
