//! Fixed-width line layout.
//!
//! DESIGN
//! ======
//! Thermal printers have no layout engine: every row is exactly `columns`
//! characters or fewer, and anything wider is clipped by the printer. The
//! [`Layout`] builder therefore wraps text on word boundaries, hard-splits
//! words longer than a row, and truncates the left side of two-column rows so
//! the amount on the right is never lost. Widths are counted in `char`s.

/// Visual weight of a line. Plain text ignores it; HTML and PDF render bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Strong,
}

/// One printed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub emphasis: Emphasis,
}

impl Line {
    #[must_use]
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self { text: text.into(), emphasis }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Accumulates fixed-width lines for one document.
#[derive(Debug)]
pub struct Layout {
    columns: usize,
    lines: Vec<Line>,
}

impl Layout {
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self { columns: columns.max(1), lines: Vec::new() }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Wrapped paragraph.
    pub fn text(&mut self, text: &str) {
        self.push_wrapped(text, Emphasis::Normal);
    }

    /// Wrapped paragraph in bold.
    pub fn strong(&mut self, text: &str) {
        self.push_wrapped(text, Emphasis::Strong);
    }

    /// Wrapped paragraph, each row centered.
    pub fn centered(&mut self, text: &str, emphasis: Emphasis) {
        for row in wrap(text, self.columns) {
            let pad = (self.columns - char_len(&row)) / 2;
            self.lines.push(Line::new(format!("{}{row}", " ".repeat(pad)), emphasis));
        }
    }

    /// Two-column row: `left` flush left, `right` flush right.
    ///
    /// The left side is truncated when both do not fit. If `right` alone fills
    /// the row, `left` gets its own line above it.
    pub fn pair(&mut self, left: &str, right: &str, emphasis: Emphasis) {
        let right_len = char_len(right);
        if right_len + 1 >= self.columns {
            if !left.is_empty() {
                self.push_wrapped(left, emphasis);
            }
            self.lines.push(Line::new(right_align(right, self.columns), emphasis));
            return;
        }

        let available = self.columns - right_len - 1;
        let left = truncate(left, available);
        let gap = self.columns - char_len(&left) - right_len;
        self.lines.push(Line::new(format!("{left}{}{right}", " ".repeat(gap)), emphasis));
    }

    /// Wrapped paragraph whose rows all start `indent` spaces in.
    pub fn indented(&mut self, indent: usize, text: &str) {
        let indent = indent.min(self.columns.saturating_sub(1));
        let prefix = " ".repeat(indent);
        for row in wrap(text, self.columns - indent) {
            self.lines.push(Line::new(format!("{prefix}{row}"), Emphasis::Normal));
        }
    }

    /// Item row: right-aligned quantity, a name that wraps under itself, and
    /// an optional amount on the first row.
    pub fn item(&mut self, quantity: u32, name: &str, amount: Option<&str>, emphasis: Emphasis) {
        let prefix = format!("{quantity:>3} ");
        let indent = char_len(&prefix);
        let amount_len = amount.map_or(0, |a| char_len(a) + 1);
        let name_width = self.columns.saturating_sub(indent + amount_len).max(1);

        let mut rows = wrap(name, name_width).into_iter();
        let first = rows.next().unwrap_or_default();
        match amount {
            Some(amount) => self.pair(&format!("{prefix}{first}"), amount, emphasis),
            None => self.lines.push(Line::new(format!("{prefix}{first}"), emphasis)),
        }
        let hang = " ".repeat(indent);
        for row in rows {
            self.lines.push(Line::new(format!("{hang}{row}"), emphasis));
        }
    }

    /// Full-width separator.
    pub fn rule(&mut self) {
        self.lines.push(Line::new("-".repeat(self.columns), Emphasis::Normal));
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::new(String::new(), Emphasis::Normal));
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    fn push_wrapped(&mut self, text: &str, emphasis: Emphasis) {
        for row in wrap(text, self.columns) {
            self.lines.push(Line::new(row, emphasis));
        }
    }
}

/// Word-wrap `text` to rows of at most `width` chars.
///
/// Explicit newlines start a new row; an empty paragraph yields an empty row.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        let mut pushed_any = false;

        for word in paragraph.split_whitespace() {
            let word_len = char_len(word);

            if word_len > width {
                if current_len > 0 {
                    rows.push(std::mem::take(&mut current));
                    pushed_any = true;
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        rows.push(piece);
                        pushed_any = true;
                    } else {
                        current_len = chunk.len();
                        current = piece;
                    }
                }
                continue;
            }

            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                rows.push(std::mem::replace(&mut current, word.to_owned()));
                pushed_any = true;
                current_len = word_len;
            }
        }

        if current_len > 0 || !pushed_any {
            rows.push(current);
        }
    }

    rows
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect::<String>().trim_end().to_owned()
}

fn right_align(text: &str, columns: usize) -> String {
    let len = char_len(text);
    if len >= columns {
        return truncate(text, columns);
    }
    format!("{}{text}", " ".repeat(columns - len))
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
