// src/csv.rs
//
// Delimited text in and out. The reader remembers the source line of every
// row so input problems can point at it; the writer renders into a String.

use std::mem::take;
use std::path::Path;

use crate::error::{Error, Result};

/* ---------------- Reading ---------------- */

/// One parsed row and the 1-based line it starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
}

/// Drop a leading UTF-8 byte-order mark, if any.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Split delimited text into rows. A quote opens a quoted cell only at the
/// start of a cell; quoted cells may hold the separator, doubled quotes and
/// line breaks. Blank lines are skipped.
pub fn read_rows(text: &str, sep: char) -> Result<Vec<Row>> {
    let mut reader = RowReader::new(sep);
    for ch in strip_bom(text).chars() {
        reader.feed(ch);
    }
    reader.finish()
}

struct RowReader {
    sep: char,
    line: usize,
    row_line: usize,
    /// Line of the opening quote while inside a quoted cell.
    quote_line: Option<usize>,
    /// Saw `"` inside quotes: either an escape or the closing quote.
    pending_quote: bool,
    after_cr: bool,
    cell: String,
    cells: Vec<String>,
    rows: Vec<Row>,
}

impl RowReader {
    fn new(sep: char) -> Self {
        Self {
            sep,
            line: 1,
            row_line: 1,
            quote_line: None,
            pending_quote: false,
            after_cr: false,
            cell: s!(),
            cells: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn feed(&mut self, ch: char) {
        if take(&mut self.pending_quote) {
            if ch == '"' {
                self.cell.push('"');
                return;
            }
            self.quote_line = None;
        }
        if take(&mut self.after_cr) && ch == '\n' {
            return;
        }

        match ch {
            '"' if self.quote_line.is_some() => self.pending_quote = true,
            _ if self.quote_line.is_some() => {
                if ch == '\n' {
                    self.line += 1;
                }
                self.cell.push(ch);
            }
            '"' if self.cell.is_empty() => self.quote_line = Some(self.line),
            c if c == self.sep => self.cells.push(take(&mut self.cell)),
            '\n' | '\r' => {
                self.after_cr = ch == '\r';
                self.end_row();
                self.line += 1;
                self.row_line = self.line;
            }
            c => self.cell.push(c),
        }
    }

    fn end_row(&mut self) {
        self.cells.push(take(&mut self.cell));
        let cells = take(&mut self.cells);
        if !(cells.len() == 1 && cells[0].is_empty()) {
            self.rows.push(Row { line: self.row_line, cells });
        }
    }

    fn finish(mut self) -> Result<Vec<Row>> {
        if self.pending_quote {
            self.quote_line = None;
        }
        if let Some(line) = self.quote_line {
            return Err(Error::UnterminatedQuote { line });
        }
        if !self.cell.is_empty() || !self.cells.is_empty() {
            self.end_row();
        }
        Ok(self.rows)
    }
}

/// Delimiter for an input file: by extension (`.tsv`/`.tab` tab, `.csv`
/// comma), otherwise whichever of tab or comma the header line uses more.
pub fn sniff_delimiter(path: &Path, text: &str) -> char {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("tsv") | Some("tab") => '\t',
        Some("csv") => ',',
        _ => {
            let header = strip_bom(text).lines().next().unwrap_or_default();
            let tabs = header.matches('\t').count();
            if tabs > header.matches(',').count() { '\t' } else { ',' }
        }
    }
}

/* ---------------- Writing ---------------- */

/// Append one row. Cells holding the separator, a quote or a line break are
/// quoted with inner quotes doubled.
pub fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], sep: char) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        let cell = cell.as_ref();
        if cell.contains([sep, '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

/// Whole table as one string: optional header line, then rows.
pub fn to_delimited_string(headers: Option<&[&str]>, rows: &[Vec<String>], sep: char) -> String {
    let mut out = String::with_capacity(rows.len() * 256);
    if let Some(h) = headers {
        push_row(&mut out, h, sep);
    }
    for r in rows {
        push_row(&mut out, r, sep);
    }
    out
}
