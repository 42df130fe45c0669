// src/store.rs
//
// Raw input loading. Header names are matched case-insensitively against the
// English names and the collector's own column names; anything unrecognised is
// ignored.

use std::fs;
use std::path::Path;

use crate::core::sanitize::non_blank;
use crate::csv::{read_rows, sniff_delimiter};
use crate::error::{Error, Result};
use crate::record::RawRecord;

/// Raw field slots, in `RawRecord` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Title,
    Price,
    OldPrice,
    Rating,
    Discount,
    Image,
    Source,
    CollectedAt,
}

const ALIASES: &[(Field, &[&str])] = &[
    (Field::Title, &["title", "titre"]),
    (Field::Price, &["price_text", "prix_actuel", "price"]),
    (Field::OldPrice, &["old_price_text", "ancien_prix", "old_price"]),
    (Field::Rating, &["rating_text", "rating"]),
    (Field::Discount, &["discount_text", "discount"]),
    (Field::Image, &["image_reference", "image_url", "image"]),
    (Field::Source, &["source"]),
    (Field::CollectedAt, &["collected_at", "date_collecte"]),
];

fn field_for(header: &str) -> Option<Field> {
    let h = header.trim().to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&h.as_str()))
        .map(|(f, _)| *f)
}

/// Column index per field; first matching header wins.
#[derive(Debug, Default)]
struct Columns {
    slots: Vec<(Field, usize)>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let mut slots: Vec<(Field, usize)> = Vec::new();
        for (i, h) in header.iter().enumerate() {
            if let Some(f) = field_for(h) {
                if !slots.iter().any(|(seen, _)| *seen == f) {
                    slots.push((f, i));
                }
            }
        }
        if !slots.iter().any(|(f, _)| *f == Field::Title) {
            return Err(Error::MissingColumn("title"));
        }
        Ok(Self { slots })
    }

    fn record(&self, row: &[String]) -> RawRecord {
        let mut raw = RawRecord::default();
        for &(field, i) in &self.slots {
            let cell = row.get(i).and_then(|c| non_blank(c));
            match field {
                Field::Title => raw.title = cell.unwrap_or_default(),
                Field::Price => raw.price_text = cell,
                Field::OldPrice => raw.old_price_text = cell,
                Field::Rating => raw.rating_text = cell,
                Field::Discount => raw.discount_text = cell,
                Field::Image => raw.image_reference = cell,
                Field::Source => raw.source = cell,
                Field::CollectedAt => raw.collected_at = cell,
            }
        }
        raw
    }
}

/// Parse delimited text (header row first) into raw records, in input order.
/// Cells past the header width are ignored with a warning.
pub fn parse_raw(text: &str, sep: char) -> Result<Vec<RawRecord>> {
    let mut rows = read_rows(text, sep)?.into_iter();
    let Some(header) = rows.next() else {
        return Err(Error::MissingColumn("title"));
    };
    let cols = Columns::from_header(&header.cells)?;
    let width = header.cells.len();

    let mut ragged = 0usize;
    let records = rows
        .map(|row| {
            if row.cells.len() > width {
                ragged += 1;
                logd!("line {}: {} cells, header has {}", row.line, row.cells.len(), width);
            }
            cols.record(&row.cells)
        })
        .collect();
    if ragged > 0 {
        logw!("{ragged} row(s) wider than the header; extra cells ignored");
    }
    Ok(records)
}

/// Load the collector's output. A missing file is fatal: the collector has to
/// be re-run.
pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.is_file() {
        return Err(Error::InputMissing(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    if text.trim().is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }

    let records = parse_raw(&text, sniff_delimiter(path, &text))?;
    if records.is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }
    logf!("Loaded {} raw records from {}", records.len(), path.display());
    Ok(records)
}
