//! CSV ingest and normalization.
//!
//! This module is responsible for turning a loosely-typed sales/inventory CSV
//! into canonical [`SalesRecord`]s.
//!
//! Design goals:
//! - **Tolerant headers** (`"Stock In"`, `" stock_in "` and `"STOCK_IN"` are the same column)
//! - **Silent degradation** (bad numbers become `0`, rows without date/product are dropped)
//! - **Batch-level failure only** when the CSV itself cannot be read
//! - **Separation of concerns**: no date bucketing here

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::domain::SalesRecord;
use crate::error::AppError;

const BOM: char = '\u{feff}';

/// One CSV row after generic parsing, before any semantic validation.
///
/// Columns keep their raw header text and file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Parse CSV text with a header row into generic rows.
///
/// The delimiter is detected from the header line (see [`sniff_delimiter`]).
/// Blank lines are skipped. Short rows simply lack their trailing columns and
/// cells beyond the header width are ignored. Any reader error fails the
/// whole batch.
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>, AppError> {
    let delimiter = sniff_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and lines are 1-based.
        let record = result.map_err(|e| AppError::input(format!("CSV parse error on line {}: {e}", idx + 2)))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .collect::<RawRow>(),
        );
    }

    debug!(
        rows = rows.len(),
        columns = headers.len(),
        delimiter = %char::from(delimiter).escape_default(),
        "parsed csv"
    );
    Ok(rows)
}

/// Field delimiter of `text`: the first of `,` `\t` `;` `|` that occurs in the
/// header line outside double quotes, or `,` when none does.
///
/// Spreadsheets in comma-decimal locales export with `;`.
pub fn sniff_delimiter(text: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

    let header = text
        .trim_start_matches(BOM)
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let mut seen = [false; CANDIDATES.len()];
    let mut in_quotes = false;
    for b in header.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = CANDIDATES.iter().position(|c| *c == b) {
                seen[i] = true;
            }
        }
    }

    CANDIDATES
        .iter()
        .zip(seen)
        .find_map(|(c, hit)| hit.then_some(*c))
        .unwrap_or(b',')
}

/// Read a local CSV file as text.
///
/// Only files with a `.csv` extension are accepted.
pub fn read_csv_file(path: &Path) -> Result<String, AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(AppError::input(format!(
            "Only CSV files are supported (got '{}').",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::input(format!("CSV '{}' is not valid UTF-8 text.", path.display())))
}

/// Canonical column name: BOM stripped, trimmed, lowercased, whitespace runs
/// collapsed into a single `_`.
pub fn canonical_key(raw: &str) -> String {
    // Excel and friends sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "\u{feff}date").
    let name = raw.trim().trim_start_matches(BOM).trim();
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// Convert raw rows into canonical records, dropping rows without a date or product.
pub fn normalize(rows: &[RawRow]) -> Vec<SalesRecord> {
    let records: Vec<SalesRecord> = rows.iter().filter_map(normalize_row).collect();
    debug!(
        rows = rows.len(),
        kept = records.len(),
        dropped = rows.len() - records.len(),
        "normalized rows"
    );
    records
}

/// Normalize one row; `None` when `date` or `product` is empty after trimming.
pub fn normalize_row(row: &RawRow) -> Option<SalesRecord> {
    let fields = canonical_fields(row);

    let date = text_field(&fields, "date");
    let product = text_field(&fields, "product");
    if date.is_empty() || product.is_empty() {
        return None;
    }

    Some(SalesRecord {
        date,
        product,
        sales: coerce_number(fields.get("sales").copied()),
        stock_in: coerce_number(fields.get("stock_in").copied()),
        stock_out: coerce_number(fields.get("stock_out").copied()),
        stock_remaining: coerce_number(fields.get("stock_remaining").copied()),
    })
}

fn canonical_fields(row: &RawRow) -> HashMap<String, &str> {
    let mut fields = HashMap::with_capacity(row.len());
    for (column, value) in row.iter() {
        let key = canonical_key(column);
        if key.is_empty() {
            continue;
        }
        // Later columns win when two headers collapse onto the same key.
        fields.insert(key, value.trim());
    }
    fields
}

fn text_field(fields: &HashMap<String, &str>, name: &str) -> String {
    fields.get(name).map(|s| s.to_string()).unwrap_or_default()
}

fn coerce_number(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
