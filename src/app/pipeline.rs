//! Shared import/chart logic used by the CLI front-end and the tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV text -> raw rows -> canonical records -> dataset slot -> chart rows
//!
//! A read or parse failure returns before the slot is touched, so a failed
//! import never clobbers the previous dataset.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::aggregate::{AggregateOptions, AggregatedRow, aggregate_with, distinct_products};
use crate::data::SheetClient;
use crate::domain::SalesRecord;
use crate::error::AppError;
use crate::io::ingest::{normalize, parse_csv, read_csv_file};
use crate::store::{DatasetSlot, KeyValueStore};

/// Where an import reads its CSV text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    File(PathBuf),
    /// A published spreadsheet link serving CSV.
    Url(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_read: usize,
    pub records_kept: usize,
}

impl ImportReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.records_kept
    }
}

/// Chart-ready output: bucket rows plus the series (products) to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub rows: Vec<AggregatedRow>,
    pub products: Vec<String>,
}

/// Read `source`, normalize it and overwrite the dataset slot.
pub fn import_dataset<S: KeyValueStore>(
    source: &ImportSource,
    sheets: &SheetClient,
    slot: &mut DatasetSlot<S>,
) -> Result<ImportReport, AppError> {
    let text = match source {
        ImportSource::File(path) => read_csv_file(path)?,
        ImportSource::Url(url) => sheets.fetch_csv(url)?,
    };
    import_text(&text, slot)
}

/// Parse + normalize CSV text and overwrite the dataset slot.
pub fn import_text<S: KeyValueStore>(text: &str, slot: &mut DatasetSlot<S>) -> Result<ImportReport, AppError> {
    let rows = parse_csv(text)?;
    let records = normalize(&rows);

    if records.is_empty() {
        warn!(rows = rows.len(), "import produced no usable records");
    }

    slot.replace(&records)?;

    let report = ImportReport {
        rows_read: rows.len(),
        records_kept: records.len(),
    };
    info!(rows = report.rows_read, kept = report.records_kept, "dataset replaced");
    Ok(report)
}

/// Load the current dataset, failing when nothing has been imported yet.
pub fn load_dataset<S: KeyValueStore>(slot: &DatasetSlot<S>) -> Result<Vec<SalesRecord>, AppError> {
    slot.load()?
        .ok_or_else(|| AppError::no_data("No dataset imported yet. Run `salesboard import --file <csv>` first."))
}

/// Recompute chart data; call again whenever the records or options change.
pub fn build_chart(records: &[SalesRecord], options: &AggregateOptions) -> ChartData {
    ChartData {
        rows: aggregate_with(records, options),
        products: distinct_products(records),
    }
}
