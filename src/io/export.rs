//! CSV/JSON exports.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; the record export uses the canonical header so it can be imported
//! again as-is.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::aggregate::AggregatedRow;
use crate::domain::{ForecastResponse, SalesRecord};
use crate::error::AppError;

/// Canonical column set, in import order.
pub const CANONICAL_HEADER: [&str; 6] = ["date", "product", "sales", "stock_in", "stock_out", "stock_remaining"];

/// Example file offered to users who don't have data yet.
pub const TEMPLATE_CSV: &str = "date,product,sales,stock_in,stock_out,stock_remaining\n\
2025-07-01,Kaos,12,50,12,38\n\
2025-07-02,Celana,8,40,8,32\n\
2025-07-03,Jaket,5,30,5,25\n";

/// Write the import template.
pub fn write_template_csv(path: &Path) -> Result<(), AppError> {
    let mut file = create(path)?;
    file.write_all(TEMPLATE_CSV.as_bytes())
        .map_err(|e| AppError::input(format!("Failed to write template '{}': {e}", path.display())))
}

/// Write records with the canonical header.
pub fn write_records_csv(path: &Path, records: &[SalesRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    for r in records {
        writer.serialize(r).map_err(|e| write_err(path, e))?;
    }
    // An empty export still carries the header.
    if records.is_empty() {
        writer.write_record(CANONICAL_HEADER).map_err(|e| write_err(path, e))?;
    }
    writer.flush().map_err(|e| write_err(path, e))
}

/// Write chart rows: `label` plus one column per product, blank where absent.
pub fn write_aggregated_csv(path: &Path, rows: &[AggregatedRow], products: &[String]) -> Result<(), AppError> {
    let text = aggregated_csv(rows, products)?;
    create(path)?.write_all(text.as_bytes()).map_err(|e| write_err(path, e))
}

/// Chart rows rendered as CSV text, same layout as [`write_aggregated_csv`].
pub fn aggregated_csv(rows: &[AggregatedRow], products: &[String]) -> Result<String, AppError> {
    let encode_err = |e: csv::Error| AppError::input(format!("Failed to encode chart rows: {e}"));
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["label".to_string()];
    header.extend(products.iter().cloned());
    writer.write_record(&header).map_err(encode_err)?;

    for row in rows {
        let mut record = vec![row.label.clone()];
        record.extend(
            products
                .iter()
                .map(|p| row.get(p).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).map_err(encode_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::input(format!("Failed to encode chart rows: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::input(format!("Failed to encode chart rows: {e}")))
}

/// Write chart rows as a JSON array of flat objects.
pub fn write_aggregated_json(path: &Path, rows: &[AggregatedRow]) -> Result<(), AppError> {
    let file = create(path)?;
    serde_json::to_writer_pretty(file, rows)
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))
}

/// Write one `product,date,predicted_sales` row per forecast detail.
pub fn write_forecast_csv(path: &Path, forecast: &ForecastResponse) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(create(path)?);
    writer
        .write_record(["product", "date", "predicted_sales"])
        .map_err(|e| write_err(path, e))?;
    for p in &forecast.products {
        for point in &p.forecast_detail {
            writer
                .write_record([p.product.as_str(), point.date.as_str(), point.predicted_sales.to_string().as_str()])
                .map_err(|e| write_err(path, e))?;
        }
    }
    writer.flush().map_err(|e| write_err(path, e))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::input(format!("Failed to write '{}': {e}", path.display()))
}
