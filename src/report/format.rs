//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation/report code stays clean and testable
//! - output changes are localized

use crate::aggregate::{AggregatedRow, parse_record_date};
use crate::domain::{ForecastResponse, Metric, Period, SalesRecord, Trend};
use crate::report::{DashboardSummary, FilterOptions};

const LABEL_WIDTH: usize = 26;
const PRODUCT_WIDTH: usize = 12;

/// Chart rows as a table: one column per product, blank where a product is absent.
pub fn format_chart(rows: &[AggregatedRow], products: &[String], period: Period, metric: Metric) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} by {} ===\n", metric.as_str(), period));

    if rows.is_empty() {
        out.push_str("(no rows with a valid date)\n");
        return out;
    }

    let mut header = format!("{:<LABEL_WIDTH$}", "label");
    let mut rule = format!("{:-<LABEL_WIDTH$}", "");
    for p in products {
        header.push_str(&format!(" {:>PRODUCT_WIDTH$}", truncate(p, PRODUCT_WIDTH)));
        rule.push_str(&format!(" {:-<PRODUCT_WIDTH$}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for row in rows {
        let mut line = format!("{:<LABEL_WIDTH$}", truncate(&row.label, LABEL_WIDTH));
        for p in products {
            let cell = row.get(p).map(fmt_number).unwrap_or_default();
            line.push_str(&format!(" {cell:>PRODUCT_WIDTH$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

pub fn format_summary(s: &DashboardSummary) -> String {
    let mut out = String::new();
    out.push_str("=== Sales dashboard ===\n");
    out.push_str(&format!("Records: {} | Products: {}\n", s.record_count, s.product_count));
    out.push_str(&format!("Total sales: {}\n", fmt_number(s.total_sales)));
    match &s.best_seller {
        Some((product, sold)) => {
            out.push_str(&format!("Best seller: {product} ({} sold)\n", fmt_number(*sold)));
        }
        None => out.push_str("Best seller: N/A\n"),
    }
    out.push_str(&format!(
        "Stock: {} in / {} out\n",
        fmt_number(s.total_stock_in),
        fmt_number(s.total_stock_out)
    ));
    out.push_str(&format!(
        "Low stock entries (< {}): {}\n",
        fmt_number(s.low_stock_threshold),
        s.low_stock_count
    ));
    for (product, left) in &s.low_stock {
        out.push_str(&format!("  ! {product}: only {} left, restock soon\n", fmt_number(*left)));
    }

    if !s.stock_overview.is_empty() {
        out.push_str("\nStock overview:\n");
        out.push_str(&format!("  {:<20} {:>10} {:>10}  status\n", "product", "sold", "stock"));
        for p in &s.stock_overview {
            out.push_str(&format!(
                "  {:<20} {:>10} {:>10}  {}\n",
                truncate(&p.product, 20),
                fmt_number(p.total_sold),
                fmt_number(p.latest_stock),
                if p.is_low { "low" } else { "ok" }
            ));
        }
    }
    out
}

/// Record table, dates shown as `01 Jul 2025` when parsable.
pub fn format_records(records: &[SalesRecord], total: usize) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:<20} {:>10} {:>10} {:>10} {:>10}",
            "date", "product", "sales", "stock_in", "stock_out", "remaining"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<12} {:-<20} {:-<10} {:-<10} {:-<10} {:-<10}\n",
        "", "", "", "", "", ""
    ));

    for r in records {
        let date = parse_record_date(&r.date)
            .map(|d| d.format("%d %b %Y").to_string())
            .unwrap_or_else(|| r.date.clone());
        out.push_str(
            format!(
                "{:<12} {:<20} {:>10} {:>10} {:>10} {:>10}",
                truncate(&date, 12),
                truncate(&r.product, 20),
                fmt_number(r.sales),
                fmt_number(r.stock_in),
                fmt_number(r.stock_out),
                fmt_number(r.stock_remaining),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str(&format!("Showing {} of {} entries\n", records.len(), total));
    out
}

pub fn format_stock_summary(summary: &[(String, f64)]) -> String {
    let mut out = String::from("Latest stock per product:\n");
    for (product, stock) in summary {
        out.push_str(&format!("  {:<20} {:>10}\n", truncate(product, 20), fmt_number(*stock)));
    }
    out
}

pub fn format_filter_options(options: &FilterOptions) -> String {
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    format!(
        "Months: {}\nYears: {}\nProducts: {}\n",
        options.months.join(", "),
        years.join(", "),
        options.products.join(", ")
    )
}

pub fn format_forecast(forecast: &ForecastResponse) -> String {
    let mut out = String::new();
    out.push_str("=== Sales forecast ===\n");
    if forecast.products.is_empty() {
        out.push_str("(the service returned no products)\n");
        return out;
    }

    for p in &forecast.products {
        let trend = Trend::from_label(&p.trend);
        out.push_str(&format!(
            "\n{} {} trend={} recommended_stock={}\n",
            trend.arrow(),
            p.product,
            if p.trend.is_empty() { "-" } else { p.trend.as_str() },
            fmt_number(p.recommended_stock)
        ));
        for point in &p.forecast_detail {
            out.push_str(&format!("  {:<12} {:>10}\n", point.date, fmt_number(point.predicted_sales)));
        }
        if p.forecast_detail.is_empty() && !p.forecast.is_empty() {
            let values: Vec<String> = p.forecast.iter().map(|v| fmt_number(*v)).collect();
            out.push_str(&format!("  [{}]\n", values.join(", ")));
        }
    }
    out
}

/// Whole numbers without a fraction, everything else with at most two decimals.
pub fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{v:.0}");
    }
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// At most `max` characters; cut text ends in `.`.
fn truncate(s: &str, max: usize) -> String {
    if s.char_indices().nth(max).is_none() {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}.")
}
