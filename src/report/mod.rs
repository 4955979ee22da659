//! Reporting utilities: dashboard summary, data-table query and stock summary.
//!
//! Formatting for the terminal lives in [`format`] so output changes stay local.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::aggregate::parse_record_date;
use crate::domain::{SalesRecord, SortKey, SortOrder};

pub mod format;

pub use format::*;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSummary {
    pub record_count: usize,
    pub product_count: usize,
    pub total_sales: f64,
    pub total_stock_in: f64,
    pub total_stock_out: f64,
    /// Product with the highest summed sales and that sum.
    pub best_seller: Option<(String, f64)>,
    /// Records whose `stock_remaining` is below the threshold.
    pub low_stock_count: usize,
    /// First few of those records in scan order: `(product, stock_remaining)`.
    pub low_stock: Vec<(String, f64)>,
    pub low_stock_threshold: f64,
    /// One entry per product, first-seen order.
    pub stock_overview: Vec<ProductStock>,
}

/// Per-product stock status for the summary card.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStock {
    pub product: String,
    /// Summed `sales` across every record of the product.
    pub total_sold: f64,
    /// `stock_remaining` of the product's latest record, as in [`stock_summary`].
    pub latest_stock: f64,
    /// `latest_stock` below the low-stock threshold.
    pub is_low: bool,
}

/// How many low-stock records the summary lists.
pub const LOW_STOCK_PREVIEW: usize = 3;

pub fn summarize(records: &[SalesRecord], low_stock_threshold: f64) -> DashboardSummary {
    let mut per_product: Vec<(String, f64)> = Vec::new();
    for r in records {
        match per_product.iter_mut().find(|(p, _)| *p == r.product) {
            Some((_, total)) => *total += r.sales,
            None => per_product.push((r.product.clone(), r.sales)),
        }
    }

    // On ties the later product wins.
    let best_seller = per_product.iter().fold(None::<&(String, f64)>, |best, cur| match best {
        Some(b) if b.1 > cur.1 => Some(b),
        _ => Some(cur),
    });

    let low_stock_records: Vec<&SalesRecord> = records
        .iter()
        .filter(|r| r.stock_remaining < low_stock_threshold)
        .collect();

    // Both lists are in first-seen product order.
    let stock_overview = per_product
        .iter()
        .zip(stock_summary(records))
        .map(|((product, sold), (_, latest_stock))| ProductStock {
            product: product.clone(),
            total_sold: *sold,
            latest_stock,
            is_low: latest_stock < low_stock_threshold,
        })
        .collect();

    DashboardSummary {
        record_count: records.len(),
        product_count: per_product.len(),
        total_sales: records.iter().map(|r| r.sales).sum(),
        total_stock_in: records.iter().map(|r| r.stock_in).sum(),
        total_stock_out: records.iter().map(|r| r.stock_out).sum(),
        best_seller: best_seller.cloned(),
        low_stock_count: low_stock_records.len(),
        low_stock: low_stock_records
            .iter()
            .take(LOW_STOCK_PREVIEW)
            .map(|r| (r.product.clone(), r.stock_remaining))
            .collect(),
        low_stock_threshold,
        stock_overview,
    }
}

/// Filters and ordering for the data table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableQuery {
    /// Full English month name, e.g. `July` (case-insensitive).
    pub month: Option<String>,
    pub year: Option<i32>,
    /// Exact product name.
    pub product: Option<String>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub sort_key: SortKey,
    pub order: SortOrder,
}

/// Filter and sort records for display. The sort is stable.
pub fn query_table(records: &[SalesRecord], query: &TableQuery) -> Vec<SalesRecord> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<(Option<NaiveDate>, &SalesRecord)> = records
        .iter()
        .map(|r| (parse_record_date(&r.date), r))
        .filter(|(date, r)| {
            let month_ok = match query.month.as_deref() {
                None => true,
                Some(m) => date.is_some_and(|d| month_name(d).eq_ignore_ascii_case(m.trim())),
            };
            let year_ok = match query.year {
                None => true,
                Some(y) => date.is_some_and(|d| d.year() == y),
            };
            let product_ok = query.product.as_deref().is_none_or(|p| r.product == p);
            let search_ok = search
                .as_deref()
                .is_none_or(|s| r.product.to_lowercase().contains(s));
            month_ok && year_ok && product_ok && search_ok
        })
        .collect();

    rows.sort_by(|(da, a), (db, b)| {
        let ord = match query.sort_key {
            // None (unparsable) sorts before every real date.
            SortKey::Date => da.cmp(db),
            SortKey::Sales => a.sales.partial_cmp(&b.sales).unwrap_or(Ordering::Equal),
            SortKey::StockRemaining => a
                .stock_remaining
                .partial_cmp(&b.stock_remaining)
                .unwrap_or(Ordering::Equal),
            SortKey::Product => a.product.cmp(&b.product),
        };
        match query.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    rows.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Distinct values offered by the table filters, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub months: Vec<String>,
    pub years: Vec<i32>,
    pub products: Vec<String>,
}

pub fn filter_options(records: &[SalesRecord]) -> FilterOptions {
    let mut out = FilterOptions::default();
    let mut months = HashSet::new();
    let mut years = HashSet::new();
    let mut products = HashSet::new();

    for r in records {
        if let Some(d) = parse_record_date(&r.date) {
            let m = month_name(d);
            if months.insert(m.clone()) {
                out.months.push(m);
            }
            if years.insert(d.year()) {
                out.years.push(d.year());
            }
        }
        if products.insert(r.product.as_str()) {
            out.products.push(r.product.clone());
        }
    }
    out
}

/// Latest known `stock_remaining` per product, products in first-seen order.
///
/// The record with the latest parsable date wins; on equal dates the first one
/// seen is kept. Records with unparsable dates only count when nothing better
/// exists for that product.
pub fn stock_summary(records: &[SalesRecord]) -> Vec<(String, f64)> {
    let mut latest: Vec<(String, Option<NaiveDate>, f64)> = Vec::new();
    for r in records {
        let date = parse_record_date(&r.date);
        match latest.iter_mut().find(|(p, _, _)| *p == r.product) {
            Some(entry) => {
                if date > entry.1 {
                    entry.1 = date;
                    entry.2 = r.stock_remaining;
                }
            }
            None => latest.push((r.product.clone(), date, r.stock_remaining)),
        }
    }
    latest.into_iter().map(|(p, _, stock)| (p, stock)).collect()
}

fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, product: &str, sales: f64, stock_remaining: f64) -> SalesRecord {
        SalesRecord {
            date: date.to_string(),
            product: product.to_string(),
            sales,
            stock_in: sales * 2.0,
            stock_out: sales,
            stock_remaining,
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            rec("2025-07-01", "Kaos", 12.0, 38.0),
            rec("2025-07-02", "Celana", 8.0, 32.0),
            rec("2025-07-03", "Jaket", 5.0, 4.0),
            rec("2025-08-01", "Kaos", 3.0, 9.0),
        ]
    }

    #[test]
    fn summary_totals_and_best_seller() {
        let s = summarize(&sample(), 10.0);
        assert_eq!(s.record_count, 4);
        assert_eq!(s.product_count, 3);
        assert_eq!(s.total_sales, 28.0);
        assert_eq!(s.total_stock_in, 56.0);
        assert_eq!(s.total_stock_out, 28.0);
        assert_eq!(s.best_seller, Some(("Kaos".to_string(), 15.0)));
        assert_eq!(s.low_stock_count, 2);
    }

    #[test]
    fn summary_lists_low_stock_entries_and_overview() {
        let mut records = sample();
        records.push(rec("2025-08-02", "Celana", 2.0, 1.0));
        records.push(rec("2025-08-03", "Topi", 1.0, 0.0));
        let s = summarize(&records, 10.0);

        // Jaket@4, Kaos@9, Celana@1, Topi@0 are low; only the first three are listed.
        assert_eq!(s.low_stock_count, 4);
        assert_eq!(
            s.low_stock,
            vec![
                ("Jaket".to_string(), 4.0),
                ("Kaos".to_string(), 9.0),
                ("Celana".to_string(), 1.0),
            ]
        );

        let overview: Vec<_> = s
            .stock_overview
            .iter()
            .map(|p| (p.product.as_str(), p.total_sold, p.latest_stock, p.is_low))
            .collect();
        assert_eq!(
            overview,
            vec![
                ("Kaos", 15.0, 9.0, true),
                ("Celana", 10.0, 1.0, true),
                ("Jaket", 5.0, 4.0, true),
                ("Topi", 1.0, 0.0, true),
            ]
        );

        let relaxed = summarize(&sample(), 5.0);
        assert!(!relaxed.stock_overview[0].is_low);
        assert!(relaxed.stock_overview[2].is_low);
    }

    #[test]
    fn best_seller_tie_goes_to_later_product() {
        let records = vec![rec("2025-07-01", "Kaos", 5.0, 0.0), rec("2025-07-01", "Jaket", 5.0, 0.0)];
        assert_eq!(summarize(&records, 10.0).best_seller, Some(("Jaket".to_string(), 5.0)));
    }

    #[test]
    fn empty_summary() {
        let s = summarize(&[], 10.0);
        assert_eq!(s.best_seller, None);
        assert_eq!(s.total_sales, 0.0);
        assert_eq!(s.low_stock_count, 0);
        assert!(s.low_stock.is_empty());
        assert!(s.stock_overview.is_empty());
    }

    #[test]
    fn default_query_sorts_by_date_descending() {
        let rows = query_table(&sample(), &TableQuery::default());
        let dates: Vec<_> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-08-01", "2025-07-03", "2025-07-02", "2025-07-01"]);
    }

    #[test]
    fn filters_combine() {
        let query = TableQuery {
            month: Some("july".to_string()),
            year: Some(2025),
            search: Some("A".to_string()),
            sort_key: SortKey::Sales,
            order: SortOrder::Asc,
            ..TableQuery::default()
        };
        let rows = query_table(&sample(), &query);
        let products: Vec<_> = rows.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Jaket", "Celana", "Kaos"]);

        let query = TableQuery {
            product: Some("Kaos".to_string()),
            ..TableQuery::default()
        };
        assert_eq!(query_table(&sample(), &query).len(), 2);
    }

    #[test]
    fn unparsable_dates_never_match_date_filters() {
        let mut records = sample();
        records.push(rec("someday", "Kaos", 1.0, 1.0));
        let query = TableQuery {
            year: Some(2025),
            ..TableQuery::default()
        };
        assert_eq!(query_table(&records, &query).len(), 4);

        let asc = TableQuery {
            order: SortOrder::Asc,
            ..TableQuery::default()
        };
        assert_eq!(query_table(&records, &asc)[0].date, "someday");
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let records = vec![
            rec("2025-07-01", "B", 1.0, 0.0),
            rec("2025-07-01", "A", 1.0, 0.0),
            rec("2025-07-01", "C", 1.0, 0.0),
        ];
        let rows = query_table(&records, &TableQuery::default());
        let products: Vec<_> = rows.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["B", "A", "C"]);
    }

    #[test]
    fn filter_options_first_seen() {
        let opts = filter_options(&sample());
        assert_eq!(opts.months, vec!["July".to_string(), "August".to_string()]);
        assert_eq!(opts.years, vec![2025]);
        assert_eq!(opts.products, vec!["Kaos", "Celana", "Jaket"]);
    }

    #[test]
    fn stock_summary_uses_latest_record() {
        let mut records = sample();
        records.push(rec("2025-06-01", "Kaos", 1.0, 100.0));
        records.push(rec("2025-08-01", "Kaos", 1.0, 77.0));
        let summary = stock_summary(&records);
        assert_eq!(
            summary,
            vec![
                ("Kaos".to_string(), 9.0),
                ("Celana".to_string(), 32.0),
                ("Jaket".to_string(), 4.0),
            ]
        );
    }
}
