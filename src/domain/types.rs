//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - persisted in the dataset store as JSON
//! - posted verbatim to the forecast service
//! - exported back to CSV

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Canonical sales/inventory observation for one product on one date.
///
/// Only `date` and `product` are required at import time; every numeric field
/// falls back to `0` when the source cell is missing or unparsable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesRecord {
    /// ISO-8601 calendar date (`YYYY-MM-DD`), kept as the raw trimmed text.
    pub date: String,
    pub product: String,
    #[serde(default)]
    pub sales: f64,
    #[serde(default)]
    pub stock_in: f64,
    #[serde(default)]
    pub stock_out: f64,
    /// May be negative in malformed input; never rejected.
    #[serde(default)]
    pub stock_remaining: f64,
}

/// Time-bucketing resolution for charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Daily, Period::Weekly, Period::Monthly, Period::Yearly];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown period '{s}'. Expected one of: daily, weekly, monthly, yearly."))
    }
}

/// First day of a `weekly` bucket.
///
/// Weeks always span seven days starting on this weekday; the choice is fixed
/// for a whole aggregation and never derived from the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// Which numeric field of a [`SalesRecord`] gets summed per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Sales,
    #[value(name = "stock_in")]
    StockIn,
    #[value(name = "stock_out")]
    StockOut,
    #[value(name = "stock_remaining")]
    StockRemaining,
}

impl Metric {
    pub fn value_of(self, record: &SalesRecord) -> f64 {
        match self {
            Metric::Sales => record.sales,
            Metric::StockIn => record.stock_in,
            Metric::StockOut => record.stock_out,
            Metric::StockRemaining => record.stock_remaining,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::StockIn => "stock_in",
            Metric::StockOut => "stock_out",
            Metric::StockRemaining => "stock_remaining",
        }
    }
}

/// Column used to order the data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    Sales,
    #[value(name = "stock_remaining")]
    StockRemaining,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}
