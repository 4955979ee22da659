//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! import/aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{Metric, Period, SortKey, SortOrder, WeekStart};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesboard", version, about = "Sales & inventory CSV dashboard")]
pub struct Cli {
    /// Directory holding the imported dataset (overrides SALESBOARD_STORE_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Verbose logging to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a CSV file or a published Google Sheets CSV link, replacing the current dataset.
    Import(ImportArgs),
    /// Aggregate the dataset per period and product.
    Chart(ChartArgs),
    /// List the distinct products in the dataset.
    Products,
    /// Print headline totals, best seller and low-stock count.
    Summary(SummaryArgs),
    /// Filter, sort and print (or export) the records.
    Table(TableArgs),
    /// Send the dataset to the forecast service and print its predictions.
    Forecast(ForecastArgs),
    /// Write the CSV template.
    Template(TemplateArgs),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ImportArgs {
    /// Local CSV file.
    #[arg(long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Published spreadsheet link that serves CSV.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[arg(short, long, value_enum, default_value_t = Period::Daily)]
    pub period: Period,

    /// Field summed per bucket.
    #[arg(short, long, value_enum, default_value_t = Metric::Sales)]
    pub metric: Metric,

    /// First day of weekly buckets.
    #[arg(long, value_enum, default_value_t = WeekStart::Monday)]
    pub week_start: WeekStart,

    /// Output format on stdout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write the rows to a file (`.json` for JSON, CSV otherwise).
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Entries with stock_remaining below this count as low stock.
    #[arg(long, value_name = "N")]
    pub low_stock: Option<f64>,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    /// Full month name, e.g. July.
    #[arg(long)]
    pub month: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    /// Exact product name.
    #[arg(long)]
    pub product: Option<String>,

    /// Case-insensitive product search.
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = SortKey::Date)]
    pub sort: SortKey,

    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Write the filtered rows to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Only list the months, years and products available as filters.
    #[arg(long)]
    pub list_filters: bool,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Print the raw service response as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write `product,date,predicted_sales` rows to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Forecast endpoint (overrides SALESBOARD_FORECAST_URL).
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[arg(long, value_name = "PATH", default_value = "template_sales_data.csv")]
    pub out: PathBuf,
}
