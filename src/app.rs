//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads settings
//! - sets up logging
//! - imports CSV data into the dataset slot
//! - prints charts, summaries, tables and forecasts
//! - writes optional exports

use std::path::Path;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::aggregate::AggregateOptions;
use crate::cli::{ChartArgs, Command, ForecastArgs, ImportArgs, OutputFormat, SummaryArgs, TableArgs, TemplateArgs};
use crate::config::Settings;
use crate::data::{ForecastClient, SheetClient};
use crate::error::AppError;
use crate::report::TableQuery;
use crate::store::{DatasetSlot, FileStore};

pub mod pipeline;

use pipeline::ImportSource;

/// Entry point for the `salesboard` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    let mut settings = Settings::from_env()?;
    if let Some(dir) = cli.store_dir {
        settings.store_dir = dir;
    }
    debug!(?settings, "settings resolved");

    let mut slot = DatasetSlot::new(FileStore::new(&settings.store_dir));

    match cli.command {
        Command::Import(args) => handle_import(args, &mut slot),
        Command::Chart(args) => handle_chart(args, &slot),
        Command::Products => handle_products(&slot),
        Command::Summary(args) => handle_summary(args, &slot, &settings),
        Command::Table(args) => handle_table(args, &slot),
        Command::Forecast(args) => handle_forecast(args, &slot, &settings),
        Command::Template(args) => handle_template(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "salesboard=debug" } else { "salesboard=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Logs go to stderr so `--format json|csv` output stays pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_import(args: ImportArgs, slot: &mut DatasetSlot<FileStore>) -> Result<(), AppError> {
    let source = match (args.file, args.url) {
        (Some(path), _) => ImportSource::File(path),
        (None, Some(url)) => ImportSource::Url(url),
        (None, None) => return Err(AppError::input("Pass either --file <csv> or --url <link>.")),
    };

    let report = pipeline::import_dataset(&source, &SheetClient::new(), slot)?;
    println!(
        "Imported {} records ({} of {} rows dropped) into {}",
        report.records_kept,
        report.rows_dropped(),
        report.rows_read,
        slot.store().dir().display()
    );
    Ok(())
}

fn handle_chart(args: ChartArgs, slot: &DatasetSlot<FileStore>) -> Result<(), AppError> {
    let records = pipeline::load_dataset(slot)?;
    let options = AggregateOptions {
        period: args.period,
        metric: args.metric,
        week_start: args.week_start,
    };
    let chart = pipeline::build_chart(&records, &options);

    match args.format {
        OutputFormat::Table => {
            print!(
                "{}",
                crate::report::format_chart(&chart.rows, &chart.products, options.period, options.metric)
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&chart.rows)
                .map_err(|e| AppError::input(format!("Failed to encode chart rows: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            print!("{}", crate::io::aggregated_csv(&chart.rows, &chart.products)?);
        }
    }

    if let Some(path) = &args.export {
        if is_json_path(path) {
            crate::io::write_aggregated_json(path, &chart.rows)?;
        } else {
            crate::io::write_aggregated_csv(path, &chart.rows, &chart.products)?;
        }
    }
    Ok(())
}

fn handle_products(slot: &DatasetSlot<FileStore>) -> Result<(), AppError> {
    let records = pipeline::load_dataset(slot)?;
    for product in crate::aggregate::distinct_products(&records) {
        println!("{product}");
    }
    Ok(())
}

fn handle_summary(args: SummaryArgs, slot: &DatasetSlot<FileStore>, settings: &Settings) -> Result<(), AppError> {
    let records = pipeline::load_dataset(slot)?;
    let threshold = args.low_stock.unwrap_or(settings.low_stock_threshold);
    let summary = crate::report::summarize(&records, threshold);
    print!("{}", crate::report::format_summary(&summary));
    Ok(())
}

fn handle_table(args: TableArgs, slot: &DatasetSlot<FileStore>) -> Result<(), AppError> {
    let records = pipeline::load_dataset(slot)?;
    if args.list_filters {
        print!("{}", crate::report::format_filter_options(&crate::report::filter_options(&records)));
        return Ok(());
    }

    let query = TableQuery {
        month: args.month,
        year: args.year,
        product: args.product,
        search: args.search,
        sort_key: args.sort,
        order: args.order,
    };
    let rows = crate::report::query_table(&records, &query);

    print!("{}", crate::report::format_records(&rows, records.len()));
    println!();
    print!("{}", crate::report::format_stock_summary(&crate::report::stock_summary(&rows)));

    if let Some(path) = &args.export {
        crate::io::write_records_csv(path, &rows)?;
    }
    Ok(())
}

fn handle_forecast(args: ForecastArgs, slot: &DatasetSlot<FileStore>, settings: &Settings) -> Result<(), AppError> {
    let records = pipeline::load_dataset(slot)?;
    let url = args.url.unwrap_or_else(|| settings.forecast_url.clone());
    let forecast = ForecastClient::new(url).predict(&records)?;

    if args.json {
        let json = serde_json::to_string_pretty(&forecast)
            .map_err(|e| AppError::input(format!("Failed to encode forecast: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_forecast(&forecast));
    }

    if let Some(path) = &args.export {
        crate::io::write_forecast_csv(path, &forecast)?;
    }
    Ok(())
}

fn handle_template(args: TemplateArgs) -> Result<(), AppError> {
    crate::io::write_template_csv(&args.out)?;
    println!("Wrote template to {}", args.out.display());
    Ok(())
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
