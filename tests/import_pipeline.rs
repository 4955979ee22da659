use std::fs;

use salesboard::aggregate::{AggregateOptions, aggregate, distinct_products};
use salesboard::app::pipeline::{ImportSource, build_chart, import_dataset, load_dataset};
use salesboard::data::SheetClient;
use salesboard::domain::{Metric, Period, WeekStart};
use salesboard::error::{EXIT_INPUT, EXIT_NO_DATA};
use salesboard::report::{TableQuery, query_table, summarize};
use salesboard::store::{DatasetSlot, FileStore};

const CSV: &str = "\u{feff}Date,Product,Sales,Stock In,Stock Out,Stock Remaining\n\
2025-07-01,Kaos,12,50,12,38\n\
2025-07-01,Celana,8,40,8,32\n\
2025-07-02,Kaos,5,38,5,33\n\
2025-07-08,Jaket,abc,30,0,30\n\
,Topi,3,10,3,7\n";

#[test]
fn file_import_round_trips_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("penjualan.csv");
    fs::write(&csv_path, CSV).unwrap();

    let store_dir = dir.path().join("store");
    let mut slot = DatasetSlot::new(FileStore::new(&store_dir));
    assert_eq!(load_dataset(&slot).unwrap_err().exit_code(), EXIT_NO_DATA);

    let report = import_dataset(&ImportSource::File(csv_path), &SheetClient::new(), &mut slot).unwrap();
    assert_eq!(report.rows_read, 5);
    assert_eq!(report.records_kept, 4);
    assert!(store_dir.join("salesData.json").exists());

    // A fresh slot over the same directory sees the import.
    let reopened = DatasetSlot::new(FileStore::new(&store_dir));
    let records = load_dataset(&reopened).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[3].product, "Jaket");
    assert_eq!(records[3].sales, 0.0);

    let daily = aggregate(&records, Period::Daily);
    assert_eq!(daily.len(), 3);
    assert_eq!(daily[0].label, "2025-07-01");
    assert_eq!(daily[0].get("Kaos"), Some(12.0));
    assert_eq!(daily[0].get("Celana"), Some(8.0));
    assert_eq!(daily[1].get("Celana"), None);
    assert_eq!(distinct_products(&records), vec!["Kaos", "Celana", "Jaket"]);
}

#[test]
fn weekly_stock_chart_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("data.csv");
    fs::write(&csv_path, CSV).unwrap();
    let mut slot = DatasetSlot::new(FileStore::new(dir.path().join("store")));
    import_dataset(&ImportSource::File(csv_path), &SheetClient::new(), &mut slot).unwrap();
    let records = load_dataset(&slot).unwrap();

    let chart = build_chart(
        &records,
        &AggregateOptions {
            period: Period::Weekly,
            metric: Metric::StockIn,
            week_start: WeekStart::Monday,
        },
    );
    assert_eq!(chart.rows.len(), 2);
    assert_eq!(chart.rows[0].label, "Jun 30 - Jul 06, 2025");
    assert_eq!(chart.rows[0].get("Kaos"), Some(88.0));
    assert_eq!(chart.rows[1].label, "Jul 07 - Jul 13, 2025");
    assert_eq!(chart.rows[1].get("Jaket"), Some(30.0));

    let summary = summarize(&records, 10.0);
    assert_eq!(summary.total_sales, 25.0);
    assert_eq!(summary.best_seller, Some(("Kaos".to_string(), 17.0)));

    let kaos = query_table(
        &records,
        &TableQuery {
            product: Some("Kaos".to_string()),
            ..TableQuery::default()
        },
    );
    assert_eq!(kaos.len(), 2);
    assert_eq!(kaos[0].date, "2025-07-02");
}

#[test]
fn rejected_import_keeps_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.csv");
    let wrong_ext = dir.path().join("data.xlsx");
    fs::write(&good, CSV).unwrap();
    fs::write(&wrong_ext, CSV).unwrap();

    let mut slot = DatasetSlot::new(FileStore::new(dir.path().join("store")));
    import_dataset(&ImportSource::File(good), &SheetClient::new(), &mut slot).unwrap();

    let err = import_dataset(&ImportSource::File(wrong_ext), &SheetClient::new(), &mut slot).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert_eq!(load_dataset(&slot).unwrap().len(), 4);
}

#[test]
fn headers_only_import_stores_an_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "date,product,sales\n").unwrap();

    let mut slot = DatasetSlot::new(FileStore::new(dir.path().join("store")));
    let report = import_dataset(&ImportSource::File(path), &SheetClient::new(), &mut slot).unwrap();
    assert_eq!(report.records_kept, 0);
    assert!(load_dataset(&slot).unwrap().is_empty());
}

#[test]
fn semicolon_delimited_file_imports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ekspor.csv");
    fs::write(
        &path,
        "Date;Product;Sales;Stock In;Stock Out;Stock Remaining\n\
2025-07-01 09:15;Kaos;12;50;12;38\n\
2025-07-01 14:40;Celana;8;40;8;32\n",
    )
    .unwrap();

    let mut slot = DatasetSlot::new(FileStore::new(dir.path().join("store")));
    let report = import_dataset(&ImportSource::File(path), &SheetClient::new(), &mut slot).unwrap();
    assert_eq!(report.records_kept, 2);

    let records = load_dataset(&slot).unwrap();
    let daily = aggregate(&records, Period::Daily);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].label, "2025-07-01");
    assert_eq!(daily[0].get("Kaos"), Some(12.0));
    assert_eq!(daily[0].get("Celana"), Some(8.0));
}
