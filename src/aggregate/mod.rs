//! Time-bucketed aggregation for charts.
//!
//! Records are grouped by a period label derived from their date and a numeric
//! field is summed per `(label, product)` pair. Output rows keep the order in
//! which labels were first seen while scanning the input; nothing is sorted.

use std::collections::{HashMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::domain::{Metric, Period, SalesRecord, WeekStart};

pub mod period;

pub use period::{parse_record_date, period_label, week_start_of};

/// Knobs for [`aggregate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateOptions {
    pub period: Period,
    pub metric: Metric,
    pub week_start: WeekStart,
}

/// One chart row: a bucket label plus the summed value of each product seen in it.
///
/// Products absent from the bucket are omitted, not zero-filled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedRow {
    pub label: String,
    pub values: Vec<(String, f64)>,
}

impl AggregatedRow {
    pub fn get(&self, product: &str) -> Option<f64> {
        self.values.iter().find(|(p, _)| p == product).map(|(_, v)| *v)
    }

    fn add(&mut self, product: &str, amount: f64) {
        match self.values.iter_mut().find(|(p, _)| p == product) {
            Some((_, total)) => *total += amount,
            None => self.values.push((product.to_string(), amount)),
        }
    }
}

// Flat object: {"label": "...", "<product>": value, ...}
// A product literally named "label" is left out so the key stays unique.
impl Serialize for AggregatedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let products = self.values.iter().filter(|(product, _)| product != LABEL_KEY);
        let mut map = serializer.serialize_map(Some(products.clone().count() + 1))?;
        map.serialize_entry(LABEL_KEY, &self.label)?;
        for (product, value) in products {
            map.serialize_entry(product, value)?;
        }
        map.end()
    }
}

const LABEL_KEY: &str = "label";

/// Sum `sales` per product into buckets of the given period.
pub fn aggregate(records: &[SalesRecord], period: Period) -> Vec<AggregatedRow> {
    aggregate_with(
        records,
        &AggregateOptions {
            period,
            ..AggregateOptions::default()
        },
    )
}

/// Sum `options.metric` per product into buckets of `options.period`.
///
/// Records whose date does not parse contribute to no bucket.
pub fn aggregate_with(records: &[SalesRecord], options: &AggregateOptions) -> Vec<AggregatedRow> {
    let mut rows: Vec<AggregatedRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(date) = parse_record_date(&record.date) else {
            skipped += 1;
            continue;
        };

        let label = period_label(date, options.period, options.week_start);
        let slot = *index.entry(label).or_insert_with_key(|label| {
            rows.push(AggregatedRow {
                label: label.clone(),
                values: Vec::new(),
            });
            rows.len() - 1
        });
        rows[slot].add(&record.product, options.metric.value_of(record));
    }

    debug!(
        period = %options.period,
        metric = options.metric.as_str(),
        buckets = rows.len(),
        skipped,
        "aggregated records"
    );
    rows
}

/// Every distinct product in first-seen order, regardless of date validity.
pub fn distinct_products(records: &[SalesRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.product.as_str()))
        .map(|r| r.product.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn rec(date: &str, product: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            date: date.to_string(),
            product: product.to_string(),
            sales,
            ..SalesRecord::default()
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            rec("2025-07-01", "Kaos", 12.0),
            rec("2025-07-01", "Celana", 8.0),
            rec("2025-07-02", "Kaos", 5.0),
        ]
    }

    #[test]
    fn daily_example() {
        let rows = aggregate(&sample(), Period::Daily);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "2025-07-01");
        assert_eq!(rows[0].values, vec![("Kaos".to_string(), 12.0), ("Celana".to_string(), 8.0)]);
        assert_eq!(rows[1].label, "2025-07-02");
        assert_eq!(rows[1].values, vec![("Kaos".to_string(), 5.0)]);
        assert_eq!(rows[1].get("Celana"), None);
    }

    #[test]
    fn monthly_example() {
        let rows = aggregate(&sample(), Period::Monthly);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "2025-07");
        assert_eq!(rows[0].get("Kaos"), Some(17.0));
        assert_eq!(rows[0].get("Celana"), Some(8.0));
    }

    #[test]
    fn labels_keep_first_seen_order() {
        let records = vec![
            rec("2025-08-01", "Kaos", 1.0),
            rec("2025-07-01", "Kaos", 1.0),
            rec("2025-08-15", "Jaket", 1.0),
        ];
        let labels: Vec<_> = aggregate(&records, Period::Monthly)
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["2025-08", "2025-07"]);
    }

    #[test]
    fn unparsable_dates_are_skipped() {
        let records = vec![
            rec("2025-07-01", "Kaos", 1.0),
            rec("not a date", "Kaos", 100.0),
            rec("2025-02-30", "Kaos", 100.0),
        ];
        let rows = aggregate(&records, Period::Yearly);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Kaos"), Some(1.0));
        // Still listed as a product.
        assert_eq!(distinct_products(&records), vec!["Kaos".to_string()]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(&[], Period::Weekly).is_empty());
        assert!(distinct_products(&[]).is_empty());
    }

    #[test]
    fn sums_do_not_depend_on_input_order() {
        let mut records = Vec::new();
        for day in 1..=28 {
            for (i, product) in ["Kaos", "Celana", "Jaket"].iter().enumerate() {
                records.push(rec(&format!("2025-02-{day:02}"), product, (day * (i + 1)) as f64));
            }
        }
        let expected = aggregate(&records, Period::Weekly);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            let mut shuffled = records.clone();
            shuffled.shuffle(&mut rng);
            let got = aggregate(&shuffled, Period::Weekly);
            assert_eq!(got.len(), expected.len());
            for row in &expected {
                let other = got.iter().find(|r| r.label == row.label).unwrap();
                for (product, value) in &row.values {
                    assert_eq!(other.get(product), Some(*value));
                }
            }
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = sample();
        assert_eq!(aggregate(&records, Period::Weekly), aggregate(&records, Period::Weekly));
    }

    #[test]
    fn other_metrics_can_be_summed() {
        let mut records = sample();
        records[0].stock_in = 50.0;
        records[2].stock_in = 10.0;
        let rows = aggregate_with(
            &records,
            &AggregateOptions {
                period: Period::Monthly,
                metric: Metric::StockIn,
                week_start: WeekStart::Monday,
            },
        );
        assert_eq!(rows[0].get("Kaos"), Some(60.0));
        assert_eq!(rows[0].get("Celana"), Some(0.0));
    }

    #[test]
    fn serializes_as_flat_object() {
        let rows = aggregate(&sample(), Period::Daily);
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(json, r#"{"label":"2025-07-01","Kaos":12.0,"Celana":8.0}"#);
    }

    #[test]
    fn product_named_label_does_not_repeat_the_key() {
        let records = vec![rec("2025-07-01", "label", 3.0), rec("2025-07-01", "Kaos", 12.0)];
        let rows = aggregate(&records, Period::Daily);
        assert_eq!(rows[0].get("label"), Some(3.0));
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(json, r#"{"label":"2025-07-01","Kaos":12.0}"#);
    }
}
