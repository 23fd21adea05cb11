//! Aggregation and ranking
//!
//! Concatenation keeps whatever order the pages arrived in. Ranking is what
//! makes the final order depend on the data alone.

use crate::pagination::PageResult;
use crate::types::Record;
use serde_json::Value;
use std::cmp::Ordering;

/// Concatenate page 1 with the remaining pages in the order given
pub fn aggregate(first: PageResult, rest: Vec<PageResult>) -> Vec<Record> {
    let capacity = first.len() + rest.iter().map(PageResult::len).sum::<usize>();
    let mut records = Vec::with_capacity(capacity);
    records.extend(first.records);
    for page in rest {
        records.extend(page.records);
    }
    records
}

/// Numeric value of `key` in `record`
///
/// Numbers and numeric strings coerce; anything else (missing, null, `"-"`,
/// non-finite) is `None`.
pub fn sort_value(record: &Record, key: &str) -> Option<f64> {
    let value = match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

/// Descending order with `None` after every number
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort records by `sort_key` descending and write a 1-based rank into `rank_field`
///
/// The sort is stable, so equal keys keep their aggregated order.
pub fn rank_records(records: Vec<Record>, sort_key: &str, rank_field: &str) -> Vec<Record> {
    let mut keyed: Vec<(Option<f64>, Record)> = records
        .into_iter()
        .map(|record| (sort_value(&record, sort_key), record))
        .collect();

    keyed.sort_by(|a, b| descending(a.0, b.0));

    keyed
        .into_iter()
        .enumerate()
        .map(|(idx, (_, mut record))| {
            record.insert(rank_field.to_string(), Value::from(idx + 1));
            record
        })
        .collect()
}
