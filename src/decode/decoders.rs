//! Decoder implementations

use super::types::{EnvelopeConfig, PageDecoder, PathLookup};
use crate::error::{Error, Result};
use crate::pagination::PageResult;
use crate::types::Record;
use serde_json::Value;

// ============================================================================
// Envelope Decoder
// ============================================================================

/// Decoder for paginated collection envelopes
///
/// ```text
/// {"data": {"total": 5412, "diff": [{"f12": "000001", "f3": 1.2}, ...]}}
/// ```
///
/// The records collection may also be an object whose values are the records,
/// which the upstream returns for some parameter combinations. Its values are
/// read in the order the server sent them, not by key.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeDecoder {
    config: EnvelopeConfig,
}

impl EnvelopeDecoder {
    /// Create a decoder for the given envelope layout
    pub fn new(config: EnvelopeConfig) -> Self {
        Self { config }
    }

    /// Create a decoder from the two paths
    pub fn with_paths(records_path: impl Into<String>, total_path: impl Into<String>) -> Self {
        Self::new(EnvelopeConfig::new(records_path, total_path))
    }

    /// The envelope layout
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    fn extract_records(&self, page: u32, root: &Value) -> Result<Vec<Record>> {
        let collection = match lookup_path(root, &self.config.records_path) {
            PathLookup::Found(v) => v,
            PathLookup::Null => return Ok(Vec::new()),
            PathLookup::Missing => {
                return Err(Error::malformed(
                    page,
                    format!("missing records at '{}'", self.config.records_path),
                ))
            }
        };

        let items: Vec<&Value> = match collection {
            Value::Array(arr) => arr.iter().collect(),
            Value::Object(map) => map.values().collect(),
            other => {
                return Err(Error::malformed(
                    page,
                    format!("records at '{}' are not a collection: {other}", self.config.records_path),
                ))
            }
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record.clone()),
                other => Err(Error::malformed(
                    page,
                    format!("record is not an object: {other}"),
                )),
            })
            .collect()
    }

    fn extract_total(&self, page: u32, root: &Value) -> Result<Option<u64>> {
        let Some(value) = lookup_path(root, &self.config.total_path).value() else {
            return Ok(None);
        };

        parse_count(value).map(Some).ok_or_else(|| {
            Error::malformed(
                page,
                format!("total at '{}' is not a count: {value}", self.config.total_path),
            )
        })
    }
}

impl PageDecoder for EnvelopeDecoder {
    fn decode_page(&self, page: u32, body: &str) -> Result<PageResult> {
        let root: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed(page, format!("invalid JSON: {e}")))?;

        let records = self.extract_records(page, &root)?;

        // Pages past the first are only requested because the plan says they hold data
        if page > 1 && records.is_empty() {
            return Err(Error::EmptyPage { page });
        }

        let declared_total = if page == 1 {
            self.extract_total(page, &root)?
        } else {
            None
        };

        Ok(PageResult::new(page, records, declared_total))
    }
}

// ============================================================================
// Kline Decoder
// ============================================================================

/// Decoder for rows delivered as comma-separated strings
///
/// ```text
/// {"data": {"klines": ["2025-04-18,11.02,11.10,...", ...]}}
/// ```
///
/// Each value is named by position using `fields`. Rows shorter than `fields`
/// get `null` for the missing values; extra values are dropped.
#[derive(Debug, Clone)]
pub struct KlineDecoder {
    records_path: String,
    fields: Vec<String>,
}

impl KlineDecoder {
    /// Create a kline decoder
    pub fn new(records_path: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            records_path: records_path.into(),
            fields,
        }
    }

    /// Decode the body into records; a `null` or absent collection yields no records
    pub fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let root: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;

        let rows = match lookup_path(&root, &self.records_path) {
            PathLookup::Found(Value::Array(rows)) => rows,
            PathLookup::Found(other) => {
                return Err(Error::decode(format!(
                    "klines at '{}' are not an array: {other}",
                    self.records_path
                )))
            }
            PathLookup::Null | PathLookup::Missing => return Ok(Vec::new()),
        };

        rows.iter()
            .enumerate()
            .map(|(idx, row)| {
                let line = row.as_str().ok_or_else(|| {
                    Error::decode(format!("kline {} is not a string: {row}", idx + 1))
                })?;
                Ok(self.split_row(line))
            })
            .collect()
    }

    fn split_row(&self, line: &str) -> Record {
        let mut values = line.split(',');
        self.fields
            .iter()
            .map(|field| {
                let value = values
                    .next()
                    .map_or(Value::Null, |v| Value::String(v.to_string()));
                (field.clone(), value)
            })
            .collect()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolve a dot-separated path, distinguishing `null` from absent keys
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> PathLookup<'a> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current {
            Value::Null => return PathLookup::Null,
            Value::Object(map) => match map.get(part) {
                Some(next) => current = next,
                None => return PathLookup::Missing,
            },
            _ => return PathLookup::Missing,
        }
    }

    if current.is_null() {
        PathLookup::Null
    } else {
        PathLookup::Found(current)
    }
}

/// Read a non-negative count from a number or numeric string
fn parse_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
