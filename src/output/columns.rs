//! Column selection and coercion
//!
//! Turns records into a rectangular [`Frame`]: pick fields, rename them and
//! coerce each value to its column kind. Values that fail coercion become
//! empty cells rather than errors.

use crate::engine::AggregatedTable;
use crate::types::{JsonObject, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Kind a column is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Verbatim text
    #[default]
    Text,
    /// Floating point number
    Number,
    /// Calendar date (`YYYY-MM-DD` or `YYYYMMDD`)
    Date,
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Field read from each record
    pub source: String,
    /// Header written for the column
    pub name: String,
    /// Coercion applied to the value
    #[serde(default)]
    pub kind: ColumnKind,
}

impl ColumnSpec {
    /// Create a column
    pub fn new(source: impl Into<String>, name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
            kind,
        }
    }

    /// Text column
    pub fn text(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(source, name, ColumnKind::Text)
    }

    /// Numeric column
    pub fn number(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(source, name, ColumnKind::Number)
    }

    /// Date column
    pub fn date(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(source, name, ColumnKind::Date)
    }
}

/// A single coerced value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text value
    Text(String),
    /// Finite number
    Number(f64),
    /// Calendar date
    Date(NaiveDate),
    /// Missing or uncoercible value
    Null,
}

impl Cell {
    /// Coerce `value` to `kind`
    pub fn coerce(value: Option<&Value>, kind: ColumnKind) -> Self {
        let Some(value) = value else {
            return Cell::Null;
        };
        match kind {
            ColumnKind::Text => match value {
                Value::Null => Cell::Null,
                Value::String(s) => Cell::Text(s.clone()),
                other => Cell::Text(other.to_string()),
            },
            ColumnKind::Number => to_number(value).map_or(Cell::Null, Cell::Number),
            ColumnKind::Date => to_date(value).map_or(Cell::Null, Cell::Date),
        }
    }

    /// Keep numbers as numbers and everything else as text
    pub fn passthrough(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Null,
            Some(Value::Number(n)) => n.as_f64().map_or(Cell::Null, Cell::Number),
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(other) => Cell::Text(other.to_string()),
        }
    }

    /// Whether the cell is empty
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Null => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Cell::Null => serializer.serialize_none(),
        }
    }
}

fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn to_date(value: &Value) -> Option<NaiveDate> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&text, "%Y%m%d"))
        .ok()
}

/// Rectangular output: headers plus rows of cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Column headers
    pub headers: Vec<String>,
    /// Rows, each with one cell per header
    pub rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Project a ranked table, putting the rank column first when passing through
    pub fn from_table(table: &AggregatedTable, columns: &[ColumnSpec]) -> Self {
        if columns.is_empty() {
            passthrough(table.rows(), Some(table.rank_field()))
        } else {
            project(table.rows(), columns)
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of the named column
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Rows as JSON objects keyed by header
    pub fn to_json_rows(&self) -> Vec<JsonObject> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .map(|(h, cell)| {
                        let value = serde_json::to_value(cell).unwrap_or(Value::Null);
                        (h.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Select, rename and coerce the configured columns
pub fn project(records: &[Record], columns: &[ColumnSpec]) -> Frame {
    let headers = columns.iter().map(|c| c.name.clone()).collect();
    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| Cell::coerce(record.get(&c.source), c.kind))
                .collect()
        })
        .collect();
    Frame { headers, rows }
}

/// Keep every field: `lead` first (if present), then the rest in name order
pub fn passthrough(records: &[Record], lead: Option<&str>) -> Frame {
    let mut names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();

    let mut headers: Vec<String> = Vec::with_capacity(names.len());
    if let Some(lead) = lead {
        if names.remove(lead) {
            headers.push(lead.to_string());
        }
    }
    headers.extend(names.into_iter().map(str::to_string));

    let rows = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|h| Cell::passthrough(record.get(h)))
                .collect()
        })
        .collect();
    Frame { headers, rows }
}
