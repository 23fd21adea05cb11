//! Tests for output module

use super::*;
use crate::engine::{AggregatedTable, FetchStats, RankingConfig};
use crate::pagination::FetchPlan;
use crate::types::Record;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn spot_rows() -> Vec<Record> {
    vec![
        record(json!({"rank": 1, "f12": "600000", "f14": "浦发银行", "f2": 10.5, "f3": 2.1})),
        record(json!({"rank": 2, "f12": "000001", "f14": "平安银行", "f2": "-", "f3": -0.4})),
    ]
}

fn spot_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::number("rank", "index"),
        ColumnSpec::text("f12", "code"),
        ColumnSpec::text("f14", "name"),
        ColumnSpec::number("f2", "price"),
        ColumnSpec::number("f3", "pct_change"),
    ]
}

// ============================================================================
// Column Projection Tests
// ============================================================================

#[test]
fn test_project_selects_and_renames() {
    let frame = project(&spot_rows(), &spot_columns());

    assert_eq!(frame.headers, vec!["index", "code", "name", "price", "pct_change"]);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame.rows[0][1], Cell::Text("600000".to_string()));
    assert_eq!(frame.rows[0][3], Cell::Number(10.5));
}

#[test]
fn test_project_unparseable_number_is_null() {
    let frame = project(&spot_rows(), &spot_columns());
    let prices = frame.column("price").unwrap();
    assert_eq!(prices, vec![&Cell::Number(10.5), &Cell::Null]);
}

#[test]
fn test_project_missing_field_is_null() {
    let frame = project(&spot_rows(), &[ColumnSpec::text("f99", "missing")]);
    assert!(frame.rows.iter().all(|row| row[0].is_null()));
}

#[test]
fn test_coerce_number_from_string() {
    assert_eq!(
        Cell::coerce(Some(&json!(" 3.25 ")), ColumnKind::Number),
        Cell::Number(3.25)
    );
}

#[test]
fn test_coerce_dates() {
    let expected = Cell::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(Cell::coerce(Some(&json!("2024-03-01")), ColumnKind::Date), expected);
    assert_eq!(Cell::coerce(Some(&json!("20240301")), ColumnKind::Date), expected);
    assert_eq!(Cell::coerce(Some(&json!(20240301)), ColumnKind::Date), expected);
    assert_eq!(Cell::coerce(Some(&json!("March")), ColumnKind::Date), Cell::Null);
}

#[test]
fn test_coerce_text_from_number() {
    assert_eq!(
        Cell::coerce(Some(&json!(42)), ColumnKind::Text),
        Cell::Text("42".to_string())
    );
    assert_eq!(Cell::coerce(Some(&json!(null)), ColumnKind::Text), Cell::Null);
}

#[test]
fn test_cell_display() {
    assert_eq!(Cell::Number(2.5).to_string(), "2.5");
    assert_eq!(Cell::Number(3.0).to_string(), "3");
    assert_eq!(Cell::Null.to_string(), "");
    assert_eq!(
        Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()).to_string(),
        "2024-01-09"
    );
}

#[test]
fn test_passthrough_puts_lead_first() {
    let frame = passthrough(&spot_rows(), Some("rank"));
    assert_eq!(frame.headers, vec!["rank", "f12", "f14", "f2", "f3"]);
    assert_eq!(frame.rows[1][0], Cell::Number(2.0));
    assert_eq!(frame.rows[1][3], Cell::Text("-".to_string()));
}

#[test]
fn test_passthrough_unions_keys() {
    let rows = vec![record(json!({"a": 1})), record(json!({"b": "x"}))];
    let frame = passthrough(&rows, None);
    assert_eq!(frame.headers, vec!["a", "b"]);
    assert_eq!(frame.rows[0][1], Cell::Null);
    assert_eq!(frame.rows[1][0], Cell::Null);
}

#[test]
fn test_frame_from_table() {
    let table = AggregatedTable::new(
        spot_rows(),
        RankingConfig::new("f3"),
        FetchPlan {
            page_size: 2,
            total_count: 2,
            total_pages: 1,
        },
        FetchStats::new(),
    );

    let frame = Frame::from_table(&table, &[]);
    assert_eq!(frame.headers[0], "rank");

    let frame = Frame::from_table(&table, &spot_columns());
    assert_eq!(frame.headers[0], "index");
}

#[test]
fn test_to_json_rows() {
    let frame = project(&spot_rows(), &spot_columns());
    let rows = frame.to_json_rows();
    assert_eq!(rows[0]["code"], json!("600000"));
    assert_eq!(rows[1]["price"], json!(null));
    assert_eq!(rows[1]["pct_change"], json!(-0.4));
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

#[test]
fn test_render_csv() {
    let frame = project(&spot_rows(), &spot_columns());
    let csv = CsvWriter::new().render(&frame).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "index,code,name,price,pct_change");
    assert_eq!(lines[1], "1,600000,浦发银行,10.5,2.1");
    assert_eq!(lines[2], "2,000001,平安银行,,-0.4");
}

#[test]
fn test_render_without_header() {
    let frame = project(&spot_rows(), &spot_columns());
    let writer = CsvWriter::with_config(CsvWriterConfig::new().with_header(false));
    let csv = writer.render(&frame).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.starts_with("1,600000"));
}

#[test]
fn test_render_custom_delimiter() {
    let frame = project(&spot_rows(), &spot_columns()[..2]);
    let writer = CsvWriter::with_config(CsvWriterConfig::new().with_delimiter(b'\t'));
    let csv = writer.render(&frame).unwrap();
    assert!(csv.starts_with("index\tcode\n"));
}

#[test]
fn test_render_quotes_commas() {
    let rows = vec![record(json!({"name": "a,b"}))];
    let frame = project(&rows, &[ColumnSpec::text("name", "name")]);
    let csv = CsvWriter::new().render(&frame).unwrap();
    assert_eq!(csv, "name\n\"a,b\"\n");
}

#[test]
fn test_write_path_creates_dirs() {
    let dir = tempdir().unwrap();
    let path = dated_path(
        &dir.path().join("csv"),
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
    );
    assert!(path.ends_with("csv/2024-05-17.csv"));

    let frame = project(&spot_rows(), &spot_columns());
    CsvWriter::new().write_path(&frame, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("index,code,name"));
    assert_eq!(written.lines().count(), 3);
}

#[test]
fn test_write_path_overwrites() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

    let frame = project(&spot_rows()[..1], &spot_columns());
    CsvWriter::new().write_path(&frame, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 2);
}

#[test]
fn test_write_path_without_dir_creation_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    let writer = CsvWriter::with_config(CsvWriterConfig::new().with_create_parent_dirs(false));

    let frame = project(&spot_rows(), &spot_columns());
    let err = writer.write_path(&frame, &path).unwrap_err();
    assert!(matches!(err, crate::error::Error::Output { .. }));
}

#[test]
fn test_today_path_has_csv_extension() {
    let path = today_path(std::path::Path::new("csv"));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
}
