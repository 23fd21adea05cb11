//! Output module
//!
//! Shapes ranked records into columns and writes them out.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Selecting, renaming and coercing columns (`project`)
//! - Passing every field through with the rank column first (`passthrough`)
//! - Writing CSV files, including the dated `YYYY-MM-DD.csv` layout

mod columns;
mod writer;

pub use columns::{passthrough, project, Cell, ColumnKind, ColumnSpec, Frame};
pub use writer::{dated_path, today_path, CsvWriter, CsvWriterConfig};

#[cfg(test)]
mod tests;
