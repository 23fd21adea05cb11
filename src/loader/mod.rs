//! YAML Loader module
//!
//! Parse endpoint definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `Definition` - Declarative endpoint specification, tagged by `kind`
//! - `SnapshotDefinition` / `HistoryDefinition` - The two endpoint shapes
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_definition, load_definition_from_str, validate_definition};
pub use types::{
    Definition, FetchDefinition, HistoryDefinition, Metadata, RequestDefinition,
    SnapshotDefinition,
};
