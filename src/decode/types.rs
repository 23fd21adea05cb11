//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use crate::pagination::PageResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the records and the declared total live in a response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Path to the records collection
    #[serde(default = "default_records_path")]
    pub records_path: String,
    /// Path to the declared total
    #[serde(default = "default_total_path")]
    pub total_path: String,
}

fn default_records_path() -> String {
    "data.diff".to_string()
}

fn default_total_path() -> String {
    "data.total".to_string()
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            total_path: default_total_path(),
        }
    }
}

impl EnvelopeConfig {
    /// Create an envelope config
    pub fn new(records_path: impl Into<String>, total_path: impl Into<String>) -> Self {
        Self {
            records_path: records_path.into(),
            total_path: total_path.into(),
        }
    }
}

/// Outcome of resolving a path inside a JSON document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathLookup<'a> {
    /// The path resolved to a non-null value
    Found(&'a Value),
    /// The path, or one of its parents, is explicitly `null`
    Null,
    /// A key on the path does not exist
    Missing,
}

impl<'a> PathLookup<'a> {
    /// The resolved value, if any
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// Trait for decoding one page of a paginated response
pub trait PageDecoder: Send + Sync {
    /// Decode the body returned for `page`
    fn decode_page(&self, page: u32, body: &str) -> Result<PageResult>;
}
