//! Common types used throughout snapshot-pager
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One row of upstream data: field name to scalar value
pub type Record = JsonObject;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
///
/// `POST` sends parameters as a form body, `GET` as a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    #[default]
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// A single query parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Base parameters of a collection request (filter, sort hint, field selection)
///
/// Shared read-only by every page request of one fetch. Per-page values are
/// injected into a copy, never into the shared base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParameters(BTreeMap<String, ParamValue>);

impl QueryParameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Copy of these parameters with `key` set to `value`
    #[must_use]
    pub fn overridden(&self, key: &str, value: impl Into<ParamValue>) -> Self {
        let mut copy = self.clone();
        copy.0.insert(key.to_string(), value.into());
        copy
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Render as string pairs for form or query encoding
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let post: reqwest::Method = Method::POST.into();
        assert_eq!(reqwest::Method::POST, post);
    }

    #[test]
    fn test_method_default() {
        assert_eq!(Method::default(), Method::POST);
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::from(2_i64).to_string(), "2");
        assert_eq!(ParamValue::from(1.5).to_string(), "1.5");
        assert_eq!(ParamValue::from("m:0 t:6").to_string(), "m:0 t:6");
    }

    #[test]
    fn test_query_parameters_from_yaml() {
        let params: QueryParameters =
            serde_yaml::from_str("pn: 1\nfid: f3\nratio: 0.5\n").unwrap();
        assert_eq!(params.get("pn"), Some(&ParamValue::Integer(1)));
        assert_eq!(params.get("fid"), Some(&ParamValue::Text("f3".to_string())));
        assert_eq!(params.get("ratio"), Some(&ParamValue::Float(0.5)));
    }

    #[test]
    fn test_overridden_leaves_base_untouched() {
        let base = QueryParameters::new().with("pn", 1_i64).with("pz", 100_i64);
        let page = base.overridden("pn", 7_u32);

        assert_eq!(base.get("pn"), Some(&ParamValue::Integer(1)));
        assert_eq!(page.get("pn"), Some(&ParamValue::Integer(7)));
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_to_pairs_sorted() {
        let params: QueryParameters = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(
            params.to_pairs(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
