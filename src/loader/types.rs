//! Loader types
//!
//! Declarative endpoint definition types for YAML parsing.

use crate::decode::{EnvelopeConfig, EnvelopeDecoder, KlineDecoder};
use crate::engine::{RankingConfig, RequestTarget, SnapshotEngine};
use crate::error::Result;
use crate::history::HistoryFetcher;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::output::ColumnSpec;
use crate::types::{Method, QueryParameters};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ============================================================================
// Endpoint Definition
// ============================================================================

/// Top-level endpoint definition, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    /// Paginated, ranked snapshot of a whole collection
    Snapshot(SnapshotDefinition),
    /// Unpaginated klines for one symbol
    History(HistoryDefinition),
}

impl Definition {
    /// Endpoint name
    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Endpoint kind as written in YAML
    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Snapshot(_) => "snapshot",
            Definition::History(_) => "history",
        }
    }

    /// Descriptive metadata
    pub fn metadata(&self) -> &Metadata {
        match self {
            Definition::Snapshot(def) => &def.metadata,
            Definition::History(def) => &def.metadata,
        }
    }

    /// Output columns
    pub fn columns(&self) -> &[ColumnSpec] {
        match self {
            Definition::Snapshot(def) => &def.columns,
            Definition::History(def) => &def.columns,
        }
    }

    /// Snapshot definition, if this is one
    pub fn as_snapshot(&self) -> Option<&SnapshotDefinition> {
        match self {
            Definition::Snapshot(def) => Some(def),
            Definition::History(_) => None,
        }
    }

    /// History definition, if this is one
    pub fn as_history(&self) -> Option<&HistoryDefinition> {
        match self {
            Definition::History(def) => Some(def),
            Definition::Snapshot(_) => None,
        }
    }
}

/// Endpoint metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Endpoint name
    pub name: String,
    /// Human readable title
    #[serde(default)]
    pub title: Option<String>,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Request & Fetch Definitions
// ============================================================================

/// HTTP request definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDefinition {
    /// Endpoint URL
    pub url: String,
    /// HTTP method (POST sends a form body)
    #[serde(default)]
    pub method: Method,
    /// Fixed parameters sent with every request
    #[serde(default)]
    pub params: QueryParameters,
    /// Page-number parameter name
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// Extra request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_page_param() -> String {
    "pn".to_string()
}

impl RequestDefinition {
    /// Request target for the paginated engine
    pub fn target(&self) -> RequestTarget {
        RequestTarget::new(&self.url)
            .with_method(self.method)
            .with_page_param(&self.page_param)
    }
}

/// Fetch tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchDefinition {
    /// Per-page timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum pages in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Optional request rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_concurrency() -> usize {
    4
}

impl Default for FetchDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            rate_limit: None,
        }
    }
}

impl FetchDefinition {
    /// Per-page timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build an HTTP client with this timeout, rate limit and `headers`
    pub fn http_client(&self, headers: &HashMap<String, String>) -> Result<HttpClient> {
        let mut builder = HttpClientConfig::builder().timeout(self.timeout());
        builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        HttpClient::with_config(builder.build())
    }
}

// ============================================================================
// Snapshot Definition
// ============================================================================

/// Paginated snapshot endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDefinition {
    /// Metadata
    pub metadata: Metadata,
    /// Request
    pub request: RequestDefinition,
    /// Envelope paths
    #[serde(default)]
    pub envelope: EnvelopeConfig,
    /// Ranking
    pub ranking: RankingConfig,
    /// Fetch tuning
    #[serde(default)]
    pub fetch: FetchDefinition,
    /// Output columns; empty passes every field through
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl SnapshotDefinition {
    /// HTTP client configured for this endpoint
    pub fn http_client(&self) -> Result<HttpClient> {
        self.fetch.http_client(&self.request.headers)
    }

    /// Engine over `client`
    pub fn engine_with_client(&self, client: HttpClient) -> SnapshotEngine {
        SnapshotEngine::http(
            client,
            EnvelopeDecoder::new(self.envelope.clone()),
            self.request.target(),
            self.ranking.clone(),
        )
    }

    /// Engine with a fresh client
    pub fn engine(&self) -> Result<SnapshotEngine> {
        Ok(self.engine_with_client(self.http_client()?))
    }

    /// Base query sent with every page
    pub fn base_query(&self) -> QueryParameters {
        self.request.params.clone()
    }
}

// ============================================================================
// History Definition
// ============================================================================

/// Kline history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDefinition {
    /// Metadata
    pub metadata: Metadata,
    /// Request
    pub request: RequestDefinition,
    /// Path to the kline strings
    #[serde(default = "default_klines_path")]
    pub records_path: String,
    /// Names of the comma-separated values, in order
    pub fields: Vec<String>,
    /// Fetch tuning
    #[serde(default)]
    pub fetch: FetchDefinition,
    /// Output columns; empty passes every field through
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

fn default_klines_path() -> String {
    "data.klines".to_string()
}

impl HistoryDefinition {
    /// Fetcher with a fresh client
    pub fn fetcher(&self) -> Result<HistoryFetcher> {
        let client = self.fetch.http_client(&self.request.headers)?;
        Ok(self.fetcher_with_client(client))
    }

    /// Fetcher over `client`
    pub fn fetcher_with_client(&self, client: HttpClient) -> HistoryFetcher {
        HistoryFetcher::new(
            client,
            &self.request.url,
            self.request.method,
            self.request.params.clone(),
            KlineDecoder::new(&self.records_path, self.fields.clone()),
        )
    }
}
