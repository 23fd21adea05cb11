//! Engine types
//!
//! Ranking configuration, request target, fetch statistics and the final table.

use crate::error::{Error, Result};
use crate::pagination::FetchPlan;
use crate::types::{Method, Record};
use serde::{Deserialize, Serialize};

/// Where page requests go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTarget {
    /// Endpoint URL
    pub url: String,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// Name of the page-number parameter
    #[serde(default = "default_page_param")]
    pub page_param: String,
}

fn default_page_param() -> String {
    "pn".to_string()
}

impl RequestTarget {
    /// Create a POST target with the default page parameter
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::default(),
            page_param: default_page_param(),
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the page-number parameter name
    #[must_use]
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = param.into();
        self
    }
}

/// How the aggregated records are ranked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Numeric field sorted in descending order
    pub sort_key: String,
    /// Field that receives the 1-based rank
    #[serde(default = "default_rank_field")]
    pub rank_field: String,
}

fn default_rank_field() -> String {
    "rank".to_string()
}

impl RankingConfig {
    /// Rank by `sort_key` into the default `rank` field
    pub fn new(sort_key: impl Into<String>) -> Self {
        Self {
            sort_key: sort_key.into(),
            rank_field: default_rank_field(),
        }
    }

    /// Set the rank field name
    #[must_use]
    pub fn with_rank_field(mut self, field: impl Into<String>) -> Self {
        self.rank_field = field.into();
        self
    }
}

/// Statistics from one paginated fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Pages fetched, page 1 included
    pub pages_fetched: usize,
    /// Records received across all pages
    pub records_fetched: usize,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl FetchStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a page and its records
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_fetched += records;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Records of every page, sorted and ranked
///
/// Each row carries its rank under [`AggregatedTable::rank_field`]; rows are
/// stored in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTable {
    rows: Vec<Record>,
    ranking: RankingConfig,
    plan: FetchPlan,
    stats: FetchStats,
}

impl AggregatedTable {
    /// Create a table from ranked rows
    pub fn new(rows: Vec<Record>, ranking: RankingConfig, plan: FetchPlan, stats: FetchStats) -> Self {
        Self {
            rows,
            ranking,
            plan,
            stats,
        }
    }

    /// Create an empty table
    pub fn empty(ranking: RankingConfig, plan: FetchPlan, stats: FetchStats) -> Self {
        Self::new(Vec::new(), ranking, plan, stats)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in rank order
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Consume the table, returning rows in rank order
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Iterate over rows in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    /// Row with the given 1-based rank
    pub fn by_rank(&self, rank: usize) -> Option<&Record> {
        rank.checked_sub(1).and_then(|idx| self.rows.get(idx))
    }

    /// Name of the sort key
    pub fn sort_key(&self) -> &str {
        &self.ranking.sort_key
    }

    /// Name of the injected rank field
    pub fn rank_field(&self) -> &str {
        &self.ranking.rank_field
    }

    /// Plan the table was fetched with
    pub fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    /// Fetch statistics
    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    /// Fail with [`Error::EmptyResult`] if the table has no rows
    pub fn non_empty(self) -> Result<Self> {
        if self.rows.is_empty() {
            Err(Error::EmptyResult)
        } else {
            Ok(self)
        }
    }
}

impl<'a> IntoIterator for &'a AggregatedTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
