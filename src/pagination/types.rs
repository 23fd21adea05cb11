//! Pagination types
//!
//! Request descriptors, page results and the fetch plan derived from page 1.

use crate::types::{Method, QueryParameters, Record};
use std::sync::Arc;

/// A complete request for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u32,
    /// Endpoint URL
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Base parameters with the page number injected
    pub params: QueryParameters,
}

/// Builds per-page requests from shared base parameters
///
/// Pure: building a request never touches the shared base, so the builder can
/// be used from any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct PageRequestBuilder {
    url: String,
    method: Method,
    page_param: String,
    base: Arc<QueryParameters>,
}

impl PageRequestBuilder {
    /// Create a builder for `url`, injecting the page index under `page_param`
    pub fn new(
        url: impl Into<String>,
        method: Method,
        page_param: impl Into<String>,
        base: QueryParameters,
    ) -> Self {
        Self {
            url: url.into(),
            method,
            page_param: page_param.into(),
            base: Arc::new(base),
        }
    }

    /// Build the request for `page`
    pub fn build(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            url: self.url.clone(),
            method: self.method,
            params: self.base.overridden(&self.page_param, page),
        }
    }

    /// The shared base parameters
    pub fn base(&self) -> &QueryParameters {
        &self.base
    }

    /// Name of the page-number parameter
    pub fn page_param(&self) -> &str {
        &self.page_param
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Records returned for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// 1-based page index
    pub page: u32,
    /// Records in the order the endpoint returned them
    pub records: Vec<Record>,
    /// Total result size declared by the endpoint (only meaningful on page 1)
    pub declared_total: Option<u64>,
}

impl PageResult {
    /// Create a page result
    pub fn new(page: u32, records: Vec<Record>, declared_total: Option<u64>) -> Self {
        Self {
            page,
            records,
            declared_total,
        }
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether this page carried no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Page size and page count derived once from page 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Records per page, as observed on page 1
    pub page_size: usize,
    /// Declared result size
    pub total_count: u64,
    /// `ceil(total_count / page_size)`, 0 for an empty result
    pub total_pages: u32,
}

impl FetchPlan {
    /// Page indices still to fetch after page 1
    pub fn pending_pages(&self) -> Vec<u32> {
        (2..=self.total_pages).collect()
    }

    /// Whether the result is known to be empty
    pub fn is_empty(&self) -> bool {
        self.total_count == 0 || self.page_size == 0
    }
}
