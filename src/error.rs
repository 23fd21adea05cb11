//! Error types for snapshot-pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for snapshot-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Network Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Malformed response for page {page}: {message}")]
    MalformedResponse { page: u32, message: String },

    #[error("Page {page} returned no records")]
    EmptyPage { page: u32 },

    #[error("Result set is empty")]
    EmptyResult,

    #[error("Fetch of page {page} failed before planning: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Fetch of page {page} failed: {source}")]
    PartialFetch {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Fetch task failed: {message}")]
    TaskFailed { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(page: u32, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            page,
            message: message.into(),
        }
    }

    /// Attribute a failure to the page it happened on
    ///
    /// Errors that already name a page are returned unchanged.
    pub fn page_fetch(page: u32, source: Error) -> Self {
        if source.page().is_some() {
            return source;
        }
        Self::PageFetch {
            page,
            source: Box::new(source),
        }
    }

    /// Wrap a page failure that happened after page 1 succeeded
    pub fn partial_fetch(page: u32, source: Error) -> Self {
        Self::PartialFetch {
            page,
            source: Box::new(source),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Page index the failure is attributed to, if any
    pub fn page(&self) -> Option<u32> {
        match self {
            Error::MalformedResponse { page, .. }
            | Error::EmptyPage { page }
            | Error::PageFetch { page, .. }
            | Error::PartialFetch { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Check if this is a transport-level failure (connection, status, timeout)
    pub fn is_network(&self) -> bool {
        match self {
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited { .. }
            | Error::Timeout { .. } => true,
            Error::PageFetch { source, .. } => source.is_network(),
            _ => false,
        }
    }

    /// Check if re-running the whole operation may succeed
    ///
    /// Nothing in this crate retries by itself; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            Error::PageFetch { source, .. } | Error::PartialFetch { source, .. } => {
                source.is_retryable()
            }
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for snapshot-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
