//! HTTP client module
//!
//! Provides the transport used by page fetchers and the history fetch.
//!
//! # Features
//!
//! - **Form and query encoding**: POST bodies are form-encoded, GET uses the query string
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Typed failures**: timeouts, rate limits and status codes map to distinct errors

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
