//! Historical klines
//!
//! A single unpaginated request per symbol. Rows come back as comma-separated
//! strings and are named by position.

mod types;

pub use types::{parse_date, Adjust, HistoryRequest, Period};

use crate::decode::KlineDecoder;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::{Method, QueryParameters, Record};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Field added to every kline record
pub const SYMBOL_FIELD: &str = "symbol";

/// Fetches klines for one symbol at a time
#[derive(Debug, Clone)]
pub struct HistoryFetcher {
    client: HttpClient,
    url: String,
    method: Method,
    base: QueryParameters,
    decoder: KlineDecoder,
}

impl HistoryFetcher {
    /// Create a fetcher; `base` holds the fixed request parameters
    pub fn new(
        client: HttpClient,
        url: impl Into<String>,
        method: Method,
        base: QueryParameters,
        decoder: KlineDecoder,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            method,
            base,
            decoder,
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode klines, tagging each with the symbol
    pub async fn fetch(&self, request: &HistoryRequest, timeout: Duration) -> Result<Vec<Record>> {
        request.validate()?;

        let params = request.to_params(&self.base);
        debug!(secid = %request.secid(), period = %request.period, adjust = %request.adjust, "Requesting klines");

        let config = RequestConfig::new()
            .params(params.to_pairs())
            .timeout(timeout);
        let body = self.client.request_text(self.method, &self.url, config).await?;

        let mut records = self.decoder.decode(&body)?;
        for record in &mut records {
            record.insert(SYMBOL_FIELD.to_string(), Value::String(request.symbol.clone()));
        }

        info!(symbol = %request.symbol, rows = records.len(), "Fetched klines");
        Ok(records)
    }
}

#[cfg(test)]
mod tests;
