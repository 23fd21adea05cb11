//! Page fetchers
//!
//! A [`PageFetcher`] performs exactly one round trip per call and never
//! retries.

use crate::decode::PageDecoder;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{PageRequest, PageResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Fetches and parses a single page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Execute `request`, giving up after `timeout`
    async fn fetch_page(&self, request: &PageRequest, timeout: Duration) -> Result<PageResult>;
}

/// Page fetcher backed by the HTTP client
pub struct HttpPageFetcher {
    client: HttpClient,
    decoder: Box<dyn PageDecoder>,
}

impl HttpPageFetcher {
    /// Create a fetcher that decodes bodies with `decoder`
    pub fn new(client: HttpClient, decoder: impl PageDecoder + 'static) -> Self {
        Self {
            client,
            decoder: Box::new(decoder),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, request: &PageRequest, timeout: Duration) -> Result<PageResult> {
        let config = RequestConfig::new()
            .params(request.params.to_pairs())
            .timeout(timeout);

        let body = self
            .client
            .request_text(request.method, &request.url, config)
            .await?;

        let result = self.decoder.decode_page(request.page, &body)?;
        debug!(
            page = request.page,
            records = result.len(),
            "Fetched page"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
