//! Execution engine module
//!
//! Paginated fetch-and-aggregate.
//!
//! # Overview
//!
//! ```text
//! page 1 ──► plan_pages ──► FetchCoordinator (pages 2..N, bounded) ──► aggregate ──► rank_records
//! ```
//!
//! - `SnapshotEngine` - Runs the whole pipeline for one endpoint
//! - `PageFetcher` - One round trip for one page
//! - `FetchCoordinator` - Bounded fan-out with fail-fast cancellation
//! - `AggregatedTable` - The ranked result

mod aggregate;
mod coordinator;
mod fetcher;
mod types;

pub use aggregate::{aggregate, rank_records, sort_value};
pub use coordinator::{fetch_with_timeout, FetchCoordinator};
pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use types::{AggregatedTable, FetchStats, RankingConfig, RequestTarget};

use crate::decode::EnvelopeDecoder;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{plan_pages, PageRequestBuilder};
use crate::types::QueryParameters;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Fetches every page of a collection and ranks the combined records
///
/// The engine holds no per-call state: every call to
/// [`SnapshotEngine::fetch_paginated`] owns its parameters, task pool and
/// buffers, so one engine can serve concurrent calls.
#[derive(Clone)]
pub struct SnapshotEngine {
    fetcher: Arc<dyn PageFetcher>,
    target: RequestTarget,
    ranking: RankingConfig,
}

impl SnapshotEngine {
    /// Create an engine over any page fetcher
    pub fn new(fetcher: Arc<dyn PageFetcher>, target: RequestTarget, ranking: RankingConfig) -> Self {
        Self {
            fetcher,
            target,
            ranking,
        }
    }

    /// Create an engine that fetches over HTTP and decodes with `decoder`
    pub fn http(
        client: HttpClient,
        decoder: EnvelopeDecoder,
        target: RequestTarget,
        ranking: RankingConfig,
    ) -> Self {
        Self::new(
            Arc::new(HttpPageFetcher::new(client, decoder)),
            target,
            ranking,
        )
    }

    /// Request target
    pub fn target(&self) -> &RequestTarget {
        &self.target
    }

    /// Ranking configuration
    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    /// Fetch all pages and return them as one ranked table
    ///
    /// Page 1 is fetched alone to learn the page size and total. The remaining
    /// pages run concurrently, at most `concurrency_limit` at a time, each with
    /// its own `timeout`. Any failure fails the whole call; no partial table
    /// is ever returned.
    pub async fn fetch_paginated(
        &self,
        base_query: QueryParameters,
        timeout: Duration,
        concurrency_limit: usize,
    ) -> Result<AggregatedTable> {
        let start = Instant::now();
        let mut stats = FetchStats::new();

        let builder = PageRequestBuilder::new(
            &self.target.url,
            self.target.method,
            &self.target.page_param,
            base_query,
        );

        let first = fetch_with_timeout(self.fetcher.as_ref(), &builder.build(1), timeout)
            .await
            .map_err(|e| Error::page_fetch(1, e))?;
        stats.add_page(first.len());

        let plan = plan_pages(&first)?;
        info!(
            page_size = plan.page_size,
            total = plan.total_count,
            pages = plan.total_pages,
            "Planned paginated fetch"
        );

        if plan.is_empty() {
            stats.set_duration(start.elapsed().as_millis() as u64);
            info!("Result set is empty, no further pages requested");
            return Ok(AggregatedTable::empty(self.ranking.clone(), plan, stats));
        }

        let coordinator =
            FetchCoordinator::new(Arc::clone(&self.fetcher), concurrency_limit, timeout);
        let rest = coordinator.fetch_all(&builder, plan.pending_pages()).await?;
        for page in &rest {
            stats.add_page(page.len());
        }

        let records = aggregate(first, rest);
        if records.len() as u64 != plan.total_count {
            debug!(
                declared = plan.total_count,
                fetched = records.len(),
                "Declared total differs from records fetched"
            );
        }

        let rows = rank_records(records, &self.ranking.sort_key, &self.ranking.rank_field);
        stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            rows = rows.len(),
            pages = stats.pages_fetched,
            duration_ms = stats.duration_ms,
            "Fetched ranked table"
        );

        Ok(AggregatedTable::new(rows, self.ranking.clone(), plan, stats))
    }
}

impl std::fmt::Debug for SnapshotEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotEngine")
            .field("target", &self.target)
            .field("ranking", &self.ranking)
            .finish_non_exhaustive()
    }
}
