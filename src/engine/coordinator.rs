//! Bounded concurrent fetching of the remaining pages
//!
//! Each call owns its task pool: it is created when the call starts, holds at
//! most `concurrency` in-flight page tasks, and is torn down before the call
//! returns. Results arrive in completion order, which is not page order.

use super::fetcher::PageFetcher;
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, PageRequestBuilder, PageResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Run one fetch with a hard deadline
///
/// The deadline applies even when the fetcher ignores the timeout it is given.
pub async fn fetch_with_timeout(
    fetcher: &dyn PageFetcher,
    request: &PageRequest,
    timeout: Duration,
) -> Result<PageResult> {
    match tokio::time::timeout(timeout, fetcher.fetch_page(request, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Fans page requests out to a bounded pool of tasks
#[derive(Clone)]
pub struct FetchCoordinator {
    fetcher: Arc<dyn PageFetcher>,
    concurrency: usize,
    timeout: Duration,
}

impl FetchCoordinator {
    /// Create a coordinator; a concurrency of 0 is treated as 1
    pub fn new(fetcher: Arc<dyn PageFetcher>, concurrency: usize, timeout: Duration) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Maximum number of pages in flight
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch every page in `pages`
    ///
    /// All-or-nothing: the first failure aborts every task still running and
    /// is returned as [`Error::PartialFetch`] without waiting for them. Pages
    /// already fetched are dropped.
    pub async fn fetch_all(
        &self,
        builder: &PageRequestBuilder,
        pages: Vec<u32>,
    ) -> Result<Vec<PageResult>> {
        let mut completed = Vec::with_capacity(pages.len());
        let mut pending = pages.into_iter();
        let mut tasks = JoinSet::new();

        for page in pending.by_ref().take(self.concurrency) {
            self.spawn(&mut tasks, builder.build(page));
        }

        while let Some(joined) = tasks.join_next().await {
            let (page, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tasks.abort_all();
                    return Err(Error::TaskFailed {
                        message: e.to_string(),
                    });
                }
            };

            match outcome {
                Ok(result) => {
                    debug!(page, records = result.len(), in_flight = tasks.len(), "Page completed");
                    completed.push(result);
                    if let Some(next) = pending.next() {
                        self.spawn(&mut tasks, builder.build(next));
                    }
                }
                Err(e) => {
                    warn!(
                        page,
                        outstanding = tasks.len(),
                        error = %e,
                        "Page fetch failed, aborting outstanding pages"
                    );
                    tasks.abort_all();
                    return Err(Error::partial_fetch(page, e));
                }
            }
        }

        Ok(completed)
    }

    fn spawn(&self, tasks: &mut JoinSet<(u32, Result<PageResult>)>, request: PageRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let timeout = self.timeout;
        tasks.spawn(async move {
            let outcome = fetch_with_timeout(fetcher.as_ref(), &request, timeout).await;
            (request.page, outcome)
        });
    }
}

impl std::fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
