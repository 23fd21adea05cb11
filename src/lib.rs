// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Snapshot Pager
//!
//! Fetch every page of a paginated quote endpoint, concurrently and with a
//! bounded number of requests in flight, then merge and rank the records into
//! one table.
//!
//! ## Features
//!
//! - **Page planning**: Page 1 tells us the page size and total, everything else follows
//! - **Bounded fan-out**: Pages 2..N run concurrently under a fixed cap, fail-fast
//! - **Deterministic ranking**: Descending sort on a numeric key, 1-based rank
//! - **YAML endpoints**: Built-in A-share spot and kline endpoints, or your own files
//! - **CSV output**: Dated `YYYY-MM-DD.csv` snapshots
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use snapshot_pager::{load_definition, Definition, Result};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let Definition::Snapshot(spot) = load_definition("a-share-spot")? else {
//!         unreachable!()
//!     };
//!
//!     let engine = spot.engine()?;
//!     let table = engine
//!         .fetch_paginated(spot.base_query(), Duration::from_secs(15), 4)
//!         .await?;
//!
//!     for row in table.iter().take(10) {
//!         println!("{} {}", row["f12"], row["f3"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │          SnapshotEngine::fetch_paginated(query, timeout, n)      │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌────────────┬──────────────┬───┴──────────┬───────────┬──────────┐
//! │ Pagination │    Engine    │    Decode    │   HTTP    │  Output  │
//! ├────────────┼──────────────┼──────────────┼───────────┼──────────┤
//! │ Requests   │ PageFetcher  │ Envelope     │ GET/POST  │ Columns  │
//! │ Planner    │ Coordinator  │ Klines       │ Rate Limit│ CSV      │
//! │            │ Rank         │              │ Timeouts  │          │
//! └────────────┴──────────────┴──────────────┴───────────┴──────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with rate limiting
pub mod http;

/// Page requests and planning
pub mod pagination;

/// Response envelope decoders
pub mod decode;

/// Paginated fetch-and-rank engine
pub mod engine;

/// Column projection and CSV output
pub mod output;

/// Historical klines
pub mod history;

/// YAML loader for endpoint definitions
pub mod loader;

/// Built-in endpoint definitions
pub mod endpoints;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{AggregatedTable, PageFetcher, RankingConfig, RequestTarget, SnapshotEngine};
pub use loader::{load_definition, load_definition_from_str, Definition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
