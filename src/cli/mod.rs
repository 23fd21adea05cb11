//! CLI module
//!
//! Command-line interface for fetching snapshots and klines.
//!
//! # Commands
//!
//! - `spot` - Fetch every page of a snapshot endpoint and write the ranked table
//! - `history` - Fetch klines for one symbol
//! - `list` - List built-in endpoints
//! - `validate` - Load and validate an endpoint definition

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
