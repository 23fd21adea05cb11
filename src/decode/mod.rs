//! Response decoder module
//!
//! Turns upstream JSON envelopes into records.
//!
//! # Overview
//!
//! - [`EnvelopeDecoder`] reads one page of a paginated collection: the records
//!   collection plus the declared total.
//! - [`KlineDecoder`] reads a list of comma-separated rows and names each value.
//!
//! Paths are dot-separated keys (`data.diff`), optionally prefixed with `$.`.

mod decoders;
mod types;

pub use decoders::{lookup_path, EnvelopeDecoder, KlineDecoder};
pub use types::{EnvelopeConfig, PageDecoder, PathLookup};
