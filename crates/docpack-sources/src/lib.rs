//! Source aggregation for docpack.
//!
//! Rewrites user-supplied document URLs into raw-text endpoints and fetches
//! them one after another into a single bounded context string.

pub mod client;
pub mod fetcher;
pub mod normalize;

#[cfg(any(test, feature = "mocks"))]
pub use client::MockSourceClient;
pub use client::{FetchError, HttpSourceClient, SourceClient};
pub use fetcher::{
    clamp_text, parse_source_list, FailedEntry, FetchFailure, FetchLimits, FetchedEntry,
    FetchedSource, SourceFetchResult, SourceFetcher, SourceSummary, MAX_SOURCE_CHARS,
    MAX_TOTAL_CHARS, TRUNCATION_MARKER,
};
pub use normalize::normalize_source_url;
