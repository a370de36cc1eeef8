//! Movie Catalog Extractor Core Library
//!
//! This crate walks a paginated movie catalog genre by genre, enriches every
//! listing item from the structured data on its detail page and serializes
//! the collected records.
//!
//! # Features
//! - Paginated traversal with a target-count stop
//! - Merge of listing summaries with JSON-LD detail data
//! - Per-item fault isolation: one bad record never aborts the run
//! - JSON and CSV output

pub mod client;
pub mod error;
pub mod export;
pub mod extractor;
pub mod parser;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, MovieClient};
pub use error::{ExtractError, RequestContext, Result};
pub use export::{render, save, OutputFormat};
pub use extractor::{ExtractorConfig, MovieExtractor};
pub use types::{ListingItem, MovieDetails, MovieRecord, RunOutcome, RunResult, NOT_AVAILABLE};
