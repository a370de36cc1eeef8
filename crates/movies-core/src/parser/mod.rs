//! HTML parsers for catalog pages
//!
//! - `listing`: Parse paginated search results into listing items
//! - `structured`: Decode the JSON-LD block on a detail page

pub mod listing;
pub mod structured;

use scraper::{ElementRef, Selector};

use crate::error::{ExtractError, Result};
use crate::types::NOT_AVAILABLE;

// Re-export main parsing functions
pub use listing::{parse_listing_item, parse_listing_page, resolve_detail_url};
pub use structured::{extract_movie_details, normalize_duration};

/// Compile a CSS selector, reporting failure as a parse error.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::ParseError(format!("Invalid selector {}: {:?}", css, e)))
}

/// Trimmed text content of an element, or the sentinel when empty.
pub(crate) fn element_text(element: &ElementRef) -> String {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}
