//! Data types for the movie extractor
//!
//! A [`MovieRecord`] is assembled from two sources: the summary shown on a
//! listing page ([`ListingItem`]) and the structured block on the item's
//! detail page ([`MovieDetails`]). Every record field is either a real value
//! or the [`NOT_AVAILABLE`] sentinel.

use serde::{Deserialize, Serialize};

/// Placeholder for any field that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Canonical output record for one movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// Title as shown in the listing
    pub title: String,
    /// Release year (usually 4 digits)
    pub release_year: String,
    /// Aggregate rating, e.g. "8.7"
    pub rating: String,
    /// Comma-joined director names
    pub directors: String,
    /// Comma-joined cast names
    pub cast: String,
    /// Plot snippet from the listing, or the detail description
    pub plot_summary: String,
    /// Coarse listing duration ("2h") or normalized detail duration ("2h30m")
    pub duration: String,
    /// Comma-joined genre names
    pub genre_tags: String,
}

impl MovieRecord {
    /// Merge a listing summary with the optional detail-page enrichment.
    ///
    /// Without details, detail-only fields stay at the sentinel and the
    /// duration keeps its listing value.
    pub fn merge(item: ListingItem, details: Option<MovieDetails>) -> Self {
        let ListingItem {
            title,
            release_year,
            plot_summary,
            duration,
            ..
        } = item;

        match details {
            None => Self {
                title,
                release_year,
                rating: NOT_AVAILABLE.to_string(),
                directors: NOT_AVAILABLE.to_string(),
                cast: NOT_AVAILABLE.to_string(),
                plot_summary,
                duration,
                genre_tags: NOT_AVAILABLE.to_string(),
            },
            Some(details) => {
                let plot_summary = match details.description {
                    Some(description) if plot_summary == NOT_AVAILABLE => description,
                    _ => plot_summary,
                };

                Self {
                    title,
                    release_year,
                    rating: details.rating,
                    directors: details.directors,
                    cast: details.cast,
                    plot_summary,
                    duration: details.duration.unwrap_or(duration),
                    genre_tags: details.genre_tags,
                }
            }
        }
    }
}

/// Fields read from one summary element of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub title: String,
    pub release_year: String,
    pub plot_summary: String,
    /// Coarse duration such as "2h"
    pub duration: String,
    /// Absolute detail page URL, if the item links to one
    pub detail_url: Option<String>,
}

/// Fields decoded from a detail page's structured-data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDetails {
    pub directors: String,
    pub cast: String,
    pub rating: String,
    /// Normalized duration, `None` when the block has no duration
    pub duration: Option<String>,
    pub genre_tags: String,
    /// Long-form description, used only when the listing had no plot
    pub description: Option<String>,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Target reached or catalog exhausted
    Done,
    /// A listing page could not be fetched or parsed
    Aborted { page: u32, reason: String },
}

/// Records collected by one run, in discovery order
#[derive(Debug, Clone)]
pub struct RunResult {
    pub records: Vec<MovieRecord>,
    pub outcome: RunOutcome,
    /// Number of listing pages requested, including a failed or empty one
    pub pages_fetched: u32,
}

impl RunResult {
    /// Whether the run stopped because of a listing failure
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, RunOutcome::Aborted { .. })
    }
}
