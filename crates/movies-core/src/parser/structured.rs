//! Structured-data extractor for detail pages
//!
//! Detail pages embed one or more JSON-LD blocks. Only the first block that
//! declares a `Movie` entity is decoded; blocks describing other entities
//! are skipped without being parsed.

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use super::selector;
use crate::error::{ExtractError, Result};
use crate::types::{MovieDetails, NOT_AVAILABLE};

const LD_JSON_TYPE: &str = "application/ld+json";

/// Subset of a schema.org `Movie` object.
///
/// Fields stay untyped because real pages mix shapes (a single director
/// object on one page, a list on the next).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieJsonLd {
    #[serde(default)]
    director: Value,
    #[serde(default)]
    actor: Value,
    #[serde(default)]
    aggregate_rating: Value,
    #[serde(default)]
    duration: Value,
    #[serde(default)]
    genre: Value,
    #[serde(default)]
    description: Value,
}

/// Extract movie details from a detail page.
///
/// # Arguments
/// * `html` - Raw HTML of the detail page
/// * `url` - Page URL, used only for error context
///
/// # Returns
/// * `Ok(Some(MovieDetails))` when a `Movie` block was found and decoded
/// * `Ok(None)` when the page has no `Movie` block
/// * `Err(ExtractError::StructuredData)` when the first `Movie` block is not
///   valid JSON, or holds no `Movie` object. Later blocks are not tried.
pub fn extract_movie_details(html: &str, url: &str) -> Result<Option<MovieDetails>> {
    let Some(block) = find_movie_block(html)? else {
        return Ok(None);
    };

    let structured_error = |message: String| ExtractError::StructuredData {
        url: url.to_string(),
        message,
    };

    let value: Value = serde_json::from_str(&block).map_err(|e| structured_error(e.to_string()))?;
    let object = movie_object(value)
        .ok_or_else(|| structured_error("block holds no Movie object".to_string()))?;
    let movie: MovieJsonLd =
        serde_json::from_value(object).map_err(|e| structured_error(e.to_string()))?;

    Ok(Some(MovieDetails {
        directors: join_people(&movie.director, true),
        cast: join_people(&movie.actor, false),
        rating: rating_value(&movie.aggregate_rating),
        duration: non_empty_str(&movie.duration).map(normalize_duration),
        genre_tags: join_genres(&movie.genre),
        description: non_empty_str(&movie.description).map(str::to_string),
    }))
}

/// Normalize an ISO-8601 duration token to compact form.
///
/// Only the `PT` designator is stripped and the rest lowercased; malformed
/// tokens pass through otherwise unchanged.
///
/// # Examples
/// ```
/// use movies_core::parser::normalize_duration;
///
/// assert_eq!(normalize_duration("PT2H"), "2h");
/// assert_eq!(normalize_duration("PT2H30M"), "2h30m");
/// assert_eq!(normalize_duration("95 min"), "95 min");
/// ```
pub fn normalize_duration(raw: &str) -> String {
    raw.strip_prefix("PT").unwrap_or(raw).to_lowercase()
}

/// Return the text of the first JSON-LD script that declares a `Movie`.
fn find_movie_block(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let script_selector = selector("script")?;

    for script in document.select(&script_selector) {
        let is_ld_json = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(LD_JSON_TYPE));
        if !is_ld_json {
            continue;
        }

        let text = script.text().collect::<String>();
        if declares_movie(&text) {
            return Ok(Some(text));
        }
    }

    Ok(None)
}

/// The decoded block itself when it is an object, or the first `Movie`
/// object of a top-level array.
fn movie_object(value: Value) -> Option<Value> {
    match value {
        Value::Object(_) => Some(value),
        Value::Array(entries) => entries
            .into_iter()
            .find(|entry| entry.get("@type").and_then(Value::as_str) == Some("Movie")),
        _ => None,
    }
}

/// Cheap pre-filter on the raw block text, run before any JSON parsing.
fn declares_movie(text: &str) -> bool {
    regex_lite::Regex::new(r#""@type"\s*:\s*"Movie""#)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Join person names. A lone object is accepted only where `allow_single`.
fn join_people(value: &Value, allow_single: bool) -> String {
    match value {
        Value::Array(people) => join_or_sentinel(people.iter().filter_map(person_name)),
        Value::Object(_) if allow_single => {
            person_name(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn person_name(value: &Value) -> Option<String> {
    non_empty_str(value.get("name")?).map(str::to_string)
}

fn rating_value(aggregate: &Value) -> String {
    match aggregate.get("ratingValue") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn join_genres(value: &Value) -> String {
    match value {
        Value::Array(genres) => {
            join_or_sentinel(genres.iter().filter_map(non_empty_str).map(str::to_string))
        }
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn join_or_sentinel(parts: impl Iterator<Item = String>) -> String {
    let joined = parts.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}
