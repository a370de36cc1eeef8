//! Pipeline orchestrator
//!
//! Walks the listing pages of one genre, enriches every listing item from its
//! detail page and accumulates records until the target count is reached or
//! the catalog runs out. Work is strictly sequential: one request in flight
//! at a time, records kept in page-then-item discovery order.

use std::time::Duration;

use reqwest::Url;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::client::{ClientConfig, MovieClient};
use crate::error::{ExtractError, RequestContext, Result};
use crate::parser::{extract_movie_details, parse_listing_page};
use crate::types::{ListingItem, MovieDetails, MovieRecord, RunOutcome, RunResult};

/// Base URL of the catalog
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com";

/// Results per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Pause before every detail request
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_millis(200);

/// Configuration for a [`MovieExtractor`]
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Site origin; listing URLs and relative detail links hang off it
    pub base_url: String,
    /// Number of results the catalog puts on one listing page
    pub page_size: u32,
    /// Delay awaited immediately before each detail fetch
    pub detail_delay: Duration,
    /// HTTP client settings
    pub client: ClientConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            detail_delay: DEFAULT_DETAIL_DELAY,
            client: ClientConfig::default(),
        }
    }
}

/// Extraction pipeline over a paginated movie catalog
///
/// # Example
/// ```no_run
/// use movies_core::MovieExtractor;
///
/// # async fn example() -> Result<(), movies_core::ExtractError> {
/// let extractor = MovieExtractor::new()?;
/// let run = extractor.extract("comedy", 10).await?;
/// for record in &run.records {
///     println!("{} ({})", record.title, record.release_year);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MovieExtractor {
    client: MovieClient,
    config: ExtractorConfig,
    base: Url,
}

impl MovieExtractor {
    /// Create an extractor with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create an extractor with custom configuration.
    ///
    /// # Errors
    /// * `ExtractError::InvalidArgument` if `base_url` is not an absolute URL
    ///   or `page_size` is zero
    /// * `ExtractError::Http` if the HTTP client cannot be created
    pub fn with_config(config: ExtractorConfig) -> Result<Self> {
        let client = MovieClient::with_config(&config.client)?;
        Self::with_client(client, config)
    }

    /// Create an extractor around a pre-built client.
    ///
    /// `config.client` is ignored in favour of `client`.
    pub fn with_client(client: MovieClient, config: ExtractorConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ExtractError::InvalidArgument(format!("base URL {:?}: {}", config.base_url, e)))?;
        if config.page_size == 0 {
            return Err(ExtractError::InvalidArgument(
                "page size must be positive".to_string(),
            ));
        }

        Ok(Self {
            client,
            config,
            base,
        })
    }

    /// Collect up to `target` records for `genre`.
    ///
    /// A failed listing page ends the run early, but the records gathered so
    /// far are still returned with [`RunOutcome::Aborted`]. Detail-page
    /// failures only degrade the affected record, and malformed listing items
    /// are skipped.
    ///
    /// # Errors
    /// `ExtractError::InvalidArgument` if `genre` is blank or `target` is
    /// zero. No request is made in that case.
    pub async fn extract(&self, genre: &str, target: usize) -> Result<RunResult> {
        if genre.trim().is_empty() {
            return Err(ExtractError::InvalidArgument(
                "genre cannot be empty".to_string(),
            ));
        }
        if target == 0 {
            return Err(ExtractError::InvalidArgument(
                "target count must be positive".to_string(),
            ));
        }

        let mut records: Vec<MovieRecord> = Vec::with_capacity(target.min(1024));
        let mut page: u32 = 1;

        let outcome = loop {
            let items = match self.fetch_listing(genre, page).await {
                Ok(items) => items,
                Err(e) => {
                    error!("Aborting at list page {}: {}", page, e);
                    break RunOutcome::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                }
            };

            if items.is_empty() {
                info!("No more movies found on page {}.", page);
                break RunOutcome::Done;
            }

            for item in items {
                if records.len() >= target {
                    break;
                }

                let item = match item {
                    Ok(item) => item,
                    Err(e) => {
                        error!("Failed to parse movie on page {}: {}", page, e);
                        continue;
                    }
                };

                let record = self.enrich(item).await;
                info!("Extracted {}/{}: {}", records.len() + 1, target, record.title);
                records.push(record);
            }

            if records.len() >= target {
                break RunOutcome::Done;
            }
            page += 1;
        };

        Ok(RunResult {
            records,
            outcome,
            pages_fetched: page,
        })
    }

    /// Listing URL for a 1-based page.
    pub fn listing_url(&self, genre: &str, page: u32) -> String {
        let start = (page.saturating_sub(1)) * self.config.page_size + 1;
        format!(
            "{}/search/title/?genres={}&start={}&ref_=adv_nxt",
            self.config.base_url.trim_end_matches('/'),
            genre,
            start
        )
    }

    async fn fetch_listing(&self, genre: &str, page: u32) -> Result<Vec<Result<ListingItem>>> {
        let url = self.listing_url(genre, page);
        debug!("Fetching list page {}: {}", page, url);
        let html = self
            .client
            .fetch(&url, RequestContext::ListingPage(page))
            .await?;
        parse_listing_page(&html, &self.base)
    }

    async fn enrich(&self, item: ListingItem) -> MovieRecord {
        let details = match item.detail_url.as_deref() {
            Some(url) => self.fetch_details(url).await,
            None => None,
        };
        MovieRecord::merge(item, details)
    }

    async fn fetch_details(&self, url: &str) -> Option<MovieDetails> {
        sleep(self.config.detail_delay).await;

        let html = match self
            .client
            .fetch(url, RequestContext::Detail(url.to_string()))
            .await
        {
            Ok(html) => html,
            Err(e) => {
                error!("Failed to fetch details: {} -> {}", url, e);
                return None;
            }
        };

        match extract_movie_details(&html, url) {
            Ok(Some(details)) => Some(details),
            Ok(None) => {
                debug!("No Movie structured data at {}", url);
                None
            }
            Err(e) => {
                error!("JSON parse error at {}: {}", url, e);
                None
            }
        }
    }
}
