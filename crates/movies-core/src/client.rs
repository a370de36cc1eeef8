//! HTTP fetcher for catalog pages
//!
//! Every request carries a static browser User-Agent. The client performs no
//! retries and no internal throttling: the pause before detail requests is
//! the caller's job, since listing requests are never delayed.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};

use crate::error::{ExtractError, RequestContext, Result};

/// Default User-Agent mimicking a modern browser
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header for English catalog content
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Accept-Language sent with every request
    pub accept_language: String,
    /// Request timeout in seconds; `None` keeps the transport default
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout_secs: None,
        }
    }
}

/// HTTP client used for both listing and detail pages
pub struct MovieClient {
    client: reqwest::Client,
}

impl MovieClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns `ExtractError::InvalidArgument` for a header value that is not
    /// valid ASCII, or `ExtractError::Http` if the client cannot be built
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
            ExtractError::InvalidArgument(format!("Accept-Language header: {}", e))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetch a page body.
    ///
    /// # Arguments
    /// * `url` - Absolute URL to request
    /// * `context` - Which page this is, carried into any failure
    ///
    /// # Errors
    /// `ExtractError::Transport` on network errors, timeouts and non-2xx
    /// status codes. Nothing is retried.
    pub async fn fetch(&self, url: &str, context: RequestContext) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractError::transport(context.clone(), e))?;

        let response = response
            .error_for_status()
            .map_err(|e| ExtractError::transport(context.clone(), e))?;

        response
            .text()
            .await
            .map_err(|e| ExtractError::transport(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_client_creation() {
        let client = MovieClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            timeout_secs: Some(60),
            ..ClientConfig::default()
        };
        assert!(MovieClient::with_config(&config).is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_header() {
        let config = ClientConfig {
            accept_language: "en\nUS".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            MovieClient::with_config(&config),
            Err(ExtractError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/title/tt1/"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = MovieClient::new().unwrap();
        let url = format!("{}/title/tt1/", server.uri());
        let body = client
            .fetch(&url, RequestContext::Detail(url.clone()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1) // no retry
            .mount(&server)
            .await;

        let client = MovieClient::new().unwrap();
        let url = format!("{}/search/title/", server.uri());
        let result = client.fetch(&url, RequestContext::ListingPage(4)).await;

        match result {
            Err(ExtractError::Transport { context, message }) => {
                assert_eq!(context, RequestContext::ListingPage(4));
                assert!(message.contains("503"));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_failure() {
        let client = MovieClient::new().unwrap();
        let url = "http://127.0.0.1:1/title/tt1/";
        let result = client
            .fetch(url, RequestContext::Detail(url.to_string()))
            .await;
        assert!(matches!(result, Err(ExtractError::Transport { .. })));
    }
}
