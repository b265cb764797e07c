//! HTTP seam for retrieving source text.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;
use reqwest::header::ACCEPT;

/// Default User-Agent sent with source requests.
pub const DEFAULT_USER_AGENT: &str = "docpack-source-fetcher";

/// Accept header preferring plain text and markdown.
pub const ACCEPT_TEXT: &str = "text/plain,text/markdown,text/*,*/*";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while retrieving a single source.
///
/// These never abort a fetch run; the fetcher records them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Retrieves the text body behind a URL.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// GET `url` and return its body as text.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed source client.
#[derive(Debug, Clone)]
pub struct HttpSourceClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSourceClient {
    /// Create a client with an explicit timeout and User-Agent.
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_TEXT)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout.as_secs())
            } else {
                FetchError::Body(e.to_string())
            }
        })
    }
}
