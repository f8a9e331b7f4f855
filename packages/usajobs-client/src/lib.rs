//! Thin client for the USAJobs search API.
//!
//! Issues authenticated GET requests against `/api/Search` and retries
//! the one transient condition the API is known for: a connection that
//! drops mid-body. Everything else fails fast so the caller can abort
//! the extraction run.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub mod error;

pub use error::FetchError;

/// Production search endpoint host.
pub const DEFAULT_BASE_URL: &str = "https://data.usajobs.gov";

/// Fixed page size for search requests.
pub const RESULTS_PER_PAGE: u32 = 500;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// The three authentication fields the API requires on every request.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub host: String,
    pub user_agent: String,
    pub authorization_key: String,
}

/// Client for the USAJobs search endpoint.
#[derive(Debug, Clone)]
pub struct UsaJobsClient {
    http: reqwest::Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl UsaJobsClient {
    pub fn new(credentials: ApiCredentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Point the client at a different host, e.g. a mock server in tests.
    pub fn with_base_url(credentials: ApiCredentials, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
        }
    }

    /// Fetch one page of search results as raw JSON.
    ///
    /// Up to three attempts; a response truncated mid-body waits one
    /// second and re-requests the same page. The body's shape is not
    /// validated here - a malformed payload surfaces as a key-lookup
    /// failure downstream.
    pub async fn search(&self, keyword: &str, page: u32) -> Result<Value, FetchError> {
        search_with_retries(self, keyword, page).await
    }
}

/// Outcome of a single request attempt.
enum Attempt {
    Success(Value),
    /// Body cut off mid-read; the same page should be re-requested.
    Truncated,
    Fatal(FetchError),
}

/// One logical request as a sequence of classified attempts.
///
/// Split out from [`UsaJobsClient`] so the retry policy can be exercised
/// without a network.
#[async_trait]
trait SearchBackend: Send + Sync {
    async fn attempt(&self, keyword: &str, page: u32, attempt: u32) -> Attempt;
}

#[async_trait]
impl SearchBackend for UsaJobsClient {
    async fn attempt(&self, keyword: &str, page: u32, attempt: u32) -> Attempt {
        tracing::info!(attempt, page, keyword, "sending search request");

        let request = self
            .http
            .get(format!("{}/api/Search", self.base_url))
            .header("Host", &self.credentials.host)
            .header("User-Agent", &self.credentials.user_agent)
            .header("Authorization-Key", &self.credentials.authorization_key)
            .query(&[
                ("Keyword", keyword.to_string()),
                ("Page", page.to_string()),
                ("ResultsPerPage", RESULTS_PER_PAGE.to_string()),
            ]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(page, error = %e, "error while fetching API data");
                return Attempt::Fatal(FetchError::Transport(e));
            }
        };

        tracing::debug!(status = %response.status(), page, "search response received");

        match response.json::<Value>().await {
            Ok(body) => Attempt::Success(body),
            Err(e) if e.is_body() => {
                tracing::warn!(page, error = %e, "response truncated mid-read, retrying in 1s");
                Attempt::Truncated
            }
            Err(e) => {
                tracing::error!(page, error = %e, "unexpected error while reading API response");
                Attempt::Fatal(FetchError::Unknown(e))
            }
        }
    }
}

async fn search_with_retries(
    backend: &dyn SearchBackend,
    keyword: &str,
    page: u32,
) -> Result<Value, FetchError> {
    for attempt in 1..=MAX_ATTEMPTS {
        match backend.attempt(keyword, page, attempt).await {
            Attempt::Success(body) => return Ok(body),
            Attempt::Truncated => tokio::time::sleep(RETRY_DELAY).await,
            Attempt::Fatal(e) => return Err(e),
        }
    }

    tracing::error!(page, "failed to fetch API data after {MAX_ATTEMPTS} attempts");
    Err(FetchError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
    })
}
