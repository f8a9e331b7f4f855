//! Typed errors for the USAJobs search client.

use thiserror::Error;

/// Errors surfaced by [`crate::UsaJobsClient::search`].
///
/// Truncated-body failures never appear here: they are retried in place
/// and only show up as [`FetchError::RetriesExhausted`] once the attempt
/// budget runs out.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request itself failed (connect, timeout, redirect, ...).
    /// Not retried.
    #[error("transport error while fetching API data: {0}")]
    Transport(#[source] reqwest::Error),

    /// The retryable truncated-response condition persisted across the
    /// whole attempt budget.
    #[error("failed to fetch API data after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// Anything else, e.g. a 2xx response whose body is not JSON.
    #[error("unexpected error while fetching API data: {0}")]
    Unknown(#[source] reqwest::Error),
}
