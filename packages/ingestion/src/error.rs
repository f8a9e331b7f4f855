//! Typed errors for the pipeline stages.
//!
//! Uses `thiserror` for library errors; the binary wraps them in
//! `anyhow` at the top level.

use thiserror::Error;
use usajobs_client::FetchError;

/// Errors that abort an extraction run. No staging file is written on
/// any of these; partial page data is discarded.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A page fetch failed after the client's own retry handling.
    #[error("fetch failed on page {page}: {source}")]
    Fetch {
        page: u32,
        #[source]
        source: FetchError,
    },

    /// The response lacked a field the pagination loop depends on.
    #[error("malformed search response on page {page}: missing {path}")]
    MalformedResponse { page: u32, path: &'static str },

    /// The server-reported page count crossed the trust boundary.
    #[error("server reported {reported} pages, refusing to run past the cap of {cap}")]
    PageCapExceeded { reported: u32, cap: u32 },

    /// Writing the staging file failed.
    #[error("failed to write staging file: {0}")]
    Staging(#[from] std::io::Error),
}

/// Errors during the flatten pass. Any one of these discards the whole
/// batch; there is no per-record skip-and-continue.
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("record {index} is missing required field {path}")]
    MissingField { index: usize, path: String },

    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
}

/// Errors during warehouse writes.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Schema or table name failed validation before DDL interpolation.
    #[error("invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Stage-level failure of a whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("failed to read staging file: {0}")]
    StagingRead(#[source] std::io::Error),

    #[error("staging file is not a JSON array: {0}")]
    StagingParse(#[source] serde_json::Error),

    #[error("flatten failed: {0}")]
    Flatten(#[from] FlattenError),

    #[error("load failed: {0}")]
    Load(#[from] LoadError),
}
