//! Paginated extraction from the search API into a staging file.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use usajobs_client::{FetchError, UsaJobsClient};

use crate::error::ExtractError;

/// Upper bound on the server-reported page count. At 500 results per
/// page this is 100k records, far beyond any keyword the pipeline
/// queries; a count above it means the API's pagination metadata can
/// no longer be trusted.
pub const DEFAULT_PAGE_CAP: u32 = 200;

/// One page of search results. The seam the extractor is tested
/// through; the production implementation is [`UsaJobsClient`].
#[async_trait]
pub trait JobSearchApi: Send + Sync {
    async fn search(&self, keyword: &str, page: u32) -> Result<Value, FetchError>;
}

#[async_trait]
impl JobSearchApi for UsaJobsClient {
    async fn search(&self, keyword: &str, page: u32) -> Result<Value, FetchError> {
        UsaJobsClient::search(self, keyword, page).await
    }
}

#[async_trait]
impl<A: JobSearchApi> JobSearchApi for &A {
    async fn search(&self, keyword: &str, page: u32) -> Result<Value, FetchError> {
        (**self).search(keyword, page).await
    }
}

/// Drives the search client across all result pages for one keyword
/// and persists the aggregated raw records to a staging file.
pub struct Extractor<A: JobSearchApi> {
    api: A,
    page_cap: u32,
}

impl<A: JobSearchApi> Extractor<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            page_cap: DEFAULT_PAGE_CAP,
        }
    }

    pub fn with_page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    /// Fetch every page from `start_page` through the server-reported
    /// page count and write the accumulated records to a temp file.
    ///
    /// Any failure aborts the whole extraction: accumulated pages are
    /// discarded and no staging file is left behind. On success the
    /// returned file is the caller's to consume and delete.
    pub async fn extract(&self, keyword: &str, start_page: u32) -> Result<PathBuf, ExtractError> {
        tracing::info!(keyword, "extracting job data");

        let mut page = start_page.max(1);
        let mut records: Vec<Value> = Vec::new();

        loop {
            let response = self
                .api
                .search(keyword, page)
                .await
                .map_err(|source| ExtractError::Fetch { page, source })?;

            let items = response
                .pointer("/SearchResult/SearchResultItems")
                .and_then(Value::as_array)
                .ok_or(ExtractError::MalformedResponse {
                    page,
                    path: "SearchResult.SearchResultItems",
                })?;
            records.extend(items.iter().cloned());

            let total_pages =
                reported_page_count(&response).ok_or(ExtractError::MalformedResponse {
                    page,
                    path: "SearchResult.UserArea.NumberOfPages",
                })?;
            if total_pages > self.page_cap {
                return Err(ExtractError::PageCapExceeded {
                    reported: total_pages,
                    cap: self.page_cap,
                });
            }

            tracing::info!(page, total_pages, "page extracted");
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::info!(
            records = records.len(),
            "page extraction completed, writing staging file"
        );
        write_staging_file(&records)
    }
}

/// The API reports `NumberOfPages` as a string; tolerate a bare number
/// as well.
fn reported_page_count(response: &Value) -> Option<u32> {
    match response.pointer("/SearchResult/UserArea/NumberOfPages")? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

fn write_staging_file(records: &[Value]) -> Result<PathBuf, ExtractError> {
    // NamedTempFile deletes itself on drop, so a failed write leaves
    // nothing behind; keep() hands ownership of the path to the caller.
    let file = tempfile::Builder::new()
        .prefix("jobsusa")
        .suffix(".json")
        .tempfile()?;

    let mut writer = BufWriter::new(file.as_file());
    serde_json::to_writer(&mut writer, records).map_err(std::io::Error::from)?;
    writer.flush()?;
    drop(writer);

    let (_file, path) = file.keep().map_err(|e| ExtractError::Staging(e.error))?;
    Ok(path)
}
