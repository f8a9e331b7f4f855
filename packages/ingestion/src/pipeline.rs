//! The pipeline driver: extract, flatten, load, in sequence.

use std::fs;
use std::path::Path;

use serde_json::Value;
use sqlx::PgPool;

use crate::error::PipelineError;
use crate::extract::{Extractor, JobSearchApi};
use crate::flatten::flatten;
use crate::load::WarehouseLoader;

/// Run one full ingestion pass for a keyword.
///
/// Any stage failure halts the run before later stages execute.
/// Per-table load failures are best-effort by design: they are logged
/// inside the loader and do not fail the run, matching the policy that
/// one bad table should not hold back the other.
pub async fn run<A: JobSearchApi>(
    pool: &PgPool,
    api: A,
    keyword: &str,
    start_page: u32,
    schema: &str,
) -> Result<(), PipelineError> {
    let extractor = Extractor::new(api);
    let staging_path = extractor.extract(keyword, start_page).await?;

    let records = read_staging_file(&staging_path)?;
    tracing::info!(
        records = records.len(),
        "parsing data for job_postings and user_area"
    );
    let (postings, user_areas) = flatten(&records)?;

    let loader = WarehouseLoader::new(pool.clone());
    loader.ensure_schema(schema).await?;
    let report = loader.load(schema, &postings, &user_areas).await;

    // The staging file only bridges extract and load within one run.
    if let Err(e) = fs::remove_file(&staging_path) {
        tracing::warn!(path = %staging_path.display(), error = %e, "failed to remove staging file");
    }

    tracing::info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "load completed"
    );
    Ok(())
}

fn read_staging_file(path: &Path) -> Result<Vec<Value>, PipelineError> {
    tracing::info!(path = %path.display(), "reading data from staging file");
    let file = fs::File::open(path).map_err(PipelineError::StagingRead)?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(PipelineError::StagingParse)
}
