//! End-to-end pipeline runs against a containerized Postgres with a
//! scripted API.

mod common;

use common::pg_pool;
use ingestion::testing::{page_response, sample_record, ScriptedApi};
use ingestion::{pipeline, PipelineError};

#[tokio::test]
async fn single_page_run_lands_both_tables() {
    let pool = pg_pool().await;
    let api = ScriptedApi::new(vec![page_response(vec![sample_record("123")], "1")]);

    pipeline::run(&pool, &api, "Data Engineering", 1, "e2e_test")
        .await
        .unwrap();

    let (id, minimum_range): (String, String) = sqlx::query_as(
        "SELECT matched_object_id, minimum_range FROM e2e_test.job_postings",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(id, "123");
    assert_eq!(minimum_range, "50000");

    let (id, low_grade): (String, String) =
        sqlx::query_as("SELECT matched_object_id, low_grade FROM e2e_test.user_area")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(id, "123");
    assert_eq!(low_grade, "11");
}

#[tokio::test]
async fn flatten_failure_halts_the_run_before_any_warehouse_write() {
    let pool = pg_pool().await;

    let mut record = sample_record("123");
    record["MatchedObjectDescriptor"]["UserArea"]["Details"]
        .as_object_mut()
        .unwrap()
        .remove("LowGrade");
    let api = ScriptedApi::new(vec![page_response(vec![record], "1")]);

    let result = pipeline::run(&pool, &api, "Data Engineering", 1, "halt_test").await;
    assert!(matches!(result, Err(PipelineError::Flatten(_))));

    // The loader never ran, so the schema was never created.
    let schemas: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.schemata WHERE schema_name = 'halt_test'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(schemas, 0);
}

#[tokio::test]
async fn extraction_failure_halts_the_run() {
    let pool = pg_pool().await;
    let api = ScriptedApi::new(vec![page_response(vec![], "2")]).failing_on(2);

    let result = pipeline::run(&pool, &api, "Data Engineering", 1, "abort_test").await;
    assert!(matches!(result, Err(PipelineError::Extraction(_))));
}
