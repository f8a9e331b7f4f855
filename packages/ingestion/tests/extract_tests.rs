//! Extractor tests against a scripted in-memory API.

use ingestion::testing::{page_response, sample_record, ScriptedApi};
use ingestion::{ExtractError, Extractor};
use serde_json::Value;

fn read_back(path: &std::path::Path) -> Vec<Value> {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[tokio::test]
async fn aggregates_all_pages_and_round_trips_through_the_staging_file() {
    let api = ScriptedApi::new(vec![
        page_response(vec![sample_record("1"), sample_record("2")], "3"),
        page_response(vec![sample_record("3")], "3"),
        page_response(vec![sample_record("4")], "3"),
    ]);

    let path = Extractor::new(&api)
        .extract("Data Engineering", 1)
        .await
        .unwrap();

    let records = read_back(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(api.calls(), 3);
    let ids: Vec<&str> = records
        .iter()
        .map(|r| r["MatchedObjectId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
}

#[tokio::test]
async fn single_page_still_issues_exactly_one_request() {
    let api = ScriptedApi::new(vec![page_response(vec![sample_record("1")], "1")]);

    let path = Extractor::new(&api)
        .extract("Data Engineering", 1)
        .await
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn stops_requesting_once_past_the_reported_page_count() {
    // Page count drops to 2 mid-run; no third request goes out.
    let api = ScriptedApi::new(vec![
        page_response(vec![sample_record("1")], "3"),
        page_response(vec![sample_record("2")], "2"),
    ]);

    let path = Extractor::new(&api)
        .extract("Data Engineering", 1)
        .await
        .unwrap();
    let records = read_back(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(api.calls(), 2);
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn fetch_failure_aborts_the_whole_extraction() {
    let api = ScriptedApi::new(vec![
        page_response(vec![sample_record("1")], "3"),
        page_response(vec![], "3"),
    ])
    .failing_on(2);

    let result = Extractor::new(&api).extract("Data Engineering", 1).await;

    match result {
        Err(ExtractError::Fetch { page, .. }) => assert_eq!(page, 2),
        other => panic!("expected Fetch error, got {other:?}"),
    }
    // Page 1 was already fetched, but nothing gets persisted.
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn page_count_beyond_the_cap_is_a_trust_boundary_error() {
    let api = ScriptedApi::new(vec![page_response(vec![sample_record("1")], "10")]);

    let result = Extractor::new(&api)
        .with_page_cap(5)
        .extract("Data Engineering", 1)
        .await;

    assert!(matches!(
        result,
        Err(ExtractError::PageCapExceeded {
            reported: 10,
            cap: 5
        })
    ));
}

#[tokio::test]
async fn response_without_page_count_is_malformed() {
    let api = ScriptedApi::new(vec![serde_json::json!({
        "SearchResult": { "SearchResultItems": [] }
    })]);

    let result = Extractor::new(&api).extract("Data Engineering", 1).await;

    assert!(matches!(
        result,
        Err(ExtractError::MalformedResponse {
            path: "SearchResult.UserArea.NumberOfPages",
            ..
        })
    ));
}

#[tokio::test]
async fn numeric_page_count_is_accepted() {
    let api = ScriptedApi::new(vec![serde_json::json!({
        "SearchResult": {
            "SearchResultItems": [sample_record("1")],
            "UserArea": { "NumberOfPages": 1 }
        }
    })]);

    let path = Extractor::new(&api)
        .extract("Data Engineering", 1)
        .await
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(api.calls(), 1);
}
