//! Fixtures and mock implementations for testing.
//!
//! Shared by the unit and integration tests; nothing here is used by
//! the binary.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use usajobs_client::FetchError;

use crate::extract::JobSearchApi;

/// A complete raw search result with every projected field present.
pub fn sample_record(id: &str) -> Value {
    json!({
        "MatchedObjectId": id,
        "MatchedObjectDescriptor": {
            "PositionID": format!("DE-{id}"),
            "PositionTitle": "Data Engineer",
            "PositionURI": format!("https://www.usajobs.gov/job/{id}"),
            "ApplyURI": [format!("https://www.usajobs.gov/job/{id}/apply")],
            "PositionLocationDisplay": "Washington, DC",
            "OrganizationName": "Department of Example",
            "DepartmentName": "Example Department",
            "PositionRemuneration": [{
                "MinimumRange": "50000",
                "MaximumRange": "70000",
                "RateIntervalCode": "PA",
                "Description": "Per Year"
            }],
            "PositionStartDate": "2024-01-01",
            "PositionEndDate": "2024-12-31",
            "PublicationStartDate": "2024-01-01",
            "ApplicationCloseDate": "2024-02-01",
            "UserArea": {
                "Details": {
                    "LowGrade": "11",
                    "HighGrade": "13",
                    "PromotionPotential": "13",
                    "SubAgencyName": "Example Sub-Agency",
                    "Relocation": "False",
                    "TotalOpenings": "2",
                    "TravelCode": "0",
                    "ApplyOnlineUrl": "https://apply.example.gov",
                    "DetailStatusUrl": "https://status.example.gov",
                    "BenefitsUrl": "https://benefits.example.gov",
                    "WithinArea": "False",
                    "CommuteDistance": "0",
                    "AgencyContactEmail": "hr@example.gov",
                    "SecurityClearance": "Not Required",
                    "DrugTestRequired": "False",
                    "RemoteIndicator": "True"
                }
            }
        }
    })
}

/// A search response page in the shape the extractor reads.
pub fn page_response(items: Vec<Value>, number_of_pages: &str) -> Value {
    json!({
        "SearchResult": {
            "SearchResultItems": items,
            "UserArea": { "NumberOfPages": number_of_pages }
        }
    })
}

/// In-memory [`JobSearchApi`] serving a fixed sequence of pages.
pub struct ScriptedApi {
    pages: Vec<Value>,
    fail_on: Option<u32>,
    calls: AtomicU32,
}

impl ScriptedApi {
    /// `pages[0]` is served for page 1, and so on.
    pub fn new(pages: Vec<Value>) -> Self {
        Self {
            pages,
            fail_on: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Fail requests for the given page instead of serving it.
    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_on = Some(page);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSearchApi for ScriptedApi {
    async fn search(&self, _keyword: &str, page: u32) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on == Some(page) {
            return Err(FetchError::RetriesExhausted { attempts: 3 });
        }
        Ok(self.pages[(page as usize) - 1].clone())
    }
}
