//! Flat row shapes loaded into the warehouse.
//!
//! Every field except `load_date` is kept as text: the API returns
//! strings throughout and typing happens downstream in the
//! transformation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `job_postings`, projected from a raw search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub matched_object_id: String,
    pub position_id: String,
    pub position_title: String,
    pub position_uri: String,
    /// First entry of the descriptor's `ApplyURI` array.
    pub apply_uri: String,
    pub position_location_display: String,
    pub organization_name: String,
    pub department_name: String,
    /// Remuneration fields come from the first entry of
    /// `PositionRemuneration`.
    pub minimum_range: String,
    pub maximum_range: String,
    pub rate_interval_code: String,
    pub description: String,
    pub position_start_date: String,
    pub position_end_date: String,
    pub publication_start_date: String,
    pub application_close_date: String,
    pub load_date: DateTime<Utc>,
}

/// One row of `user_area`, projected from the nested
/// `UserArea.Details` sub-object of the same raw record.
///
/// Shares `matched_object_id` with the matching [`JobPosting`] row;
/// the relationship is not enforced at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserArea {
    pub matched_object_id: String,
    pub low_grade: String,
    pub high_grade: String,
    pub promotion_potential: String,
    pub sub_agency_name: Option<String>,
    pub relocation: String,
    pub total_openings: Option<String>,
    pub travel_code: String,
    pub apply_online_url: Option<String>,
    pub detail_status_url: Option<String>,
    pub benefits_url: Option<String>,
    pub within_area: String,
    pub commute_distance: String,
    pub agency_contact_email: Option<String>,
    pub security_clearance: String,
    pub drug_test_required: String,
    pub remote_indicator: String,
    pub load_date: DateTime<Utc>,
}
