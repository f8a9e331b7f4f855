//! Projection of raw search results into the two flat row shapes.
//!
//! The projection is fixed. Required fields use missing-key-is-fatal
//! semantics and abort the whole batch; the handful of optional
//! `UserArea.Details` fields map a missing key to `None`. That
//! asymmetry is deliberate and load-bearing for downstream models.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::FlattenError;
use crate::rows::{JobPosting, UserArea};

/// Flatten a batch of raw records into paired row sets.
///
/// Produces exactly one row per record in each output, or fails for
/// the whole batch on the first missing required field. Both rows for
/// a record carry the same load timestamp, captured per record.
pub fn flatten(records: &[Value]) -> Result<(Vec<JobPosting>, Vec<UserArea>), FlattenError> {
    let mut postings = Vec::with_capacity(records.len());
    let mut user_areas = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if !record.is_object() {
            return Err(FlattenError::NotAnObject { index });
        }
        let load_date = Utc::now();
        postings.push(flatten_posting(record, index, load_date)?);
        user_areas.push(flatten_user_area(record, index, load_date)?);
    }

    Ok((postings, user_areas))
}

fn flatten_posting(
    record: &Value,
    index: usize,
    load_date: DateTime<Utc>,
) -> Result<JobPosting, FlattenError> {
    Ok(JobPosting {
        matched_object_id: text(required(record, index, "MatchedObjectId")?),
        position_id: text(required(record, index, "MatchedObjectDescriptor.PositionID")?),
        position_title: text(required(record, index, "MatchedObjectDescriptor.PositionTitle")?),
        position_uri: text(required(record, index, "MatchedObjectDescriptor.PositionURI")?),
        apply_uri: text(required(record, index, "MatchedObjectDescriptor.ApplyURI.0")?),
        position_location_display: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionLocationDisplay",
        )?),
        organization_name: text(required(
            record,
            index,
            "MatchedObjectDescriptor.OrganizationName",
        )?),
        department_name: text(required(
            record,
            index,
            "MatchedObjectDescriptor.DepartmentName",
        )?),
        minimum_range: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionRemuneration.0.MinimumRange",
        )?),
        maximum_range: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionRemuneration.0.MaximumRange",
        )?),
        rate_interval_code: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionRemuneration.0.RateIntervalCode",
        )?),
        description: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionRemuneration.0.Description",
        )?),
        position_start_date: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionStartDate",
        )?),
        position_end_date: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PositionEndDate",
        )?),
        publication_start_date: text(required(
            record,
            index,
            "MatchedObjectDescriptor.PublicationStartDate",
        )?),
        application_close_date: text(required(
            record,
            index,
            "MatchedObjectDescriptor.ApplicationCloseDate",
        )?),
        load_date,
    })
}

fn flatten_user_area(
    record: &Value,
    index: usize,
    load_date: DateTime<Utc>,
) -> Result<UserArea, FlattenError> {
    let details = required(record, index, "MatchedObjectDescriptor.UserArea.Details")?;
    let req = |key: &str| {
        details.get(key).ok_or_else(|| FlattenError::MissingField {
            index,
            path: format!("MatchedObjectDescriptor.UserArea.Details.{key}"),
        })
    };

    Ok(UserArea {
        matched_object_id: text(required(record, index, "MatchedObjectId")?),
        low_grade: text(req("LowGrade")?),
        high_grade: text(req("HighGrade")?),
        promotion_potential: text(req("PromotionPotential")?),
        sub_agency_name: optional(details, "SubAgencyName"),
        relocation: text(req("Relocation")?),
        total_openings: optional(details, "TotalOpenings"),
        travel_code: text(req("TravelCode")?),
        apply_online_url: optional(details, "ApplyOnlineUrl"),
        detail_status_url: optional(details, "DetailStatusUrl"),
        benefits_url: optional(details, "BenefitsUrl"),
        within_area: text(req("WithinArea")?),
        commute_distance: text(req("CommuteDistance")?),
        agency_contact_email: optional(details, "AgencyContactEmail"),
        security_clearance: text(req("SecurityClearance")?),
        drug_test_required: text(req("DrugTestRequired")?),
        remote_indicator: text(req("RemoteIndicator")?),
        load_date,
    })
}

/// Walk a dotted path of object keys and array indices; any missing
/// step fails the batch.
fn required<'a>(
    record: &'a Value,
    index: usize,
    path: &'static str,
) -> Result<&'a Value, FlattenError> {
    let mut current = record;
    for segment in path.split('.') {
        current = match segment.parse::<usize>() {
            Ok(i) => current.get(i),
            Err(_) => current.get(segment),
        }
        .ok_or_else(|| FlattenError::MissingField {
            index,
            path: path.to_string(),
        })?;
    }
    Ok(current)
}

fn optional(details: &Value, key: &str) -> Option<String> {
    match details.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(text(value)),
    }
}

/// The API serves strings throughout, but the occasional numeric or
/// boolean leaks in; those are kept verbatim rather than rejected.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
