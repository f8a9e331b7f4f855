//! Shared Postgres harness for the DB-backed tests.
//!
//! One container per test binary, started on first use and kept alive
//! for the whole run. Each test works in its own schema so tests stay
//! independent.

use chrono::Utc;
use ingestion::{JobPosting, UserArea};
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

static DB: OnceCell<(ContainerAsync<Postgres>, String)> = OnceCell::const_new();

pub async fn pg_pool() -> PgPool {
    let (_container, url) = DB
        .get_or_init(|| async {
            let postgres = Postgres::default()
                .with_tag("16")
                .start()
                .await
                .expect("Failed to start Postgres container");

            let host = postgres.get_host().await.expect("container host");
            let port = postgres
                .get_host_port_ipv4(5432)
                .await
                .expect("container port");
            let url = format!("postgresql://postgres:postgres@{host}:{port}/postgres");

            (postgres, url)
        })
        .await;

    PgPool::connect(url)
        .await
        .expect("Failed to connect to Postgres")
}

pub fn sample_posting(id: &str) -> JobPosting {
    JobPosting {
        matched_object_id: id.to_string(),
        position_id: format!("DE-{id}"),
        position_title: "Data Engineer".to_string(),
        position_uri: format!("https://www.usajobs.gov/job/{id}"),
        apply_uri: format!("https://www.usajobs.gov/job/{id}/apply"),
        position_location_display: "Washington, DC".to_string(),
        organization_name: "Department of Example".to_string(),
        department_name: "Example Department".to_string(),
        minimum_range: "50000".to_string(),
        maximum_range: "70000".to_string(),
        rate_interval_code: "PA".to_string(),
        description: "Per Year".to_string(),
        position_start_date: "2024-01-01".to_string(),
        position_end_date: "2024-12-31".to_string(),
        publication_start_date: "2024-01-01".to_string(),
        application_close_date: "2024-02-01".to_string(),
        load_date: Utc::now(),
    }
}

pub fn sample_user_area(id: &str) -> UserArea {
    UserArea {
        matched_object_id: id.to_string(),
        low_grade: "11".to_string(),
        high_grade: "13".to_string(),
        promotion_potential: "13".to_string(),
        sub_agency_name: Some("Example Sub-Agency".to_string()),
        relocation: "False".to_string(),
        total_openings: Some("2".to_string()),
        travel_code: "0".to_string(),
        apply_online_url: None,
        detail_status_url: None,
        benefits_url: None,
        within_area: "False".to_string(),
        commute_distance: "0".to_string(),
        agency_contact_email: Some("hr@example.gov".to_string()),
        security_clearance: "Not Required".to_string(),
        drug_test_required: "False".to_string(),
        remote_indicator: "True".to_string(),
        load_date: Utc::now(),
    }
}
