//! Warehouse loader: full-table replacement of the two staging tables.
//!
//! Every run discards prior table contents; history lives in the
//! derived tables the downstream transformation tool maintains, not
//! here.

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::LoadError;
use crate::rows::{JobPosting, UserArea};

pub const JOB_POSTINGS_TABLE: &str = "job_postings";
pub const USER_AREA_TABLE: &str = "user_area";

/// Per-table outcomes of one load pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<&'static str>,
    pub failed: Vec<(&'static str, LoadError)>,
}

impl LoadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct WarehouseLoader {
    pool: PgPool,
}

impl WarehouseLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the target schema if missing and grant broad access.
    /// Safe to run every time.
    pub async fn ensure_schema(&self, schema: &str) -> Result<(), LoadError> {
        let schema = valid_identifier(schema)?;

        tracing::info!(schema, "creating schema objects if not present");
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
            .execute(&self.pool)
            .await?;
        sqlx::query(&format!("GRANT ALL PRIVILEGES ON SCHEMA {schema} TO PUBLIC"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replace both staging tables with the given row sets.
    ///
    /// Each table is replaced in its own transaction, so a failed
    /// replace leaves that table's prior state intact. A failure on
    /// one table is recorded and does not stop the other - best-effort
    /// across tables, all-or-nothing within one.
    pub async fn load(
        &self,
        schema: &str,
        postings: &[JobPosting],
        user_areas: &[UserArea],
    ) -> LoadReport {
        let mut report = LoadReport::default();

        match self.replace_job_postings(schema, postings).await {
            Ok(()) => {
                tracing::info!(table = JOB_POSTINGS_TABLE, rows = postings.len(), "table loaded");
                report.loaded.push(JOB_POSTINGS_TABLE);
            }
            Err(e) => {
                tracing::error!(table = JOB_POSTINGS_TABLE, error = %e, "table load failed");
                report.failed.push((JOB_POSTINGS_TABLE, e));
            }
        }

        match self.replace_user_area(schema, user_areas).await {
            Ok(()) => {
                tracing::info!(table = USER_AREA_TABLE, rows = user_areas.len(), "table loaded");
                report.loaded.push(USER_AREA_TABLE);
            }
            Err(e) => {
                tracing::error!(table = USER_AREA_TABLE, error = %e, "table load failed");
                report.failed.push((USER_AREA_TABLE, e));
            }
        }

        report
    }

    async fn replace_job_postings(
        &self,
        schema: &str,
        rows: &[JobPosting],
    ) -> Result<(), LoadError> {
        let schema = valid_identifier(schema)?;
        let mut tx = self.pool.begin().await?;

        recreate_table(
            &mut tx,
            schema,
            JOB_POSTINGS_TABLE,
            r#"
                matched_object_id TEXT NOT NULL,
                position_id TEXT NOT NULL,
                position_title TEXT NOT NULL,
                position_uri TEXT NOT NULL,
                apply_uri TEXT NOT NULL,
                position_location_display TEXT NOT NULL,
                organization_name TEXT NOT NULL,
                department_name TEXT NOT NULL,
                minimum_range TEXT NOT NULL,
                maximum_range TEXT NOT NULL,
                rate_interval_code TEXT NOT NULL,
                description TEXT NOT NULL,
                position_start_date TEXT NOT NULL,
                position_end_date TEXT NOT NULL,
                publication_start_date TEXT NOT NULL,
                application_close_date TEXT NOT NULL,
                load_date TIMESTAMPTZ NOT NULL
            "#,
        )
        .await?;

        for row in rows {
            sqlx::query(&format!(
                r#"
                INSERT INTO {schema}.{JOB_POSTINGS_TABLE} (
                    matched_object_id, position_id, position_title, position_uri,
                    apply_uri, position_location_display, organization_name,
                    department_name, minimum_range, maximum_range,
                    rate_interval_code, description, position_start_date,
                    position_end_date, publication_start_date,
                    application_close_date, load_date
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                "#
            ))
            .bind(&row.matched_object_id)
            .bind(&row.position_id)
            .bind(&row.position_title)
            .bind(&row.position_uri)
            .bind(&row.apply_uri)
            .bind(&row.position_location_display)
            .bind(&row.organization_name)
            .bind(&row.department_name)
            .bind(&row.minimum_range)
            .bind(&row.maximum_range)
            .bind(&row.rate_interval_code)
            .bind(&row.description)
            .bind(&row.position_start_date)
            .bind(&row.position_end_date)
            .bind(&row.publication_start_date)
            .bind(&row.application_close_date)
            .bind(row.load_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn replace_user_area(&self, schema: &str, rows: &[UserArea]) -> Result<(), LoadError> {
        let schema = valid_identifier(schema)?;
        let mut tx = self.pool.begin().await?;

        recreate_table(
            &mut tx,
            schema,
            USER_AREA_TABLE,
            r#"
                matched_object_id TEXT NOT NULL,
                low_grade TEXT NOT NULL,
                high_grade TEXT NOT NULL,
                promotion_potential TEXT NOT NULL,
                sub_agency_name TEXT,
                relocation TEXT NOT NULL,
                total_openings TEXT,
                travel_code TEXT NOT NULL,
                apply_online_url TEXT,
                detail_status_url TEXT,
                benefits_url TEXT,
                within_area TEXT NOT NULL,
                commute_distance TEXT NOT NULL,
                agency_contact_email TEXT,
                security_clearance TEXT NOT NULL,
                drug_test_required TEXT NOT NULL,
                remote_indicator TEXT NOT NULL,
                load_date TIMESTAMPTZ NOT NULL
            "#,
        )
        .await?;

        for row in rows {
            sqlx::query(&format!(
                r#"
                INSERT INTO {schema}.{USER_AREA_TABLE} (
                    matched_object_id, low_grade, high_grade, promotion_potential,
                    sub_agency_name, relocation, total_openings, travel_code,
                    apply_online_url, detail_status_url, benefits_url,
                    within_area, commute_distance, agency_contact_email,
                    security_clearance, drug_test_required, remote_indicator,
                    load_date
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
                "#
            ))
            .bind(&row.matched_object_id)
            .bind(&row.low_grade)
            .bind(&row.high_grade)
            .bind(&row.promotion_potential)
            .bind(&row.sub_agency_name)
            .bind(&row.relocation)
            .bind(&row.total_openings)
            .bind(&row.travel_code)
            .bind(&row.apply_online_url)
            .bind(&row.detail_status_url)
            .bind(&row.benefits_url)
            .bind(&row.within_area)
            .bind(&row.commute_distance)
            .bind(&row.agency_contact_email)
            .bind(&row.security_clearance)
            .bind(&row.drug_test_required)
            .bind(&row.remote_indicator)
            .bind(row.load_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn recreate_table(
    tx: &mut Transaction<'_, Postgres>,
    schema: &str,
    table: &str,
    columns: &str,
) -> Result<(), LoadError> {
    sqlx::query(&format!("DROP TABLE IF EXISTS {schema}.{table}"))
        .execute(&mut **tx)
        .await?;
    sqlx::query(&format!("CREATE TABLE {schema}.{table} ({columns})"))
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Identifiers are interpolated into DDL, so gate them to the shape
/// `[a-z_][a-z0-9_]*` first.
fn valid_identifier(name: &str) -> Result<&str, LoadError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(name)
    } else {
        Err(LoadError::InvalidIdentifier(name.to_string()))
    }
}
