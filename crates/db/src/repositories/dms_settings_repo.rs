//! Repository for the `organization_dms_settings` table.

use sqlx::PgPool;
use vhc_core::dms_import::ImportBatchStatus;
use vhc_core::types::DbId;

use crate::models::dms_settings::DmsSettings;

const COLUMNS: &str = "id, organization_id, enabled, default_template_id, skip_internal_jobs, \
    last_import_at, last_import_status, last_import_error, created_at, updated_at";

/// Provides read access to DMS settings plus last-import bookkeeping.
pub struct DmsSettingsRepo;

impl DmsSettingsRepo {
    /// Find the settings row for an organization, if one was configured.
    pub async fn find_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Option<DmsSettings>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM organization_dms_settings WHERE organization_id = $1");
        sqlx::query_as::<_, DmsSettings>(&query)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Organizations with DMS import switched on, in id order.
    pub async fn list_enabled_organizations(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT organization_id FROM organization_dms_settings
             WHERE enabled
             ORDER BY organization_id ASC",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Record the outcome of the latest run.
    ///
    /// Uses `ON CONFLICT (organization_id) DO UPDATE` so an organization
    /// without a settings row still gets its bookkeeping.
    pub async fn record_last_import(
        pool: &PgPool,
        organization_id: DbId,
        status: ImportBatchStatus,
        error: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO organization_dms_settings
                (organization_id, last_import_at, last_import_status, last_import_error)
             VALUES ($1, NOW(), $2, $3)
             ON CONFLICT (organization_id) DO UPDATE SET
                last_import_at = EXCLUDED.last_import_at,
                last_import_status = EXCLUDED.last_import_status,
                last_import_error = EXCLUDED.last_import_error",
        )
        .bind(organization_id)
        .bind(status.as_str())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }
}
