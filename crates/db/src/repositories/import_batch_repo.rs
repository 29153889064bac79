//! Repository for the `dms_import_batches` audit table.

use sqlx::types::Json;
use sqlx::PgPool;
use vhc_core::dms_import::ImportBatchStatus;
use vhc_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use vhc_core::types::DbId;

use crate::models::import_batch::{CreateImportBatch, FinalizeImportBatch, ImportBatch};

/// Column list for dms_import_batches queries.
const COLUMNS: &str = "id, organization_id, site_id, import_type, target_date, end_date, \
    status, bookings_found, bookings_imported, bookings_skipped, bookings_failed, \
    customers_created, vehicles_created, health_checks_created, errors, triggered_by, \
    started_at, completed_at, created_at, updated_at";

/// Batch rows are created once, finalized once, and never deleted.
pub struct ImportBatchRepo;

impl ImportBatchRepo {
    /// Open a new batch in the `running` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateImportBatch,
    ) -> Result<ImportBatch, sqlx::Error> {
        let query = format!(
            "INSERT INTO dms_import_batches
                (organization_id, site_id, import_type, target_date, end_date, status,
                 triggered_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImportBatch>(&query)
            .bind(input.organization_id)
            .bind(input.site_id)
            .bind(input.import_type.as_str())
            .bind(input.target_date)
            .bind(input.end_date)
            .bind(ImportBatchStatus::Running.as_str())
            .bind(&input.triggered_by)
            .fetch_one(pool)
            .await
    }

    /// Write the terminal status, counts, and errors.
    ///
    /// Only a `running` batch can be finalized; returns `None` if the batch
    /// does not exist or has already reached a terminal state.
    pub async fn finalize(
        pool: &PgPool,
        id: DbId,
        input: &FinalizeImportBatch,
    ) -> Result<Option<ImportBatch>, sqlx::Error> {
        let query = format!(
            "UPDATE dms_import_batches SET
                status = $2,
                site_id = COALESCE($3, site_id),
                bookings_found = $4,
                bookings_imported = $5,
                bookings_skipped = $6,
                bookings_failed = $7,
                customers_created = $8,
                vehicles_created = $9,
                health_checks_created = $10,
                errors = $11,
                completed_at = NOW()
             WHERE id = $1 AND status = 'running'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ImportBatch>(&query)
            .bind(id)
            .bind(input.status.as_str())
            .bind(input.site_id)
            .bind(input.bookings_found)
            .bind(input.bookings_imported)
            .bind(input.bookings_skipped)
            .bind(input.bookings_failed)
            .bind(input.customers_created)
            .bind(input.vehicles_created)
            .bind(input.health_checks_created)
            .bind(Json(&input.errors))
            .fetch_optional(pool)
            .await
    }

    /// Find a batch by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ImportBatch>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dms_import_batches WHERE id = $1");
        sqlx::query_as::<_, ImportBatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List batches for an organization, newest first.
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ImportBatch>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM dms_import_batches
             WHERE organization_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ImportBatch>(&query)
            .bind(organization_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
