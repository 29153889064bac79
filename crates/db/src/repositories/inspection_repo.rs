//! Repository for the `inspections` table.

use sqlx::types::Json;
use sqlx::PgPool;
use vhc_core::types::DbId;

use crate::models::inspection::{CreateInspection, Inspection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, site_id, customer_id, vehicle_id, template_id, \
    status, external_id, external_source, import_batch_id, promise_time, due_date, mileage, \
    notes, customer_waiting, loan_car_required, internal_job, booked_date, jobsheet_number, \
    jobsheet_status, pre_booked_repairs, created_at, updated_at";

/// Inspection persistence for the dealer import.
pub struct InspectionRepo;

impl InspectionRepo {
    /// Whether an inspection already exists for an external booking.
    pub async fn exists_for_external_id(
        pool: &PgPool,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM inspections
                WHERE organization_id = $1 AND external_source = $2 AND external_id = $3
             )",
        )
        .bind(organization_id)
        .bind(external_source)
        .bind(external_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Insert an inspection unless one already exists for the same external
    /// booking.
    ///
    /// Returns `None` when `uq_inspections_external` rejected the row, which
    /// happens when another run imported the booking first.
    pub async fn create_if_absent(
        pool: &PgPool,
        input: &CreateInspection,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO inspections
                (organization_id, site_id, customer_id, vehicle_id, template_id, status,
                 external_id, external_source, import_batch_id, promise_time, due_date,
                 mileage, notes, customer_waiting, loan_car_required, internal_job,
                 booked_date, jobsheet_number, jobsheet_status, pre_booked_repairs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                     $16, $17, $18, $19, $20)
             ON CONFLICT (organization_id, external_source, external_id)
                WHERE external_id IS NOT NULL
                DO NOTHING
             RETURNING id",
        )
        .bind(input.organization_id)
        .bind(input.site_id)
        .bind(input.customer_id)
        .bind(input.vehicle_id)
        .bind(input.template_id)
        .bind(&input.status)
        .bind(&input.external_id)
        .bind(&input.external_source)
        .bind(input.import_batch_id)
        .bind(input.promise_time)
        .bind(input.due_date)
        .bind(input.mileage)
        .bind(&input.notes)
        .bind(input.customer_waiting)
        .bind(input.loan_car_required)
        .bind(input.internal_job)
        .bind(input.booked_date)
        .bind(&input.jobsheet_number)
        .bind(&input.jobsheet_status)
        .bind(Json(&input.pre_booked_repairs))
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Find an inspection by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1");
        sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List inspections created by one import batch, oldest first.
    pub async fn list_by_import_batch(
        pool: &PgPool,
        import_batch_id: DbId,
    ) -> Result<Vec<Inspection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections
             WHERE import_batch_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(import_batch_id)
            .fetch_all(pool)
            .await
    }
}
