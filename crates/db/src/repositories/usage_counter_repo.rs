//! Repository for the `dms_usage_counters` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use vhc_core::types::DbId;

use crate::models::usage_counter::UsageCounter;

const COLUMNS: &str = "id, organization_id, period_start, import_count, bookings_imported, \
    created_at, updated_at";

/// Monthly usage accounting for DMS imports.
pub struct UsageCounterRepo;

impl UsageCounterRepo {
    /// Add one import and `bookings_imported` bookings to the period's row,
    /// creating it on first use.
    pub async fn increment(
        pool: &PgPool,
        organization_id: DbId,
        period_start: NaiveDate,
        bookings_imported: i32,
    ) -> Result<UsageCounter, sqlx::Error> {
        let query = format!(
            "INSERT INTO dms_usage_counters
                (organization_id, period_start, import_count, bookings_imported)
             VALUES ($1, $2, 1, $3)
             ON CONFLICT (organization_id, period_start) DO UPDATE SET
                import_count = dms_usage_counters.import_count + 1,
                bookings_imported = dms_usage_counters.bookings_imported
                    + EXCLUDED.bookings_imported
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UsageCounter>(&query)
            .bind(organization_id)
            .bind(period_start)
            .bind(bookings_imported)
            .fetch_one(pool)
            .await
    }

    /// Find the counter for one organization and period.
    pub async fn find(
        pool: &PgPool,
        organization_id: DbId,
        period_start: NaiveDate,
    ) -> Result<Option<UsageCounter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dms_usage_counters
             WHERE organization_id = $1 AND period_start = $2"
        );
        sqlx::query_as::<_, UsageCounter>(&query)
            .bind(organization_id)
            .bind(period_start)
            .fetch_optional(pool)
            .await
    }
}
