//! Read-only access to `sites` for default resolution.

use sqlx::PgPool;
use vhc_core::types::DbId;

pub struct SiteRepo;

impl SiteRepo {
    /// The organization's oldest active site.
    pub async fn oldest_active(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM sites
             WHERE organization_id = $1 AND is_active
             ORDER BY created_at ASC, id ASC
             LIMIT 1",
        )
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }
}
