//! Read-only access to `inspection_templates` for default resolution.

use sqlx::PgPool;
use vhc_core::types::DbId;

pub struct InspectionTemplateRepo;

impl InspectionTemplateRepo {
    /// The organization's oldest active template.
    pub async fn oldest_active(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM inspection_templates
             WHERE organization_id = $1 AND is_active
             ORDER BY created_at ASC, id ASC
             LIMIT 1",
        )
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Whether `template_id` is an active template of the organization.
    pub async fn is_active(
        pool: &PgPool,
        organization_id: DbId,
        template_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM inspection_templates
                WHERE id = $1 AND organization_id = $2 AND is_active
             )",
        )
        .bind(template_id)
        .bind(organization_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
