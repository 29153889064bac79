//! Per-organization dealer-system settings.

use serde::Serialize;
use sqlx::FromRow;
use vhc_core::types::{DbId, Timestamp};

/// A row from the `organization_dms_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DmsSettings {
    pub id: DbId,
    pub organization_id: DbId,
    /// Scheduled imports only run for enabled organizations.
    pub enabled: bool,
    pub default_template_id: Option<DbId>,
    pub skip_internal_jobs: bool,
    pub last_import_at: Option<Timestamp>,
    pub last_import_status: Option<String>,
    pub last_import_error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
