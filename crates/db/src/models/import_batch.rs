//! DMS import batch audit model.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use vhc_core::dms_import::{ImportBatchStatus, ImportType};
use vhc_core::import_result::BookingError;
use vhc_core::types::{DbId, Timestamp};

/// A row from the `dms_import_batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportBatch {
    pub id: DbId,
    pub organization_id: DbId,
    pub site_id: Option<DbId>,
    pub import_type: String,
    pub target_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub bookings_found: i32,
    pub bookings_imported: i32,
    pub bookings_skipped: i32,
    pub bookings_failed: i32,
    pub customers_created: i32,
    pub vehicles_created: i32,
    pub health_checks_created: i32,
    pub errors: Json<Vec<BookingError>>,
    pub triggered_by: Option<String>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ImportBatch {
    /// Parsed status; `None` only if the row holds a value this build
    /// does not know.
    pub fn status(&self) -> Option<ImportBatchStatus> {
        ImportBatchStatus::from_str(&self.status)
    }
}

/// DTO for opening a new batch in the `running` state.
#[derive(Debug, Clone)]
pub struct CreateImportBatch {
    pub organization_id: DbId,
    pub site_id: Option<DbId>,
    pub import_type: ImportType,
    pub target_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub triggered_by: Option<String>,
}

/// Terminal state written when a run ends.
#[derive(Debug, Clone)]
pub struct FinalizeImportBatch {
    pub status: ImportBatchStatus,
    /// Effective site, once resolved.
    pub site_id: Option<DbId>,
    pub bookings_found: i32,
    pub bookings_imported: i32,
    pub bookings_skipped: i32,
    pub bookings_failed: i32,
    pub customers_created: i32,
    pub vehicles_created: i32,
    pub health_checks_created: i32,
    pub errors: Vec<BookingError>,
}
