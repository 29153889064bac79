//! Monthly DMS usage counter model.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use vhc_core::types::{DbId, Timestamp};

/// A row from the `dms_usage_counters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageCounter {
    pub id: DbId,
    pub organization_id: DbId,
    pub period_start: NaiveDate,
    pub import_count: i32,
    pub bookings_imported: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
