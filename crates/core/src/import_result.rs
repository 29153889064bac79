//! The summary returned to whoever triggered an import run.

use serde::{Deserialize, Serialize};

use crate::dms_import::SYSTEM_ERROR_KEY;
use crate::types::DbId;

/// One failure recorded against a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingError {
    /// External booking id, or `"system"` for batch-level failures.
    pub booking_id: String,
    pub error: String,
}

/// Outcome of one import run. Always fully populated, even when the run
/// failed before touching any booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    /// `None` only when the batch row itself could not be created.
    pub import_id: Option<DbId>,
    pub bookings_found: i32,
    pub bookings_imported: i32,
    pub bookings_skipped: i32,
    pub bookings_failed: i32,
    pub customers_created: i32,
    pub vehicles_created: i32,
    pub health_checks_created: i32,
    pub errors: Vec<BookingError>,
}

impl ImportResult {
    pub fn new(import_id: Option<DbId>) -> Self {
        Self {
            import_id,
            ..Default::default()
        }
    }

    /// Count a booking as failed and remember why.
    pub fn record_failure(&mut self, booking_id: &str, error: impl Into<String>) {
        self.bookings_failed += 1;
        self.errors.push(BookingError {
            booking_id: booking_id.to_string(),
            error: error.into(),
        });
    }

    /// Record a batch-level failure. Does not touch the booking counters.
    pub fn record_system_error(&mut self, error: impl Into<String>) {
        self.errors.push(BookingError {
            booking_id: SYSTEM_ERROR_KEY.to_string(),
            error: error.into(),
        });
    }

    /// First recorded error message, used for last-import bookkeeping.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.error.as_str())
    }
}
