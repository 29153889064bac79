//! Core types and constants for dealer-system (DMS) booking imports.
//!
//! This module has zero external dependencies (no DB, no async, no I/O).
//! It provides:
//!
//! - Import type and batch status enums with string conversions
//! - The batch lifecycle state machine
//! - The fetch date range and usage accounting period helpers

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// External source tag written on records that came from the dealer system.
pub const DEFAULT_EXTERNAL_SOURCE: &str = "dms";

/// Status given to every inspection created from a booking.
pub const INSPECTION_STATUS_AWAITING_ARRIVAL: &str = "awaiting_arrival";

/// Error-list key used for batch-level (non-booking) failures.
pub const SYSTEM_ERROR_KEY: &str = "system";

/// Message raised when a booking has no registration plate.
pub const REGISTRATION_REQUIRED: &str = "vehicle registration is required";

// ---------------------------------------------------------------------------
// Import Type
// ---------------------------------------------------------------------------

/// What triggered an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportType {
    Manual,
    Scheduled,
    Test,
}

impl ImportType {
    /// Return the type name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
            Self::Test => "test",
        }
    }

    /// Parse a type string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "scheduled" => Some(Self::Scheduled),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Like [`ImportType::from_str`] but reports the bad value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::from_str(s).ok_or_else(|| CoreError::UnknownValue {
            kind: "import type",
            value: s.to_string(),
        })
    }

    /// All valid type values.
    pub const ALL: &'static [&'static str] = &["manual", "scheduled", "test"];
}

impl std::fmt::Display for ImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Batch Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an import batch.
///
/// `Running` is the only non-terminal state. `Failed` is reserved for runs
/// that never reached the per-booking loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportBatchStatus {
    Running,
    Completed,
    Partial,
    Failed,
}

impl ImportBatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "partial" => Some(Self::Partial),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Only `running -> terminal` is allowed.
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(self, Self::Running) && next.is_terminal()
    }

    /// Status of a batch whose per-booking loop finished.
    pub fn after_loop(bookings_failed: i32) -> Self {
        if bookings_failed > 0 {
            Self::Partial
        } else {
            Self::Completed
        }
    }

    pub const ALL: &'static [&'static str] = &["running", "completed", "partial", "failed"];
}

impl std::fmt::Display for ImportBatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Date range & usage period
// ---------------------------------------------------------------------------

/// Inclusive range of diary days to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; a missing end means a single day.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, CoreError> {
        let end = end.unwrap_or(start);
        if end < start {
            return Err(CoreError::Validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

/// First day of the month containing `day`, the key of a usage counter row.
pub fn usage_period_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
