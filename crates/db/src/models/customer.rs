//! Customer entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vhc_core::types::{DbId, Timestamp};

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub organization_id: DbId,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Stored lower-cased when written by the importer.
    pub email: Option<String>,
    /// Stored without whitespace when written by the importer.
    pub mobile: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a customer from a booking.
#[derive(Debug, Clone, Default)]
pub struct CreateCustomer {
    pub organization_id: DbId,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
}

/// Gap-filling update applied to a customer matched by email or mobile.
///
/// Every field only lands where the stored value is NULL.
#[derive(Debug, Clone, Default)]
pub struct CustomerBackfill {
    pub title: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
}
