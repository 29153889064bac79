//! Vehicle entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vhc_core::types::{DbId, Timestamp};

/// A row from the `vehicles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vehicle {
    pub id: DbId,
    pub organization_id: DbId,
    pub customer_id: Option<DbId>,
    /// Whitespace stripped, uppercased. Unique per organization.
    pub registration: String,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub mileage: Option<i32>,
    /// Never populated by the dealer import.
    pub year: Option<i32>,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vehicle from a booking.
#[derive(Debug, Clone, Default)]
pub struct CreateVehicle {
    pub organization_id: DbId,
    pub customer_id: DbId,
    pub registration: String,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub mileage: Option<i32>,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
}

/// Update for a vehicle matched by registration.
///
/// `customer_id` and the external identity are always written; descriptive
/// fields only fill NULLs.
#[derive(Debug, Clone, Default)]
pub struct VehicleBackfill {
    pub customer_id: DbId,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub fuel_type: Option<String>,
    pub mileage: Option<i32>,
}

/// Update for a vehicle matched by VIN: links it to the booking's identity
/// and takes the booking's registration.
#[derive(Debug, Clone, Default)]
pub struct AttachVehicle {
    pub customer_id: DbId,
    pub registration: String,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
}
