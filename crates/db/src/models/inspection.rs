//! Inspection (health check) entity model and DTOs.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use vhc_core::booking::PreBookedRepair;
use vhc_core::types::{DbId, Timestamp};

/// A row from the `inspections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inspection {
    pub id: DbId,
    pub organization_id: DbId,
    pub site_id: DbId,
    pub customer_id: DbId,
    pub vehicle_id: DbId,
    pub template_id: DbId,
    pub status: String,
    pub external_id: Option<String>,
    pub external_source: Option<String>,
    pub import_batch_id: Option<DbId>,
    pub promise_time: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
    pub customer_waiting: bool,
    pub loan_car_required: bool,
    pub internal_job: bool,
    pub booked_date: Timestamp,
    pub jobsheet_number: Option<String>,
    pub jobsheet_status: Option<String>,
    pub pre_booked_repairs: Json<Vec<PreBookedRepair>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an inspection from a booking.
#[derive(Debug, Clone)]
pub struct CreateInspection {
    pub organization_id: DbId,
    pub site_id: DbId,
    pub customer_id: DbId,
    pub vehicle_id: DbId,
    pub template_id: DbId,
    pub status: String,
    pub external_id: String,
    pub external_source: String,
    pub import_batch_id: DbId,
    pub promise_time: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
    pub customer_waiting: bool,
    pub loan_car_required: bool,
    pub internal_job: bool,
    pub booked_date: Timestamp,
    pub jobsheet_number: Option<String>,
    pub jobsheet_status: Option<String>,
    pub pre_booked_repairs: Vec<PreBookedRepair>,
}
