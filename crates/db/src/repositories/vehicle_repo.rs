//! Repository for the `vehicles` table.

use sqlx::PgPool;
use vhc_core::types::DbId;

use crate::models::vehicle::{AttachVehicle, CreateVehicle, Vehicle, VehicleBackfill};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, customer_id, registration, vin, make, model, \
    color, fuel_type, mileage, year, external_id, external_source, created_at, updated_at";

/// Lookups and writes used by the booking vehicle matcher.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Find the vehicle linked to an external identity.
    pub async fn find_by_external_id(
        pool: &PgPool,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles
             WHERE organization_id = $1 AND external_source = $2 AND external_id = $3"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(organization_id)
            .bind(external_source)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a vehicle by its normalized registration.
    pub async fn find_by_registration(
        pool: &PgPool,
        organization_id: DbId,
        registration: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles
             WHERE organization_id = $1 AND registration = $2"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(organization_id)
            .bind(registration)
            .fetch_optional(pool)
            .await
    }

    /// Find the oldest vehicle with a matching VIN. `vin` must be uppercased.
    pub async fn find_by_vin(
        pool: &PgPool,
        organization_id: DbId,
        vin: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles
             WHERE organization_id = $1 AND UPPER(vin) = $2
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(organization_id)
            .bind(vin)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new vehicle, returning the created row. `year` is left NULL.
    pub async fn create(pool: &PgPool, input: &CreateVehicle) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles
                (organization_id, customer_id, registration, vin, make, model, color,
                 fuel_type, mileage, external_id, external_source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(input.organization_id)
            .bind(input.customer_id)
            .bind(&input.registration)
            .bind(&input.vin)
            .bind(&input.make)
            .bind(&input.model)
            .bind(&input.color)
            .bind(&input.fuel_type)
            .bind(input.mileage)
            .bind(&input.external_id)
            .bind(&input.external_source)
            .fetch_one(pool)
            .await
    }

    /// Link a registration-matched vehicle to the booking.
    ///
    /// Owner and external identity are replaced; descriptive columns are
    /// only filled where currently NULL.
    pub async fn backfill(
        pool: &PgPool,
        id: DbId,
        input: &VehicleBackfill,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles SET
                customer_id = $2,
                external_id = COALESCE($3, external_id),
                external_source = COALESCE($4, external_source),
                vin = COALESCE(vin, $5),
                make = COALESCE(make, $6),
                model = COALESCE(model, $7),
                color = COALESCE(color, $8),
                fuel_type = COALESCE(fuel_type, $9),
                mileage = COALESCE(mileage, $10)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(input.customer_id)
            .bind(&input.external_id)
            .bind(&input.external_source)
            .bind(&input.vin)
            .bind(&input.make)
            .bind(&input.model)
            .bind(&input.color)
            .bind(&input.fuel_type)
            .bind(input.mileage)
            .fetch_optional(pool)
            .await
    }

    /// Link a VIN-matched vehicle to the booking, taking its registration.
    pub async fn attach(
        pool: &PgPool,
        id: DbId,
        input: &AttachVehicle,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles SET
                customer_id = $2,
                registration = $3,
                external_id = COALESCE($4, external_id),
                external_source = COALESCE($5, external_source)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(input.customer_id)
            .bind(&input.registration)
            .bind(&input.external_id)
            .bind(&input.external_source)
            .fetch_optional(pool)
            .await
    }
}
