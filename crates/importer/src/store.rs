//! Storage seam used by the matchers, the creator, and the recorder.
//!
//! [`PgImportStore`](crate::pg_store::PgImportStore) is the production
//! implementation. Every method is organization-scoped where it reads or
//! writes tenant data.

use async_trait::async_trait;
use chrono::NaiveDate;
use vhc_core::dms_import::ImportBatchStatus;
use vhc_core::types::DbId;
use vhc_db::models::customer::{CreateCustomer, Customer, CustomerBackfill};
use vhc_db::models::import_batch::{CreateImportBatch, FinalizeImportBatch};
use vhc_db::models::inspection::CreateInspection;
use vhc_db::models::vehicle::{AttachVehicle, CreateVehicle, Vehicle, VehicleBackfill};

use crate::error::StoreError;

/// Per-organization filters applied before a booking is reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportFilters {
    pub skip_internal_jobs: bool,
}

/// Result of an insert guarded by a unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(DbId),
    AlreadyExists,
}

#[async_trait]
pub trait ImportStore: Send + Sync {
    // -- batches ------------------------------------------------------------

    async fn create_batch(&self, input: &CreateImportBatch) -> Result<DbId, StoreError>;

    /// Fails with [`StoreError::NotFound`] if the batch is missing or no
    /// longer `running`.
    async fn finalize_batch(&self, id: DbId, input: &FinalizeImportBatch)
        -> Result<(), StoreError>;

    async fn record_last_import(
        &self,
        organization_id: DbId,
        status: ImportBatchStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn increment_usage(
        &self,
        organization_id: DbId,
        period_start: NaiveDate,
        bookings_imported: i32,
    ) -> Result<(), StoreError>;

    async fn import_filters(&self, organization_id: DbId) -> Result<ImportFilters, StoreError>;

    async fn list_enabled_organizations(&self) -> Result<Vec<DbId>, StoreError>;

    // -- customers ----------------------------------------------------------

    async fn find_customer_by_external_id(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, StoreError>;

    async fn find_customer_by_email(
        &self,
        organization_id: DbId,
        email: &str,
    ) -> Result<Option<Customer>, StoreError>;

    async fn find_customer_by_mobile(
        &self,
        organization_id: DbId,
        mobile: &str,
    ) -> Result<Option<Customer>, StoreError>;

    async fn create_customer(&self, input: &CreateCustomer) -> Result<Customer, StoreError>;

    async fn backfill_customer(&self, id: DbId, input: &CustomerBackfill)
        -> Result<(), StoreError>;

    // -- vehicles -----------------------------------------------------------

    async fn find_vehicle_by_external_id(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Vehicle>, StoreError>;

    async fn find_vehicle_by_registration(
        &self,
        organization_id: DbId,
        registration: &str,
    ) -> Result<Option<Vehicle>, StoreError>;

    async fn find_vehicle_by_vin(
        &self,
        organization_id: DbId,
        vin: &str,
    ) -> Result<Option<Vehicle>, StoreError>;

    async fn create_vehicle(&self, input: &CreateVehicle) -> Result<Vehicle, StoreError>;

    async fn backfill_vehicle(&self, id: DbId, input: &VehicleBackfill) -> Result<(), StoreError>;

    async fn attach_vehicle(&self, id: DbId, input: &AttachVehicle) -> Result<(), StoreError>;

    // -- inspections --------------------------------------------------------

    async fn inspection_exists(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<bool, StoreError>;

    /// Insert an inspection; a duplicate external booking yields
    /// [`InsertOutcome::AlreadyExists`] rather than an error.
    async fn create_inspection(&self, input: &CreateInspection)
        -> Result<InsertOutcome, StoreError>;
}
