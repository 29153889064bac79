//! Postgres-backed [`ImportStore`] and [`DefaultsResolver`].
//!
//! Thin delegation to the `vhc-db` repositories; `sqlx` errors are
//! classified into [`StoreError`] on the way out.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use vhc_core::dms_import::ImportBatchStatus;
use vhc_core::types::DbId;
use vhc_db::models::customer::{CreateCustomer, Customer, CustomerBackfill};
use vhc_db::models::import_batch::{CreateImportBatch, FinalizeImportBatch};
use vhc_db::models::inspection::CreateInspection;
use vhc_db::models::vehicle::{AttachVehicle, CreateVehicle, Vehicle, VehicleBackfill};
use vhc_db::repositories::{
    CustomerRepo, DmsSettingsRepo, ImportBatchRepo, InspectionRepo, InspectionTemplateRepo,
    SiteRepo, UsageCounterRepo, VehicleRepo,
};

use crate::collaborators::DefaultsResolver;
use crate::error::StoreError;
use crate::store::{ImportFilters, ImportStore, InsertOutcome};

#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn create_batch(&self, input: &CreateImportBatch) -> Result<DbId, StoreError> {
        let batch = ImportBatchRepo::create(&self.pool, input).await?;
        Ok(batch.id)
    }

    async fn finalize_batch(
        &self,
        id: DbId,
        input: &FinalizeImportBatch,
    ) -> Result<(), StoreError> {
        ImportBatchRepo::finalize(&self.pool, id, input)
            .await?
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "running ImportBatch",
                id,
            })
    }

    async fn record_last_import(
        &self,
        organization_id: DbId,
        status: ImportBatchStatus,
        error: Option<&str>,
    ) -> Result<(), StoreError> {
        DmsSettingsRepo::record_last_import(&self.pool, organization_id, status, error).await?;
        Ok(())
    }

    async fn increment_usage(
        &self,
        organization_id: DbId,
        period_start: NaiveDate,
        bookings_imported: i32,
    ) -> Result<(), StoreError> {
        UsageCounterRepo::increment(&self.pool, organization_id, period_start, bookings_imported)
            .await?;
        Ok(())
    }

    async fn import_filters(&self, organization_id: DbId) -> Result<ImportFilters, StoreError> {
        let settings = DmsSettingsRepo::find_by_organization(&self.pool, organization_id).await?;
        Ok(settings
            .map(|s| ImportFilters {
                skip_internal_jobs: s.skip_internal_jobs,
            })
            .unwrap_or_default())
    }

    async fn list_enabled_organizations(&self) -> Result<Vec<DbId>, StoreError> {
        Ok(DmsSettingsRepo::list_enabled_organizations(&self.pool).await?)
    }

    async fn find_customer_by_external_id(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(CustomerRepo::find_by_external_id(
            &self.pool,
            organization_id,
            external_source,
            external_id,
        )
        .await?)
    }

    async fn find_customer_by_email(
        &self,
        organization_id: DbId,
        email: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(CustomerRepo::find_by_email(&self.pool, organization_id, email).await?)
    }

    async fn find_customer_by_mobile(
        &self,
        organization_id: DbId,
        mobile: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(CustomerRepo::find_by_mobile(&self.pool, organization_id, mobile).await?)
    }

    async fn create_customer(&self, input: &CreateCustomer) -> Result<Customer, StoreError> {
        Ok(CustomerRepo::create(&self.pool, input).await?)
    }

    async fn backfill_customer(
        &self,
        id: DbId,
        input: &CustomerBackfill,
    ) -> Result<(), StoreError> {
        CustomerRepo::backfill(&self.pool, id, input)
            .await?
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "Customer",
                id,
            })
    }

    async fn find_vehicle_by_external_id(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<Option<Vehicle>, StoreError> {
        Ok(VehicleRepo::find_by_external_id(
            &self.pool,
            organization_id,
            external_source,
            external_id,
        )
        .await?)
    }

    async fn find_vehicle_by_registration(
        &self,
        organization_id: DbId,
        registration: &str,
    ) -> Result<Option<Vehicle>, StoreError> {
        Ok(VehicleRepo::find_by_registration(&self.pool, organization_id, registration).await?)
    }

    async fn find_vehicle_by_vin(
        &self,
        organization_id: DbId,
        vin: &str,
    ) -> Result<Option<Vehicle>, StoreError> {
        Ok(VehicleRepo::find_by_vin(&self.pool, organization_id, vin).await?)
    }

    async fn create_vehicle(&self, input: &CreateVehicle) -> Result<Vehicle, StoreError> {
        Ok(VehicleRepo::create(&self.pool, input).await?)
    }

    async fn backfill_vehicle(&self, id: DbId, input: &VehicleBackfill) -> Result<(), StoreError> {
        VehicleRepo::backfill(&self.pool, id, input)
            .await?
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "Vehicle",
                id,
            })
    }

    async fn attach_vehicle(&self, id: DbId, input: &AttachVehicle) -> Result<(), StoreError> {
        VehicleRepo::attach(&self.pool, id, input)
            .await?
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "Vehicle",
                id,
            })
    }

    async fn inspection_exists(
        &self,
        organization_id: DbId,
        external_source: &str,
        external_id: &str,
    ) -> Result<bool, StoreError> {
        Ok(InspectionRepo::exists_for_external_id(
            &self.pool,
            organization_id,
            external_source,
            external_id,
        )
        .await?)
    }

    async fn create_inspection(
        &self,
        input: &CreateInspection,
    ) -> Result<InsertOutcome, StoreError> {
        let id = InspectionRepo::create_if_absent(&self.pool, input).await?;
        Ok(id.map_or(InsertOutcome::AlreadyExists, InsertOutcome::Created))
    }
}

#[async_trait]
impl DefaultsResolver for PgImportStore {
    async fn default_template(&self, organization_id: DbId) -> Result<Option<DbId>, StoreError> {
        let configured = DmsSettingsRepo::find_by_organization(&self.pool, organization_id)
            .await?
            .and_then(|s| s.default_template_id);

        if let Some(template_id) = configured {
            if InspectionTemplateRepo::is_active(&self.pool, organization_id, template_id).await? {
                return Ok(Some(template_id));
            }
            tracing::warn!(
                organization_id,
                template_id,
                "Configured default template is inactive, falling back to oldest active"
            );
        }

        Ok(InspectionTemplateRepo::oldest_active(&self.pool, organization_id).await?)
    }

    async fn default_site(&self, organization_id: DbId) -> Result<Option<DbId>, StoreError> {
        Ok(SiteRepo::oldest_active(&self.pool, organization_id).await?)
    }
}
