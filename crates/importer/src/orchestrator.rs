//! Import run driver.
//!
//! One call to [`BookingImporter::run_import`] opens an audit batch, resolves
//! everything the run needs, fetches the diary, reconciles each booking in
//! order, and records the outcome. Batch-level problems end the run as
//! `failed`; a problem with one booking only fails that booking.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use vhc_core::booking::Booking;
use vhc_core::dms_import::{DateRange, ImportBatchStatus, ImportType};
use vhc_core::import_result::ImportResult;
use vhc_core::types::DbId;

use crate::collaborators::{CredentialProvider, DefaultsResolver, DiaryFetcher};
use crate::config::ImporterConfig;
use crate::customer_matcher::match_customer;
use crate::error::ImportError;
use crate::inspection_creator::{create_inspection, InspectionContext};
use crate::recorder::{self, BatchOutcome};
use crate::store::{ImportFilters, ImportStore, InsertOutcome};
use crate::vehicle_matcher::match_vehicle;

/// Parameters of one import run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunImportOptions {
    pub organization_id: DbId,
    /// Site for the created inspections; defaults to the oldest active site.
    #[serde(default)]
    pub site_id: Option<DbId>,
    #[serde(rename = "date")]
    pub target_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub import_type: ImportType,
    #[serde(default)]
    pub triggered_by: Option<String>,
    /// When present, only these external booking ids are imported.
    #[serde(default)]
    pub booking_ids: Option<Vec<String>>,
}

impl RunImportOptions {
    pub fn new(organization_id: DbId, target_date: NaiveDate, import_type: ImportType) -> Self {
        Self {
            organization_id,
            site_id: None,
            target_date,
            end_date: None,
            import_type,
            triggered_by: None,
            booking_ids: None,
        }
    }
}

/// Everything resolved before the per-booking loop.
struct Prepared {
    template_id: DbId,
    site_id: DbId,
    filters: ImportFilters,
    bookings: Vec<Booking>,
}

/// Why a booking was not reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    NotSelected,
    Closed,
    InternalJob,
    AlreadyImported,
}

pub struct BookingImporter {
    store: Arc<dyn ImportStore>,
    defaults: Arc<dyn DefaultsResolver>,
    credentials: Arc<dyn CredentialProvider>,
    diary: Arc<dyn DiaryFetcher>,
    external_source: String,
}

impl BookingImporter {
    pub fn new(
        store: Arc<dyn ImportStore>,
        defaults: Arc<dyn DefaultsResolver>,
        credentials: Arc<dyn CredentialProvider>,
        diary: Arc<dyn DiaryFetcher>,
        config: &ImporterConfig,
    ) -> Self {
        Self {
            store,
            defaults,
            credentials,
            diary,
            external_source: config.external_source.clone(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ImportStore> {
        &self.store
    }

    pub fn external_source(&self) -> &str {
        &self.external_source
    }

    /// Run one import. Never fails; every outcome is reported through the
    /// returned [`ImportResult`].
    pub async fn run_import(&self, options: RunImportOptions) -> ImportResult {
        let organization_id = options.organization_id;
        let store = self.store.as_ref();

        let batch_id = match recorder::open_batch(store, &options).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(organization_id, error = %e, "Failed to create import batch");
                let mut result = ImportResult::new(None);
                result.record_system_error(format!("Failed to create import batch: {e}"));
                return result;
            }
        };

        tracing::info!(
            organization_id,
            batch_id,
            import_type = %options.import_type,
            target_date = %options.target_date,
            end_date = ?options.end_date,
            "DMS import started"
        );

        let mut result = ImportResult::new(Some(batch_id));

        let (status, site_id) = match self.prepare(&options).await {
            Ok(prepared) => {
                let site_id = prepared.site_id;
                self.process_bookings(&options, batch_id, prepared, &mut result)
                    .await;
                (ImportBatchStatus::after_loop(result.bookings_failed), Some(site_id))
            }
            Err(e) => {
                tracing::error!(organization_id, batch_id, error = %e, "DMS import failed");
                result.record_system_error(e.to_string());
                (ImportBatchStatus::Failed, options.site_id)
            }
        };
        result.success = status != ImportBatchStatus::Failed;

        recorder::finish(
            store,
            BatchOutcome {
                organization_id,
                batch_id,
                status,
                site_id,
                result: &result,
            },
        )
        .await;

        tracing::info!(
            organization_id,
            batch_id,
            status = %status,
            found = result.bookings_found,
            imported = result.bookings_imported,
            skipped = result.bookings_skipped,
            failed = result.bookings_failed,
            "DMS import finished"
        );

        result
    }

    async fn prepare(&self, options: &RunImportOptions) -> Result<Prepared, ImportError> {
        let organization_id = options.organization_id;

        let credentials = self.credentials.get_credentials(organization_id).await?;

        let template_id = self
            .defaults
            .default_template(organization_id)
            .await?
            .ok_or_else(|| {
                ImportError::Configuration("No active inspection template found".into())
            })?;

        let site_id = match options.site_id {
            Some(id) => id,
            None => self
                .defaults
                .default_site(organization_id)
                .await?
                .ok_or_else(|| ImportError::Configuration("No active site found".into()))?,
        };

        let filters = self.store.import_filters(organization_id).await?;
        let range = DateRange::new(options.target_date, options.end_date)?;

        let bookings = self.diary.fetch_bookings(&credentials, range).await?;

        tracing::info!(
            organization_id,
            template_id,
            site_id,
            bookings = bookings.len(),
            "Fetched DMS bookings"
        );

        Ok(Prepared {
            template_id,
            site_id,
            filters,
            bookings,
        })
    }

    async fn process_bookings(
        &self,
        options: &RunImportOptions,
        batch_id: DbId,
        prepared: Prepared,
        result: &mut ImportResult,
    ) {
        let ctx = InspectionContext {
            organization_id: options.organization_id,
            site_id: prepared.site_id,
            template_id: prepared.template_id,
            batch_id,
            external_source: &self.external_source,
        };
        result.bookings_found = i32::try_from(prepared.bookings.len()).unwrap_or(i32::MAX);

        for booking in &prepared.bookings {
            match self.skip_reason(options, &prepared.filters, booking).await {
                Ok(Some(reason)) => {
                    tracing::debug!(
                        batch_id,
                        booking_id = %booking.booking_id,
                        reason = ?reason,
                        "Booking skipped"
                    );
                    result.bookings_skipped += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    booking_failed(batch_id, booking, &e, result);
                    continue;
                }
            }

            if let Err(e) = self.import_booking(&ctx, booking, result).await {
                booking_failed(batch_id, booking, &e, result);
            }
        }
    }

    async fn skip_reason(
        &self,
        options: &RunImportOptions,
        filters: &ImportFilters,
        booking: &Booking,
    ) -> Result<Option<SkipReason>, ImportError> {
        if let Some(selected) = &options.booking_ids {
            if !selected.iter().any(|id| id == &booking.booking_id) {
                return Ok(Some(SkipReason::NotSelected));
            }
        }
        if booking.is_closed() {
            return Ok(Some(SkipReason::Closed));
        }
        if filters.skip_internal_jobs && booking.internal_job {
            return Ok(Some(SkipReason::InternalJob));
        }
        let exists = self
            .store
            .inspection_exists(
                options.organization_id,
                &self.external_source,
                &booking.booking_id,
            )
            .await?;
        Ok(exists.then_some(SkipReason::AlreadyImported))
    }

    /// Customer, then vehicle, then inspection. Counters are bumped as each
    /// step succeeds, so a later failure leaves earlier creations counted.
    async fn import_booking(
        &self,
        ctx: &InspectionContext<'_>,
        booking: &Booking,
        result: &mut ImportResult,
    ) -> Result<(), ImportError> {
        let store = self.store.as_ref();

        let customer = match_customer(
            store,
            ctx.organization_id,
            &booking.customer,
            &self.external_source,
        )
        .await?;
        if customer.created {
            result.customers_created += 1;
        }

        let vehicle = match_vehicle(
            store,
            ctx.organization_id,
            customer.customer_id,
            &booking.vehicle,
            &self.external_source,
        )
        .await?;
        if vehicle.created {
            result.vehicles_created += 1;
        }

        match create_inspection(
            store,
            ctx,
            customer.customer_id,
            vehicle.vehicle_id,
            booking,
            Utc::now(),
        )
        .await?
        {
            InsertOutcome::Created(_) => {
                result.bookings_imported += 1;
                result.health_checks_created += 1;
            }
            InsertOutcome::AlreadyExists => {
                tracing::info!(
                    batch_id = ctx.batch_id,
                    booking_id = %booking.booking_id,
                    "Inspection created concurrently, counting as skipped"
                );
                result.bookings_skipped += 1;
            }
        }
        Ok(())
    }
}

fn booking_failed(batch_id: DbId, booking: &Booking, error: &ImportError, result: &mut ImportResult) {
    tracing::warn!(
        batch_id,
        booking_id = %booking.booking_id,
        error = %error,
        "Booking import failed"
    );
    result.record_failure(&booking.booking_id, error.to_string());
}
