//! Batch bookkeeping around an import run: opening the `running` row and
//! writing the terminal state, last-import status, and usage.

use chrono::Utc;
use vhc_core::dms_import::{usage_period_start, ImportBatchStatus};
use vhc_core::import_result::ImportResult;
use vhc_core::types::DbId;
use vhc_db::models::import_batch::{CreateImportBatch, FinalizeImportBatch};

use crate::best_effort::best_effort;
use crate::error::StoreError;
use crate::orchestrator::RunImportOptions;
use crate::store::ImportStore;

pub async fn open_batch(
    store: &dyn ImportStore,
    options: &RunImportOptions,
) -> Result<DbId, StoreError> {
    let input = CreateImportBatch {
        organization_id: options.organization_id,
        site_id: options.site_id,
        import_type: options.import_type,
        target_date: options.target_date,
        end_date: options.end_date,
        triggered_by: options.triggered_by.clone(),
    };
    store.create_batch(&input).await
}

/// Terminal bookkeeping for one run.
pub struct BatchOutcome<'a> {
    pub organization_id: DbId,
    pub batch_id: DbId,
    pub status: ImportBatchStatus,
    pub site_id: Option<DbId>,
    pub result: &'a ImportResult,
}

/// Persist the outcome. None of these writes can change what the caller
/// gets back, so failures are only logged.
pub async fn finish(store: &dyn ImportStore, outcome: BatchOutcome<'_>) {
    let BatchOutcome {
        organization_id,
        batch_id,
        status,
        site_id,
        result,
    } = outcome;

    let input = FinalizeImportBatch {
        status,
        site_id,
        bookings_found: result.bookings_found,
        bookings_imported: result.bookings_imported,
        bookings_skipped: result.bookings_skipped,
        bookings_failed: result.bookings_failed,
        customers_created: result.customers_created,
        vehicles_created: result.vehicles_created,
        health_checks_created: result.health_checks_created,
        errors: result.errors.clone(),
    };
    if let Err(e) = store.finalize_batch(batch_id, &input).await {
        tracing::error!(
            organization_id,
            batch_id,
            status = %status,
            error = %e,
            "Failed to finalize import batch"
        );
    }

    best_effort(
        "last import status",
        store.record_last_import(organization_id, status, result.first_error()),
    )
    .await;

    // A failed batch never reached the booking loop, so there is nothing to count.
    if status != ImportBatchStatus::Failed {
        let period = usage_period_start(Utc::now().date_naive());
        best_effort(
            "usage increment",
            store.increment_usage(organization_id, period, result.bookings_imported),
        )
        .await;
    }
}
