//! Periodic scheduled imports.
//!
//! Every interval, lists organizations with DMS import enabled and runs a
//! `scheduled` import for each of them, one after another. Runs until the
//! cancellation token fires.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tokio_util::sync::CancellationToken;
use vhc_core::dms_import::ImportType;
use vhc_core::import_result::ImportResult;
use vhc_core::types::DbId;

use crate::config::ImporterConfig;
use crate::error::StoreError;
use crate::orchestrator::{BookingImporter, RunImportOptions};

const TRIGGERED_BY: &str = "scheduler";

/// Options for the scheduled import of one organization.
pub fn scheduled_options(
    organization_id: DbId,
    today: NaiveDate,
    lookahead_days: u32,
) -> RunImportOptions {
    let mut options = RunImportOptions::new(organization_id, today, ImportType::Scheduled);
    if lookahead_days > 0 {
        options.end_date = today.checked_add_days(Days::new(u64::from(lookahead_days)));
    }
    options.triggered_by = Some(TRIGGERED_BY.to_string());
    options
}

/// One sweep over every enabled organization.
pub async fn run_once(
    importer: &BookingImporter,
    today: NaiveDate,
    lookahead_days: u32,
) -> Result<Vec<(DbId, ImportResult)>, StoreError> {
    let organizations = importer.store().list_enabled_organizations().await?;
    let mut results = Vec::with_capacity(organizations.len());

    for organization_id in organizations {
        let result = importer
            .run_import(scheduled_options(organization_id, today, lookahead_days))
            .await;
        if !result.success {
            tracing::warn!(
                organization_id,
                batch_id = ?result.import_id,
                error = ?result.first_error(),
                "Scheduled import failed"
            );
        }
        results.push((organization_id, result));
    }

    Ok(results)
}

/// Run the scheduled import loop until `cancel` is triggered.
pub async fn run(importer: Arc<BookingImporter>, config: ImporterConfig, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = config.schedule_interval.as_secs(),
        lookahead_days = config.lookahead_days,
        "DMS import scheduler started"
    );

    let mut interval = tokio::time::interval(config.schedule_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("DMS import scheduler stopping");
                break;
            }
            _ = interval.tick() => {
                let today = Utc::now().date_naive();
                match run_once(&importer, today, config.lookahead_days).await {
                    Ok(results) => {
                        if results.is_empty() {
                            tracing::debug!("DMS import scheduler: no enabled organizations");
                        } else {
                            let imported: i32 =
                                results.iter().map(|(_, r)| r.bookings_imported).sum();
                            tracing::info!(
                                organizations = results.len(),
                                imported,
                                "DMS import scheduler: sweep finished"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "DMS import scheduler: listing organizations failed");
                    }
                }
            }
        }
    }
}
