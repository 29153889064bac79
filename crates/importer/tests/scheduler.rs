mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{booking, day, harness, harness_with, StaticCredentials, StaticDefaults, SITE};
use tokio_util::sync::CancellationToken;
use vhc_core::dms_import::ImportType;
use vhc_importer::config::ImporterConfig;
use vhc_importer::scheduler;

#[tokio::test]
async fn sweep_imports_every_enabled_organization() {
    let h = harness();
    h.store.state().enabled_organizations = vec![1, 2];
    h.diary.set_bookings(vec![booking(1)]);

    let results = scheduler::run_once(&h.importer, day(2026, 3, 2), 2)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, r)| r.success && r.bookings_imported == 1));

    let state = h.store.state();
    assert_eq!(state.batches.len(), 2);
    for batch in state.batches.values() {
        assert_eq!(batch.input.import_type, ImportType::Scheduled);
        assert_eq!(batch.input.target_date, day(2026, 3, 2));
        assert_eq!(batch.input.end_date, Some(day(2026, 3, 4)));
        assert_eq!(batch.input.triggered_by.as_deref(), Some("scheduler"));
    }
}

#[tokio::test]
async fn failing_organization_does_not_stop_the_sweep() {
    let h = harness_with(
        StaticDefaults {
            template_id: None,
            site_id: Some(SITE),
        },
        StaticCredentials { configured: true },
    );
    h.store.state().enabled_organizations = vec![1, 2];

    let results = scheduler::run_once(&h.importer, day(2026, 3, 2), 0)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, r)| !r.success));
}

#[tokio::test]
async fn loop_stops_on_cancel() {
    let h = harness();
    let cancel = CancellationToken::new();
    let config = ImporterConfig {
        schedule_interval: Duration::from_secs(3600),
        ..ImporterConfig::default()
    };

    let handle = tokio::spawn(scheduler::run(
        Arc::new(h.importer),
        config,
        cancel.clone(),
    ));
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();
}
