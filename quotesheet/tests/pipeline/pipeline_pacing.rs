use std::time::Duration;

use quotesheet::{DocumentConfig, QuotesheetError, RunMode};
use quotesheet_mock::{DynamicMockMarketData, MemorySheetStore};
use tokio::time::Instant;

use crate::helpers::{DOC, SU, bar, builder, d, doc, standard_store};

#[tokio::test(start_paused = true)]
async fn pauses_after_every_write() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .write_pause(Duration::from_secs(5))
        .return_years(vec![0])
        .document(DocumentConfig::standard(DOC))
        .build()
        .unwrap();

    let started = Instant::now();
    qs.update_all_as_of(d(2024, 3, 15)).await;
    let elapsed = started.elapsed();

    assert_eq!(store.writes().await.len(), 3);
    assert!(elapsed >= Duration::from_secs(15), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(16), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn no_pause_after_a_failed_sheet() {
    let (market, _ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let store = standard_store(&[SU]).await;
    store
        .fail_writes(DOC, "Data", QuotesheetError::unavailable("memory-sheets", "quota"))
        .await;
    let qs = builder(market, &store)
        .write_pause(Duration::from_secs(5))
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let started = Instant::now();
    qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn run_once_is_a_single_cycle() {
    let (market, _ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.run(RunMode::Once).await;
    assert_eq!(report.documents.len(), 1);
    assert_eq!(store.writes().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn run_until_checks_stop_between_cycles() {
    let (market, _ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .cycle_pause(Duration::from_secs(60))
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    // Cycles start at t=0 and t=60; the stop at t=90 lands during the second pause.
    let report = qs.run_until(tokio::time::sleep(Duration::from_secs(90))).await;
    assert_eq!(report.documents.len(), 1);
    assert_eq!(store.writes().await.len(), 2);
}

#[tokio::test]
async fn run_until_with_ready_stop_still_runs_one_cycle() {
    let (market, _ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let store = MemorySheetStore::new();
    let qs = builder(market, &store)
        .document(DocumentConfig::standard(DOC))
        .build()
        .unwrap();

    let report = qs.run_until(async {}).await;
    assert!(matches!(
        report.documents[0].error,
        Some(QuotesheetError::DocumentNotFound { .. })
    ));
}
