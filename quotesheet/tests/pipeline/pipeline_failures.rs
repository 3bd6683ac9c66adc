use std::time::Duration;

use quotesheet::{DocumentConfig, Projection, QuotesheetError, SymbolId};
use quotesheet_mock::{DynamicMockMarketData, MemorySheetStore, MockBehavior};

use crate::helpers::{DOC, RY, SU, bar, builder, d, doc, standard_store};

#[tokio::test]
async fn missing_document_is_recorded_and_next_document_runs() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .document(DocumentConfig::standard("Archive"))
        .document(DocumentConfig::standard(DOC))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert_eq!(report.documents.len(), 2);

    let missing = &report.documents[0];
    assert!(matches!(
        missing.error,
        Some(QuotesheetError::DocumentNotFound { ref document }) if document == "Archive"
    ));
    assert!(missing.sheets.is_empty());

    assert!(report.documents[1].is_ok());
    assert_eq!(report.documents[1].sheets.len(), 3);
    assert_eq!(store.writes().await.len(), 3);
    assert_eq!(report.failures().len(), 1);
}

#[tokio::test]
async fn missing_sheet_fails_that_sheet_only() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;

    let store = MemorySheetStore::new();
    store.add_sheet(DOC, "Data").await;
    store.add_sheet(DOC, "Returns").await;
    store.set_column(DOC, "Data", "A2:A", &[SU]).await.unwrap();
    store.set_column(DOC, "Returns", "A2:A", &[SU]).await.unwrap();

    let qs = builder(market, &store)
        .return_years(vec![0])
        .document(DocumentConfig::standard(DOC))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    let sheets = &report.documents[0].sheets;
    assert_eq!(sheets.len(), 3);
    assert!(sheets[0].is_ok());
    assert_eq!(sheets[1].projection, Projection::Rolling);
    assert!(matches!(sheets[1].error, Some(QuotesheetError::SheetNotFound { .. })));
    assert!(sheets[2].is_ok());
    assert_eq!(store.writes().await.len(), 2);
}

#[tokio::test]
async fn collaborator_failure_means_no_write_for_that_sheet() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;
    ctl.set_symbol_behavior(RY, MockBehavior::Return(SymbolId::new(RY)))
        .await;
    ctl.set_candles_behavior(
        SymbolId::new(RY),
        MockBehavior::Fail(QuotesheetError::unavailable("dyn", "503")),
    )
    .await;

    let store = standard_store(&[SU, RY]).await;
    store.set_column(DOC, "Data", "B2:B", &["stale"]).await.unwrap();
    let qs = builder(market, &store)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].1, Some("Data"));
    assert!(failures[0].2.is_collaborator_failure());

    assert!(store.writes().await.is_empty());
    let region = store.region(DOC, "Data", "B2:B2").await.unwrap();
    assert_eq!(region, vec![vec!["stale"]]);
}

#[tokio::test(start_paused = true)]
async fn hanging_collaborator_times_out() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_symbol_behavior(SU, MockBehavior::Hang).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .provider_timeout(Duration::from_millis(50))
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(matches!(
        report.documents[0].sheets[0].error,
        Some(QuotesheetError::Timeout { .. })
    ));
    assert!(store.writes().await.is_empty());
}

#[tokio::test]
async fn failed_write_is_reported_and_next_sheet_proceeds() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;

    let store = standard_store(&[SU]).await;
    store
        .fail_writes(DOC, "Data", QuotesheetError::unavailable("memory-sheets", "quota"))
        .await;
    let qs = builder(market, &store)
        .return_years(vec![0])
        .document(DocumentConfig::standard(DOC))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    let sheets = &report.documents[0].sheets;
    assert!(sheets[0].error.is_some());
    assert_eq!(sheets[0].rows_written, 0);
    assert!(sheets[1].is_ok() && sheets[2].is_ok());
    assert_eq!(store.writes().await.len(), 2);
}

#[tokio::test]
async fn bad_range_is_rejected_before_reading() {
    let (market, _ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let store = standard_store(&[SU]).await;
    store
        .fail_reads(DOC, "Data", QuotesheetError::unavailable("memory-sheets", "unreachable"))
        .await;

    let mut layout = quotesheet::SheetLayout::default();
    layout.quotes.output = "E2:B1".to_string();
    let qs = builder(market, &store)
        .layout(layout)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(matches!(
        report.documents[0].sheets[0].error,
        Some(QuotesheetError::InvalidArg(_))
    ));
}

#[tokio::test]
async fn malformed_bars_fail_the_sheet_and_next_sheet_proceeds() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let mut broken = bar(d(2024, 3, 15), "45.75");
    broken.close = -broken.close;
    ctl.set_series(SU, vec![broken]).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .return_years(vec![1])
        .document(doc(DOC, Some("Data"), None, Some("Returns")))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    let sheets = &report.documents[0].sheets;
    assert!(matches!(sheets[0].error, Some(QuotesheetError::Data(_))));
    assert!(!sheets[0].error.as_ref().is_some_and(QuotesheetError::is_collaborator_failure));
    assert!(sheets[1].is_ok());
    assert_eq!(store.writes().await.len(), 1);
}
