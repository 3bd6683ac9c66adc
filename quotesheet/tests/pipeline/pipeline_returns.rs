use std::sync::Arc;

use quotesheet::{Cell, MissingHorizonPolicy};
use quotesheet_middleware::{SymbolCacheConfig, SymbolCacheMiddleware};
use quotesheet_mock::DynamicMockMarketData;

use crate::helpers::{DOC, RY, SU, bar, builder, d, dec, doc, standard_store};

fn su_history() -> Vec<quotesheet::PriceBar> {
    vec![
        bar(d(2023, 3, 15), "30.50"),
        bar(d(2024, 3, 15), "45.75"),
        // Not an anchor; must never be picked.
        bar(d(2024, 3, 14), "44.00"),
    ]
}

#[tokio::test]
async fn missing_horizon_is_skipped_by_default() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, su_history()).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .return_years(vec![0, 1, 3])
        .document(doc(DOC, None, None, Some("Returns")))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(report.documents[0].is_ok());

    // Three horizons, no bar three years back: the row is intentionally shorter
    // and the later cells shift left.
    let row = &store.writes().await[0].rows[0];
    assert_eq!(row.len(), 2);
    assert_eq!(row.numbers().collect::<Vec<_>>(), vec![dec("45.75"), dec("30.50")]);
}

#[tokio::test]
async fn blank_policy_keeps_one_cell_per_horizon() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, su_history()).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .return_years(vec![0, 3, 1])
        .missing_horizon_policy(MissingHorizonPolicy::Blank)
        .document(doc(DOC, None, None, Some("Returns")))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 15)).await;
    let row = &store.writes().await[0].rows[0];
    assert_eq!(
        row.cells(),
        &[Cell::Number(dec("45.75")), Cell::Blank, Cell::Number(dec("30.50"))]
    );
}

#[tokio::test]
async fn horizons_resolve_to_trading_days() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    // 2023-03-18 is a Saturday; one year back from 2024-03-18 lands on Friday 2023-03-17.
    ctl.set_series(
        SU,
        vec![bar(d(2023, 3, 17), "29.00"), bar(d(2024, 3, 18), "46.00")],
    )
    .await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .return_years(vec![0, 1])
        .document(doc(DOC, None, None, Some("Returns")))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 18)).await;
    assert_eq!(
        store.writes().await[0].rows[0].numbers().collect::<Vec<_>>(),
        vec![dec("46.00"), dec("29.00")]
    );
}

#[tokio::test]
async fn unknown_symbol_gets_an_empty_row() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(RY, vec![bar(d(2024, 3, 15), "131.02")]).await;

    let store = standard_store(&["NOPE.TO", RY]).await;
    let qs = builder(market, &store)
        .return_years(vec![0])
        .document(doc(DOC, None, None, Some("Returns")))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert_eq!(report.documents[0].sheets[0].rows_written, 2);
    let rows = &store.writes().await[0].rows;
    assert!(rows[0].is_empty());
    assert_eq!(rows[1].numbers().collect::<Vec<_>>(), vec![dec("131.02")]);
}

#[tokio::test]
async fn symbol_cache_resolves_each_symbol_once_across_horizons() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, su_history()).await;
    ctl.set_series(RY, vec![bar(d(2024, 3, 15), "131.02")]).await;
    let cached = SymbolCacheMiddleware::wrap(Arc::clone(&market), &SymbolCacheConfig::default());

    let store = standard_store(&[SU, RY]).await;
    let qs = builder(cached, &store)
        .return_years(vec![0, 1, 3, 5, 10])
        .document(doc(DOC, None, None, Some("Returns")))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 15)).await;
    assert_eq!(ctl.resolve_calls().await, vec![SU.to_string(), RY.to_string()]);
    assert_eq!(ctl.candle_requests().await.len(), 10);
}
