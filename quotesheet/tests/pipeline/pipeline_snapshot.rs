use quotesheet::{Projection, QuotesheetError};
use quotesheet_mock::{DynamicMockMarketData, MockBehavior};

use crate::helpers::{DOC, RY, SU, bar, builder, d, dec, doc, standard_store};

#[tokio::test]
async fn snapshot_skips_symbols_without_data_and_keeps_going() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 14), "44.10"), bar(d(2024, 3, 15), "45.75")])
        .await;
    ctl.set_series(RY, vec![bar(d(2024, 3, 15), "131.02")]).await;

    let store = standard_store(&[SU, "NOPE.TO", RY]).await;
    let qs = builder(market, &store)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(report.failures().is_empty(), "{:?}", report.failures());

    let sheet = &report.documents[0].sheets[0];
    assert_eq!(sheet.projection, Projection::Snapshot);
    assert_eq!(sheet.symbols, 3);
    assert_eq!(sheet.rows_written, 2);

    let region = store.region(DOC, "Data", "B2:E101").await.unwrap();
    assert_eq!(
        region,
        vec![
            vec!["44.75", "47.75", "43.75", "45.75"],
            vec!["130.02", "133.02", "129.02", "131.02"],
        ]
    );
}

#[tokio::test]
async fn snapshot_rolls_weekend_back_to_friday() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 17)).await;
    let writes = store.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].rows[0].cells().last().and_then(|c| c.number()), Some(dec("45.75")));
}

#[tokio::test]
async fn blank_symbol_cells_never_reach_market_data() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, vec![bar(d(2024, 3, 15), "45.75")]).await;
    ctl.set_series(RY, vec![bar(d(2024, 3, 15), "131.02")]).await;

    let store = standard_store(&[SU, "  ", RY]).await;
    let qs = builder(market, &store)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert_eq!(report.documents[0].sheets[0].symbols, 2);
    assert_eq!(report.documents[0].sheets[0].rows_written, 2);
    assert_eq!(ctl.resolve_calls().await, vec![SU.to_string(), RY.to_string()]);
}

#[tokio::test]
async fn rows_follow_symbol_order_under_concurrency() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    let symbols = ["A.TO", "B.TO", "C.TO", "D.TO", "E.TO"];
    for (i, s) in symbols.iter().enumerate() {
        ctl.set_series(s, vec![bar(d(2024, 3, 15), &format!("{}", 10 + i))]).await;
    }

    let store = standard_store(&symbols).await;
    let qs = builder(market, &store)
        .fetch_concurrency(3)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 15)).await;
    let closes: Vec<_> = store.writes().await[0]
        .rows
        .iter()
        .filter_map(|r| r.cells().last().and_then(|c| c.number()))
        .collect();
    assert_eq!(closes, ["10", "11", "12", "13", "14"].map(dec).to_vec());
}

#[tokio::test]
async fn unknown_symbol_failure_mode_is_not_an_error() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_symbol_behavior(
        "GONE.TO",
        MockBehavior::Fail(QuotesheetError::symbol_not_found("GONE.TO")),
    )
    .await;

    let store = standard_store(&["GONE.TO"]).await;
    let qs = builder(market, &store)
        .document(doc(DOC, Some("Data"), None, None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(report.documents[0].is_ok());
    assert_eq!(report.documents[0].sheets[0].rows_written, 0);
    assert_eq!(store.writes().await.len(), 1);
}
