use chrono::{TimeZone, Utc};
use quotesheet::Interval;
use quotesheet_mock::DynamicMockMarketData;

use crate::helpers::{DOC, RY, SU, builder, d, dec, doc, standard_store, weekday_bars};

#[tokio::test]
async fn rolling_row_is_newest_first_within_window() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    // closes: Mar 11 -> 10 .. Mar 15 -> 14
    ctl.set_series(SU, weekday_bars(d(2024, 3, 11), d(2024, 3, 15))).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .rolling_window_days(3)
        .document(doc(DOC, None, Some("Sparklines"), None))
        .build()
        .unwrap();

    let report = qs.update_all_as_of(d(2024, 3, 15)).await;
    assert!(report.documents[0].is_ok());

    let writes = store.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].range, "B1:BZ100");
    assert_eq!(
        writes[0].rows[0].numbers().collect::<Vec<_>>(),
        vec![dec("14"), dec("13"), dec("12")]
    );
}

#[tokio::test]
async fn rolling_keeps_a_row_for_symbols_without_data() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(RY, weekday_bars(d(2024, 3, 11), d(2024, 3, 15))).await;

    let store = standard_store(&["NOPE.TO", RY]).await;
    let qs = builder(market, &store)
        .rolling_window_days(2)
        .document(doc(DOC, None, Some("Sparklines"), None))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 15)).await;

    let rows = &store.writes().await[0].rows;
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_empty());
    assert_eq!(rows[1].len(), 2);

    let region = store.region(DOC, "Sparklines", "B1:C2").await.unwrap();
    assert_eq!(region, vec![vec![], vec!["14", "13"]]);
}

#[tokio::test]
async fn fetch_window_spans_local_days_ending_on_trading_day() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, Vec::new()).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .rolling_window_days(3)
        .document(doc(DOC, None, Some("Sparklines"), None))
        .build()
        .unwrap();

    // Saturday rolls back to Friday 2024-03-15; Edmonton is UTC-6 after the DST switch.
    qs.update_all_as_of(d(2024, 3, 16)).await;

    let requests = ctl.candle_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].interval, Interval::D1);
    assert_eq!(requests[0].start, Utc.with_ymd_and_hms(2024, 3, 13, 6, 0, 0).unwrap());
    assert_eq!(requests[0].end, Utc.with_ymd_and_hms(2024, 3, 16, 5, 59, 59).unwrap());
}

#[tokio::test]
async fn holiday_moves_the_window_back() {
    let (market, ctl) = DynamicMockMarketData::new_with_controller("dyn");
    ctl.set_series(SU, weekday_bars(d(2024, 3, 11), d(2024, 3, 15))).await;

    let store = standard_store(&[SU]).await;
    let qs = builder(market, &store)
        .holidays([d(2024, 3, 15)].into_iter().collect())
        .rolling_window_days(1)
        .document(doc(DOC, None, Some("Sparklines"), None))
        .build()
        .unwrap();

    qs.update_all_as_of(d(2024, 3, 15)).await;
    assert_eq!(
        store.writes().await[0].rows[0].numbers().collect::<Vec<_>>(),
        vec![dec("13")]
    );
}
