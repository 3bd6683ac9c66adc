// Shared fixtures for the orchestrator integration tests.
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};
use quotesheet::{DocumentConfig, HolidaySet, PriceBar, QuotesheetBuilder, Quotesheet, SheetStore};
use quotesheet_mock::MemorySheetStore;
use rust_decimal::Decimal;

pub const DOC: &str = "Portfolio";
pub const SU: &str = "SU.TO";
pub const RY: &str = "RY.TO";

/// Calendar date from components.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

/// Decimal from its canonical string form.
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal")
}

/// Bar with distinct open/high/low around `close`.
pub fn bar(date: NaiveDate, close: &str) -> PriceBar {
    let c = dec(close);
    PriceBar {
        date,
        open: c - Decimal::ONE,
        high: c + Decimal::TWO,
        low: c - Decimal::TWO,
        close: c,
        volume: 1_000,
    }
}

/// Weekday bars from `from` through `to`, oldest first, with closes 10, 11, 12, ...
pub fn weekday_bars(from: NaiveDate, to: NaiveDate) -> Vec<PriceBar> {
    from.iter_days()
        .take_while(|day| *day <= to)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .zip(10u32..)
        .map(|(day, close)| bar(day, &close.to_string()))
        .collect()
}

/// A document with only the given sheets configured.
pub fn doc(
    name: &str,
    quotes: Option<&str>,
    sparklines: Option<&str>,
    returns: Option<&str>,
) -> DocumentConfig {
    DocumentConfig {
        name: name.to_string(),
        quote_sheet: quotes.map(str::to_string),
        sparkline_sheet: sparklines.map(str::to_string),
        returns_sheet: returns.map(str::to_string),
    }
}

/// Store holding `DOC` with the three standard sheets and `symbols` in each symbol column.
pub async fn standard_store(symbols: &[&str]) -> MemorySheetStore {
    let store = MemorySheetStore::new();
    store.add_sheet(DOC, "Data").await;
    store.add_sheet(DOC, "Sparklines").await;
    store.add_sheet(DOC, "Returns").await;
    store.set_column(DOC, "Data", "A2:A", symbols).await.unwrap();
    store.set_column(DOC, "Sparklines", "A1:A", symbols).await.unwrap();
    store.set_column(DOC, "Returns", "A2:A", symbols).await.unwrap();
    store
}

/// Builder wired to the given collaborators, with no write pause and no holidays.
pub fn builder(market: Arc<dyn quotesheet::MarketData>, store: &MemorySheetStore) -> QuotesheetBuilder {
    Quotesheet::builder()
        .market_data(market)
        .sheet_store(Arc::new(store.clone()) as Arc<dyn SheetStore>)
        .holidays(HolidaySet::new())
        .write_pause(Duration::ZERO)
        .market_timezone(chrono_tz::America::Edmonton)
}
