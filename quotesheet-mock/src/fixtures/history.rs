use chrono::{Datelike, Days, NaiveDate, Weekday};
use quotesheet_core::PriceBar;
use rust_decimal::Decimal;

struct Listing {
    id: &'static str,
    listed: (i32, u32, u32),
    base_cents: i64,
}

const LISTINGS: &[(&str, Listing)] = &[
    ("SU.TO", Listing { id: "10001", listed: (1995, 1, 3), base_cents: 2_000 }),
    ("RY.TO", Listing { id: "10002", listed: (1995, 1, 3), base_cents: 6_000 }),
    ("ENB.TO", Listing { id: "10003", listed: (1995, 1, 3), base_cents: 3_500 }),
    ("SHOP.TO", Listing { id: "10004", listed: (2015, 5, 21), base_cents: 1_700 }),
    // recent listing: no data at multi-year horizons
    ("NEWCO.TO", Listing { id: "10005", listed: (2023, 6, 1), base_cents: 1_000 }),
];

fn by_symbol(symbol: &str) -> Option<&'static Listing> {
    LISTINGS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, l)| l)
}

fn by_id(id: &str) -> Option<&'static Listing> {
    LISTINGS.iter().map(|(_, l)| l).find(|l| l.id == id)
}

/// Identifier the mock assigns to a fixture symbol.
pub fn symbol_id(symbol: &str) -> Option<&'static str> {
    by_symbol(symbol).map(|l| l.id)
}

/// Weekday bars between `from` and `to` inclusive, oldest first.
///
/// `None` for an unknown id; an empty vec before the listing date.
pub fn bars(id: &str, from: NaiveDate, to: NaiveDate) -> Option<Vec<PriceBar>> {
    let listing = by_id(id)?;
    let (y, m, d) = listing.listed;
    let listed = NaiveDate::from_ymd_opt(y, m, d)?;
    let mut out = Vec::new();
    let mut day = from.max(listed);
    while day <= to {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(bar(listing.base_cents, day));
        }
        day = day.checked_add_days(Days::new(1))?;
    }
    Some(out)
}

fn bar(base_cents: i64, date: NaiveDate) -> PriceBar {
    // deterministic sawtooth with a ~400-day period
    let n = i64::from(date.num_days_from_ce());
    let close = base_cents + (n % 400) * 5;
    let cents = |c: i64| Decimal::new(c, 2);
    PriceBar {
        date,
        open: cents(close - 10),
        high: cents(close + 25),
        low: cents(close - 30),
        close: cents(close),
        volume: 1_000_000 + u64::try_from(n % 1_000).unwrap_or(0) * 100,
    }
}
