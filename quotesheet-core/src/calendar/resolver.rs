use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use super::holidays::HolidaySet;

/// A calendar date known to be neither a weekend day nor a holiday.
///
/// Only [`TradingDayResolver`] constructs values of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(NaiveDate);

impl TradingDate {
    /// The wrapped calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<TradingDate> for NaiveDate {
    fn from(d: TradingDate) -> Self {
        d.0
    }
}

impl std::fmt::Display for TradingDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Rolls calendar dates back to the nearest trading day at or before them.
///
/// Cheap to clone; the holiday set is shared.
#[derive(Debug, Clone, Default)]
pub struct TradingDayResolver {
    holidays: Arc<HolidaySet>,
}

impl TradingDayResolver {
    /// Build a resolver over a loaded holiday set.
    #[must_use]
    pub const fn new(holidays: Arc<HolidaySet>) -> Self {
        Self { holidays }
    }

    /// The holiday set consulted by this resolver.
    #[must_use]
    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Whether `d` is a trading day: not Saturday, not Sunday, not a holiday.
    #[must_use]
    pub fn is_trading_day(&self, d: NaiveDate) -> bool {
        !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&d)
    }

    /// The latest trading day at or before `d`.
    ///
    /// Returns `d` unchanged when it is already a trading day. Never looks forward.
    #[must_use]
    pub fn resolve(&self, d: NaiveDate) -> TradingDate {
        let mut d = d;
        while !self.is_trading_day(d) {
            // NaiveDate::MIN has no predecessor
            let Some(prev) = d.pred_opt() else { break };
            d = prev;
        }
        TradingDate(d)
    }

    /// The last trading day as of the current wall-clock date in `tz`.
    #[must_use]
    pub fn today(&self, tz: Tz) -> TradingDate {
        self.resolve(Utc::now().with_timezone(&tz).date_naive())
    }
}
