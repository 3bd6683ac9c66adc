use chrono::{Months, NaiveDate};

use super::resolver::{TradingDate, TradingDayResolver};
use crate::QuotesheetError;

/// Derives the historical anchor trading days for multi-year returns.
#[derive(Debug, Clone, Default)]
pub struct ReturnHorizonPlanner {
    resolver: TradingDayResolver,
}

impl ReturnHorizonPlanner {
    /// Plan anchors with the given resolver.
    #[must_use]
    pub const fn new(resolver: TradingDayResolver) -> Self {
        Self { resolver }
    }

    /// One anchor per entry of `years`, in the same order.
    ///
    /// Each anchor is `base` minus `y` calendar years (Feb 29 maps to Feb 28 in
    /// non-leap years), rolled back to a trading day. Zero and duplicate offsets
    /// are allowed; nothing is ever dropped.
    ///
    /// # Errors
    /// Returns `InvalidArg` if an offset reaches past the representable date range.
    pub fn plan(&self, base: NaiveDate, years: &[u32]) -> Result<Vec<TradingDate>, QuotesheetError> {
        years
            .iter()
            .map(|&y| Ok(self.resolver.resolve(years_back(base, y)?)))
            .collect()
    }
}

fn years_back(base: NaiveDate, years: u32) -> Result<NaiveDate, QuotesheetError> {
    years
        .checked_mul(12)
        .and_then(|m| base.checked_sub_months(Months::new(m)))
        .ok_or_else(|| {
            QuotesheetError::InvalidArg(format!("{years} years before {base} is out of range"))
        })
}
