use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use quotesheet_core::series::normalize;
use quotesheet_core::{
    FetchWindow, Interval, MarketData, PriceSeries, QuotesheetError, TradingDayResolver,
};

use crate::core::call_with_timeout;

/// Turns "N days of `symbol` as of a date" into a newest-first price series.
///
/// Unknown symbols and empty candle responses both come back as an empty
/// series: that is the normal "no data for this window" outcome. Only
/// collaborator failures and malformed payloads are errors.
#[derive(Clone)]
pub struct PriceSeriesFetcher {
    market: Arc<dyn MarketData>,
    resolver: TradingDayResolver,
    tz: Tz,
    timeout: Duration,
}

impl PriceSeriesFetcher {
    /// Build a fetcher over a market-data collaborator.
    #[must_use]
    pub fn new(
        market: Arc<dyn MarketData>,
        resolver: TradingDayResolver,
        tz: Tz,
        timeout: Duration,
    ) -> Self {
        Self {
            market,
            resolver,
            tz,
            timeout,
        }
    }

    /// Resolver used to roll `as_of` dates back to trading days.
    #[must_use]
    pub const fn resolver(&self) -> &TradingDayResolver {
        &self.resolver
    }

    /// Fetch up to `day_count` daily bars ending on the trading day at or before `as_of`.
    ///
    /// The request spans `day_count` calendar days: from local midnight of the
    /// first day to 23:59:59 local on the resolved trading day. A blank symbol
    /// yields an empty series without calling the collaborator.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero `day_count`, `Unavailable`/`Timeout` when the
    /// market-data collaborator fails, and `Data` for malformed bars.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "quotesheet::fetcher::fetch",
            skip(self),
            fields(collaborator = self.market.name()),
        )
    )]
    pub async fn fetch(
        &self,
        symbol: &str,
        day_count: u32,
        as_of: NaiveDate,
    ) -> Result<PriceSeries, QuotesheetError> {
        let symbol = symbol.trim();
        let day = self.resolver.resolve(as_of);
        let window = FetchWindow::ending_at(day, day_count, self.tz)?;
        if symbol.is_empty() {
            return Ok(PriceSeries::empty());
        }

        let name = self.market.name();
        let id = match call_with_timeout(
            name,
            "resolve_symbol",
            self.timeout,
            self.market.resolve_symbol(symbol),
        )
        .await
        {
            Ok(id) => id,
            Err(e) if e.is_expected_absence() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(symbol, "symbol not found; no data");
                return Ok(PriceSeries::empty());
            }
            Err(e) => return Err(e),
        };

        let bars = call_with_timeout(
            name,
            "candles",
            self.timeout,
            self.market.candles(&id, window.start, window.end, Interval::D1),
        )
        .await?;

        let series = normalize(bars, usize::try_from(day_count).unwrap_or(usize::MAX))?;
        #[cfg(feature = "tracing")]
        if series.is_empty() {
            tracing::debug!(symbol, %day, start = %window.start, end = %window.end, "empty series");
        }
        Ok(series)
    }
}
