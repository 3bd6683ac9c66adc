//! Test doubles for the quotesheet collaborators.
//!
//! - [`MockMarketData`]: deterministic fixture candles for a handful of TSX symbols.
//! - [`DynamicMockMarketData`]: behavior scripted per symbol from a test via its controller.
//! - [`MemorySheetStore`]: an in-memory spreadsheet service.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use quotesheet_core::{Interval, MarketData, PriceBar, QuotesheetError, SymbolId};

mod dynamic;
mod fixtures;
mod sheets;

pub use dynamic::{CandleRequest, DynamicMockController, DynamicMockMarketData, MockBehavior};
pub use sheets::{MemorySheetStore, WriteRecord};

/// Whether a daily bar dated `date` belongs to the `[start, end]` request window.
///
/// Bars are anchored at 12:00 UTC on their date, which falls inside the local
/// calendar day for every offset within twelve hours of UTC.
#[must_use]
pub fn bar_in_window(date: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let Some(noon) = NaiveTime::from_hms_opt(12, 0, 0) else {
        return false;
    };
    let at = date.and_time(noon).and_utc();
    start <= at && at <= end
}

/// Mock market data for CI-safe examples. Provides deterministic data from static fixtures.
///
/// Known symbols: `SU.TO`, `RY.TO`, `ENB.TO` (listed 1995), `SHOP.TO` (2015) and
/// `NEWCO.TO` (2023). The symbol `FAIL` fails with `Unavailable`; `TIMEOUT` stalls
/// for 200ms before reporting not found. Anything else is not found.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMarketData;

impl MockMarketData {
    /// Create the mock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(symbol: &str, capability: &str) -> Result<(), QuotesheetError> {
        match symbol {
            "FAIL" => Err(QuotesheetError::unavailable(
                "quotesheet-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MarketData for MockMarketData {
    fn name(&self) -> &'static str {
        "quotesheet-mock"
    }

    async fn resolve_symbol(&self, symbol: &str) -> Result<SymbolId, QuotesheetError> {
        Self::maybe_fail_or_timeout(symbol, "resolve_symbol").await?;
        fixtures::history::symbol_id(symbol)
            .map(SymbolId::new)
            .ok_or_else(|| QuotesheetError::symbol_not_found(symbol))
    }

    async fn candles(
        &self,
        id: &SymbolId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _interval: Interval,
    ) -> Result<Vec<PriceBar>, QuotesheetError> {
        let from = start.date_naive().pred_opt().unwrap_or(NaiveDate::MIN);
        let to = end.date_naive();
        let bars = fixtures::history::bars(id.as_str(), from, to).ok_or_else(|| {
            QuotesheetError::unavailable("quotesheet-mock", format!("unknown symbol id {id}"))
        })?;
        Ok(bars
            .into_iter()
            .filter(|b| bar_in_window(b.date, start, end))
            .collect())
    }
}
