use chrono::NaiveDate;
use quotesheet_core::{
    Cell, MissingHorizonPolicy, OutputRow, PriceSeries, Projection, QuotesheetConfig,
    QuotesheetError, ReturnHorizonPlanner, TradingDate,
};

use crate::fetcher::PriceSeriesFetcher;
use crate::util::try_map_ordered;

/// Shapes fetched price data into the three sheet layouts.
///
/// Every projection tolerates missing data per symbol. A collaborator failure for
/// any symbol fails the whole projection so the sheet is never half-written.
#[derive(Clone)]
pub struct SheetProjector {
    fetcher: PriceSeriesFetcher,
    planner: ReturnHorizonPlanner,
    rolling_window_days: u32,
    return_years: Vec<u32>,
    policy: MissingHorizonPolicy,
    concurrency: usize,
}

impl SheetProjector {
    /// Build a projector from the relevant configuration fields.
    #[must_use]
    pub fn new(fetcher: PriceSeriesFetcher, cfg: &QuotesheetConfig) -> Self {
        let planner = ReturnHorizonPlanner::new(fetcher.resolver().clone());
        Self {
            fetcher,
            planner,
            rolling_window_days: cfg.rolling_window_days,
            return_years: cfg.return_years.clone(),
            policy: cfg.missing_horizon_policy,
            concurrency: cfg.fetch_concurrency,
        }
    }

    /// Fetcher backing the projections.
    #[must_use]
    pub const fn fetcher(&self) -> &PriceSeriesFetcher {
        &self.fetcher
    }

    /// Run one projection over `symbols` as of `as_of`.
    ///
    /// # Errors
    /// Propagates the first non-absence error from the fetcher.
    pub async fn project(
        &self,
        projection: Projection,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<OutputRow>, QuotesheetError> {
        match projection {
            Projection::Snapshot => self.snapshot(symbols, as_of).await,
            Projection::Rolling => self.rolling(symbols, as_of).await,
            Projection::Returns => self.returns(symbols, as_of).await,
        }
    }

    /// One `(open, high, low, close)` row per symbol with data on the last trading day.
    ///
    /// Symbols without data contribute no row at all.
    ///
    /// # Errors
    /// Propagates the first non-absence error from the fetcher.
    pub async fn snapshot(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<OutputRow>, QuotesheetError> {
        let series = try_map_ordered(symbols, self.concurrency, |s| {
            self.fetcher.fetch(s, 1, as_of)
        })
        .await?;
        Ok(series.iter().filter_map(snapshot_row).collect())
    }

    /// One row of newest-first closes per symbol over the rolling window.
    ///
    /// Symbols without data get an empty row so rows stay aligned with the symbols.
    ///
    /// # Errors
    /// Propagates the first non-absence error from the fetcher.
    pub async fn rolling(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<OutputRow>, QuotesheetError> {
        let days = self.rolling_window_days;
        let series = try_map_ordered(symbols, self.concurrency, |s| {
            self.fetcher.fetch(s, days, as_of)
        })
        .await?;
        Ok(series.iter().map(rolling_row).collect())
    }

    /// One row per symbol with the close at each return horizon, in horizon order.
    ///
    /// Horizons without data follow the configured [`MissingHorizonPolicy`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if a horizon reaches past the representable date range,
    /// otherwise propagates the first non-absence error from the fetcher.
    pub async fn returns(
        &self,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<Vec<OutputRow>, QuotesheetError> {
        let base = self.fetcher.resolver().resolve(as_of);
        let anchors = self.planner.plan(base.date(), &self.return_years)?;
        let anchors = anchors.as_slice();
        try_map_ordered(symbols, self.concurrency, |s| async move {
            let per_horizon = self.horizon_series(s, anchors).await?;
            Ok(returns_row(&per_horizon, self.policy))
        })
        .await
    }

    async fn horizon_series(
        &self,
        symbol: &str,
        anchors: &[TradingDate],
    ) -> Result<Vec<PriceSeries>, QuotesheetError> {
        let mut out = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            let series = self.fetcher.fetch(symbol, 1, anchor.date()).await?;
            #[cfg(feature = "tracing")]
            if series.is_empty() && !symbol.trim().is_empty() {
                tracing::debug!(symbol, %anchor, "no data at horizon");
            }
            out.push(series);
        }
        Ok(out)
    }
}

/// `(open, high, low, close)` of the most recent bar, or `None` for an empty series.
#[must_use]
pub fn snapshot_row(series: &PriceSeries) -> Option<OutputRow> {
    series
        .latest()
        .map(|b| [b.open, b.high, b.low, b.close].into_iter().collect())
}

/// Close prices in series order (newest first).
#[must_use]
pub fn rolling_row(series: &PriceSeries) -> OutputRow {
    series.closes().collect()
}

/// Latest close of each per-horizon series, in horizon order.
///
/// With [`MissingHorizonPolicy::Skip`] an empty horizon is left out and the row
/// is shorter than the horizon count; with [`MissingHorizonPolicy::Blank`] it
/// becomes a [`Cell::Blank`].
#[must_use]
pub fn returns_row(per_horizon: &[PriceSeries], policy: MissingHorizonPolicy) -> OutputRow {
    per_horizon
        .iter()
        .filter_map(|s| match (s.latest(), policy) {
            (Some(bar), _) => Some(Cell::Number(bar.close)),
            (None, MissingHorizonPolicy::Blank) => Some(Cell::Blank),
            (None, _) => None,
        })
        .collect()
}
