//! Price data shapes exchanged with market-data collaborators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque identifier the market-data collaborator assigns to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub String);

impl SymbolId {
    /// Construct a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candle granularity requested from a market-data collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Interval {
    /// One bar per trading day.
    #[default]
    D1,
}

/// One trading day's observation for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day the bar belongs to, in the market's local calendar.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Decimal,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Closing (or last, for an unfinished session) price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: u64,
}

/// Bars for one symbol ordered newest first.
///
/// An empty series is the normal "no data for this window" outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// An empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bars: Vec::new() }
    }

    /// Wrap bars that are already ordered newest first.
    ///
    /// Use `quotesheet_core::series::normalize` to build a series from unordered bars.
    #[must_use]
    pub const fn from_newest_first(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    /// The most recent bar, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// All bars, newest first.
    #[must_use]
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Close prices, newest first.
    pub fn closes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the collaborator returned no bars for the window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
