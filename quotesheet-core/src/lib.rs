//! quotesheet-core
//!
//! Core types, traits, and pure logic shared across the quotesheet workspace.
//!
//! - `connector`: the `MarketData` and `SheetStore` collaborator traits.
//! - `calendar`: holiday loading, trading-day resolution, return horizons and fetch windows.
//! - `series`: normalization of raw collaborator bars into a newest-first `PriceSeries`.
//! - `a1`: A1-notation range parsing for spreadsheet regions.
//!
//! Nothing in this crate performs network I/O; the only file access is
//! [`calendar::HolidayCalendar::load`].
#![warn(missing_docs)]

/// A1-notation spreadsheet ranges.
pub mod a1;
/// Trading calendar: holidays, trading days, horizons, fetch windows.
pub mod calendar;
/// Collaborator traits implemented by market-data and spreadsheet adapters.
pub mod connector;
/// Series normalization helpers.
pub mod series;
pub mod types;

pub use a1::A1Range;
pub use calendar::{
    FetchWindow, HolidayCalendar, HolidaySet, ReturnHorizonPlanner, TradingDate,
    TradingDayResolver,
};
pub use connector::{MarketData, SheetStore};
pub use types::*;
