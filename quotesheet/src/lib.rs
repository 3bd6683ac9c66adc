//! Quotesheet keeps spreadsheet documents current with market data.
//!
//! Overview
//! - Reads symbol lists from spreadsheet columns through a `SheetStore` collaborator.
//! - Fetches daily candles through a `MarketData` collaborator, one request window
//!   per symbol and date, rolled back to trading days with a holiday calendar.
//! - Projects each sheet into one of three layouts and writes it back in one call.
//!
//! Projections
//! - Snapshot (`quote_sheet`): `open, high, low, close` of the last trading day per
//!   symbol. Symbols without data are left out.
//! - Rolling (`sparkline_sheet`): closes over `rolling_window_days`, newest first;
//!   one row per symbol, empty when there is no data.
//! - Returns (`returns_sheet`): the close at each of `return_years` years back. By
//!   default a missing horizon is skipped, so rows can be ragged; opt into
//!   `MissingHorizonPolicy::Blank` for one cell per horizon.
//!
//! Failure handling
//! - An unknown symbol or an empty candle response is "no data", never an error.
//! - A collaborator failure aborts the affected sheet before anything is written;
//!   the failure lands in the `RunReport` and the next sheet proceeds.
//! - A missing document is recorded once and the next document proceeds.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotesheet::{DocumentConfig, Quotesheet, RunMode};
//!
//! let qs = Quotesheet::builder()
//!     .market_data(Arc::new(questrade))
//!     .sheet_store(Arc::new(sheets))
//!     .holidays_path("tsx_holidays.txt")
//!     .document(DocumentConfig::standard("Portfolio"))
//!     .build()?;
//!
//! let report = qs.run(RunMode::Once).await;
//! for (doc, sheet, err) in report.failures() {
//!     eprintln!("{doc}/{}: {err}", sheet.unwrap_or("-"));
//! }
//! ```
#![warn(missing_docs)]

mod core;
mod fetcher;
mod pipeline;
mod projector;
mod runner;
mod util;

pub use crate::core::{Quotesheet, QuotesheetBuilder};
pub use fetcher::PriceSeriesFetcher;
pub use projector::{SheetProjector, returns_row, rolling_row, snapshot_row};
pub use runner::RunMode;

pub use quotesheet_core::{
    A1Range, FetchWindow, HolidayCalendar, HolidaySet, MarketData, ReturnHorizonPlanner,
    SheetStore, TradingDate, TradingDayResolver,
};
pub use quotesheet_types::{
    Cell, DocumentConfig, DocumentReport, Interval, MissingHorizonPolicy, OutputRow, PriceBar,
    PriceSeries, Projection, QuotesheetConfig, QuotesheetError, RegionLayout, RunReport,
    SheetLayout, SheetRef, SheetReport, SymbolId,
};
