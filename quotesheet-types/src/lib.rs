//! Quotesheet-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod market;
mod reports;
mod sheet;

pub use config::{DocumentConfig, MissingHorizonPolicy, QuotesheetConfig, RegionLayout, SheetLayout};
pub use error::QuotesheetError;
pub use market::{Interval, PriceBar, PriceSeries, SymbolId};
pub use reports::{DocumentReport, Projection, RunReport, SheetReport};
pub use sheet::{Cell, OutputRow, SheetRef};
