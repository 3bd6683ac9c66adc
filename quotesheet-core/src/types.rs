//! Re-export of foundational types from `quotesheet-types`.
// Consolidated re-exports so downstream crates can depend on `quotesheet-core` only

pub use quotesheet_types::QuotesheetError;

pub use quotesheet_types::{Interval, PriceBar, PriceSeries, SymbolId};
pub use quotesheet_types::{Cell, OutputRow, SheetRef};

pub use quotesheet_types::{
    DocumentConfig, MissingHorizonPolicy, QuotesheetConfig, RegionLayout, SheetLayout,
};
pub use quotesheet_types::{DocumentReport, Projection, RunReport, SheetReport};

pub use chrono::NaiveDate;
pub use chrono_tz::Tz;
pub use rust_decimal::Decimal;
