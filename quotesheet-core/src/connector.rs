use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::QuotesheetError;
use quotesheet_types::{Interval, OutputRow, PriceBar, SheetRef, SymbolId};

/// Market-data collaborator: symbol lookup and candle retrieval.
///
/// Implementations report an unknown symbol as `QuotesheetError::SymbolNotFound`
/// and transport/auth problems as `QuotesheetError::Unavailable`. A window with no
/// bars is `Ok(vec![])`, not an error.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Stable identifier used in logs and error messages (e.g. `"questrade"`).
    fn name(&self) -> &'static str;

    /// Map a ticker symbol (e.g. `"SU.TO"`) to the collaborator's internal id.
    async fn resolve_symbol(&self, symbol: &str) -> Result<SymbolId, QuotesheetError>;

    /// Fetch bars whose session starts within `[start, end]`.
    ///
    /// Bars may come back in any order; callers normalize them.
    async fn candles(
        &self,
        id: &SymbolId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, QuotesheetError>;
}

/// Spreadsheet collaborator: opening worksheets, reading symbol columns, writing regions.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Stable identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Locate a worksheet.
    ///
    /// Returns `DocumentNotFound` or `SheetNotFound` when the target does not exist.
    async fn open_sheet(&self, document: &str, sheet: &str) -> Result<SheetRef, QuotesheetError>;

    /// Read the cells of a single-column A1 range, top to bottom.
    ///
    /// Empty cells inside the range come back as empty strings; trailing empty
    /// cells may be omitted.
    async fn read_column(&self, sheet: &SheetRef, range: &str)
    -> Result<Vec<String>, QuotesheetError>;

    /// Write `rows` into the A1 region, first row at the region's top-left cell.
    ///
    /// Rows may differ in length; the store decides whether to pad, truncate or reject
    /// rows that do not fit the region.
    async fn write_region(
        &self,
        sheet: &SheetRef,
        range: &str,
        rows: &[OutputRow],
    ) -> Result<(), QuotesheetError>;
}
