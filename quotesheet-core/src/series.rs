//! Shared helpers for turning raw collaborator bars into a `PriceSeries`.

use crate::QuotesheetError;
use quotesheet_types::{PriceBar, PriceSeries};

/// Ensure a bar carries no negative price.
///
/// # Errors
/// Returns `Err(QuotesheetError::Data)` naming the bar date if any of open, high,
/// low or close is negative.
pub fn ensure_bar_valid(bar: &PriceBar) -> Result<(), QuotesheetError> {
    let prices = [bar.open, bar.high, bar.low, bar.close];
    if prices.iter().any(|p| p.is_sign_negative() && !p.is_zero()) {
        return Err(QuotesheetError::Data(format!(
            "negative price in bar for {}",
            bar.date
        )));
    }
    Ok(())
}

/// Build a newest-first series holding at most `limit` bars.
///
/// Bars are validated, sorted by date descending and de-duplicated by date;
/// when a date repeats, the bar that came first from the collaborator wins.
///
/// # Errors
/// Returns `Err(QuotesheetError::Data)` if any bar fails [`ensure_bar_valid`].
pub fn normalize(mut bars: Vec<PriceBar>, limit: usize) -> Result<PriceSeries, QuotesheetError> {
    for b in &bars {
        ensure_bar_valid(b)?;
    }
    // stable: equal dates keep collaborator order
    bars.sort_by(|a, b| b.date.cmp(&a.date));
    bars.dedup_by_key(|b| b.date);
    bars.truncate(limit);
    Ok(PriceSeries::from_newest_first(bars))
}
