use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::resolver::TradingDate;
use crate::QuotesheetError;

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(t) => t,
    None => NaiveTime::MIN,
};

/// The instants bounding a candle request of `day_count` calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Start of the first day, local midnight.
    pub start: DateTime<Utc>,
    /// End of the last day, local 23:59:59.
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// Window covering `day_count` calendar days that ends on `day`.
    ///
    /// The first day is `day - (day_count - 1)`; boundaries are local to `tz`.
    /// When a boundary falls in a DST gap the nearest valid instant is used.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `day_count` is zero or the start date underflows.
    pub fn ending_at(day: TradingDate, day_count: u32, tz: Tz) -> Result<Self, QuotesheetError> {
        if day_count == 0 {
            return Err(QuotesheetError::InvalidArg(
                "day count must be at least 1".to_string(),
            ));
        }
        let last = day.date();
        let first = last
            .checked_sub_days(Days::new(u64::from(day_count - 1)))
            .ok_or_else(|| {
                QuotesheetError::InvalidArg(format!("{day_count} days before {last} is out of range"))
            })?;

        let start = local_instant(first, NaiveTime::MIN, tz, true)?;
        let end = local_instant(last, END_OF_DAY, tz, false)?;
        Ok(Self { start, end })
    }
}

fn local_instant(
    date: NaiveDate,
    time: NaiveTime,
    tz: Tz,
    earliest: bool,
) -> Result<DateTime<Utc>, QuotesheetError> {
    let naive = date.and_time(time);
    let mapped = tz.from_local_datetime(&naive);
    let local = if earliest {
        mapped.earliest()
    } else {
        mapped.latest()
    };
    // Inside a DST gap: step an hour away from the gap.
    let local = match local {
        Some(l) => Some(l),
        None if earliest => tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest(),
        None => tz.from_local_datetime(&(naive - TimeDelta::hours(1))).latest(),
    };
    local
        .map(|l| l.with_timezone(&Utc))
        .ok_or_else(|| QuotesheetError::InvalidArg(format!("{naive} does not exist in {tz}")))
}
