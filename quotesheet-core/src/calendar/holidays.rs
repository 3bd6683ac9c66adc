use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::QuotesheetError;

/// Immutable set of non-trading dates beyond weekends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet(BTreeSet<NaiveDate>);

impl HolidaySet {
    /// An empty set: only weekends are non-trading.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether `d` is a listed holiday.
    #[must_use]
    pub fn contains(&self, d: &NaiveDate) -> bool {
        self.0.contains(d)
    }

    /// Number of distinct holidays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no holidays are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Holidays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Line-oriented holiday file: one `YYYY-MM-DD` per line, no header, any order.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    path: PathBuf,
}

impl HolidayCalendar {
    /// Point the calendar at a holiday file. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the holiday file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the holiday file.
    ///
    /// # Errors
    /// Returns `Config` if the file is missing or unreadable, or if a line is not a
    /// valid ISO-8601 date.
    pub fn load(&self) -> Result<HolidaySet, QuotesheetError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            QuotesheetError::config(format!(
                "cannot read holiday file {}: {e}",
                self.path.display()
            ))
        })?;
        let set = Self::parse(&raw)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(path = %self.path.display(), holidays = set.len(), "loaded holiday calendar");
        Ok(set)
    }

    /// Parse holiday file contents.
    ///
    /// Surrounding whitespace (including `\r`) is ignored, as are blank lines.
    ///
    /// # Errors
    /// Returns `Config` naming the first line that is not a `YYYY-MM-DD` date.
    pub fn parse(text: &str) -> Result<HolidaySet, QuotesheetError> {
        let mut out = BTreeSet::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let bad = |why: &dyn std::fmt::Display| {
                QuotesheetError::config(format!(
                    "holiday line {}: '{line}' is not a YYYY-MM-DD date ({why})",
                    idx + 1
                ))
            };
            if !is_iso_date_shape(line) {
                return Err(bad(&"expected 4-2-2 zero-padded digits"));
            }
            let d = NaiveDate::parse_from_str(line, "%Y-%m-%d").map_err(|e| bad(&e))?;
            out.insert(d);
        }
        Ok(HolidaySet(out))
    }
}

// chrono accepts unpadded and signed fields; the file format does not.
fn is_iso_date_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}
