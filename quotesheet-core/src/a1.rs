//! Minimal A1-notation parsing for rectangular spreadsheet regions.
//!
//! Supports `B2:E101`, open-ended columns such as `A2:A`, whole columns such as
//! `A:A`, and single cells such as `C3`. Sheet prefixes (`Data!A1`) are not accepted;
//! the sheet is always carried separately in a `SheetRef`.

use std::str::FromStr;

use crate::QuotesheetError;

/// A rectangular region; rows and columns are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct A1Range {
    /// First column (A = 1).
    pub start_col: u32,
    /// First row.
    pub start_row: u32,
    /// Last column.
    pub end_col: u32,
    /// Last row; `None` extends to the bottom of the sheet.
    pub end_row: Option<u32>,
}

impl A1Range {
    /// Number of columns in the region.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    /// Number of rows, or `None` for an open-ended region.
    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.end_row.map(|end| end - self.start_row + 1)
    }
}

impl FromStr for A1Range {
    type Err = QuotesheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || QuotesheetError::InvalidArg(format!("invalid A1 range '{s}'"));
        let (first, last) = s.trim().split_once(':').unwrap_or((s.trim(), s.trim()));
        let (start_col, start_row) = split_cell(first).ok_or_else(bad)?;
        let (end_col, end_row) = split_cell(last).ok_or_else(bad)?;

        let start_row = start_row.unwrap_or(1);
        if end_col < start_col || end_row.is_some_and(|r| r < start_row) {
            return Err(bad());
        }
        Ok(Self {
            start_col,
            start_row,
            end_col,
            end_row,
        })
    }
}

fn split_cell(cell: &str) -> Option<(u32, Option<u32>)> {
    let digits_at = cell.find(|c: char| c.is_ascii_digit()).unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(digits_at);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut col: u32 = 0;
    for c in letters.chars() {
        let v = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    let row = if digits.is_empty() {
        None
    } else {
        let r: u32 = digits.parse().ok()?;
        if r == 0 {
            return None;
        }
        Some(r)
    };
    Some((col, row))
}
