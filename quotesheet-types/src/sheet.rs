//! Spreadsheet-facing shapes: sheet references, cells and output rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A worksheet inside a named spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetRef {
    /// Document (spreadsheet file) name.
    pub document: String,
    /// Worksheet (tab) name.
    pub sheet: String,
}

impl SheetRef {
    /// Construct a reference from document and sheet names.
    pub fn new(document: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            sheet: sheet.into(),
        }
    }
}

impl std::fmt::Display for SheetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.document, self.sheet)
    }
}

/// One cell destined for a spreadsheet region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// A numeric value.
    Number(Decimal),
    /// An explicit empty placeholder.
    Blank,
}

impl Cell {
    /// Returns the numeric value, if any.
    #[must_use]
    pub const fn number(&self) -> Option<Decimal> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Blank => None,
        }
    }
}

impl From<Decimal> for Cell {
    fn from(v: Decimal) -> Self {
        Self::Number(v)
    }
}

/// An ordered, variable-length sequence of cells for one spreadsheet row.
///
/// Rows are not padded: when upstream data is partial a row is simply shorter.
/// How rows of differing lengths are laid into a region is up to the `SheetStore`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputRow(pub Vec<Cell>);

impl OutputRow {
    /// A row with no cells.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a cell.
    pub fn push(&mut self, cell: impl Into<Cell>) {
        self.0.push(cell.into());
    }

    /// Cells in column order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Numeric values, skipping blanks.
    pub fn numbers(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.0.iter().filter_map(Cell::number)
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Decimal> for OutputRow {
    fn from_iter<I: IntoIterator<Item = Decimal>>(iter: I) -> Self {
        Self(iter.into_iter().map(Cell::Number).collect())
    }
}

impl FromIterator<Cell> for OutputRow {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
