//! Report envelopes produced by the update pipeline.

use serde::{Deserialize, Serialize};

use crate::error::QuotesheetError;

/// Which output view a sheet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// Latest open/high/low/close per symbol.
    Snapshot,
    /// Rolling close-price history per symbol.
    Rolling,
    /// Close price at each return horizon per symbol.
    Returns,
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Snapshot => "snapshot",
            Self::Rolling => "rolling",
            Self::Returns => "returns",
        };
        f.write_str(s)
    }
}

/// Outcome of updating one worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetReport {
    /// Worksheet name.
    pub sheet: String,
    /// Projection written to the sheet.
    pub projection: Projection,
    /// Number of symbols read from the sheet.
    pub symbols: usize,
    /// Number of rows handed to the spreadsheet store; zero when `error` is set.
    pub rows_written: usize,
    /// Failure that prevented the write, if any.
    pub error: Option<QuotesheetError>,
}

impl SheetReport {
    /// Whether the sheet was written.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of updating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document name.
    pub document: String,
    /// Per-sheet outcomes in processing order.
    pub sheets: Vec<SheetReport>,
    /// Document-level failure (e.g. the document does not exist).
    pub error: Option<QuotesheetError>,
}

impl DocumentReport {
    /// Whether the document and all its sheets were written.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.sheets.iter().all(SheetReport::is_ok)
    }
}

/// Outcome of one full update cycle over all configured documents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-document outcomes in configured order.
    pub documents: Vec<DocumentReport>,
}

impl RunReport {
    /// Every failure in the cycle as `(document, sheet, error)`; `sheet` is `None`
    /// for document-level failures.
    #[must_use]
    pub fn failures(&self) -> Vec<(&str, Option<&str>, &QuotesheetError)> {
        let mut out = Vec::new();
        for doc in &self.documents {
            if let Some(e) = &doc.error {
                out.push((doc.document.as_str(), None, e));
            }
            for sheet in &doc.sheets {
                if let Some(e) = &sheet.error {
                    out.push((doc.document.as_str(), Some(sheet.sheet.as_str()), e));
                }
            }
        }
        out
    }
}
