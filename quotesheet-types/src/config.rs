//! Configuration types shared by the orchestrator and its collaborators.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::QuotesheetError;

/// What to emit in a returns row when a horizon has no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MissingHorizonPolicy {
    /// Leave the horizon out; the row is shorter than the horizon count.
    #[default]
    Skip,
    /// Emit a blank cell so every row has one cell per horizon.
    Blank,
}

/// A spreadsheet document and the worksheets to maintain in it.
///
/// Every sheet is optional; unset sheets are not touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Document name as known to the spreadsheet service.
    pub name: String,
    /// Sheet receiving the latest open/high/low/close per symbol.
    #[serde(default)]
    pub quote_sheet: Option<String>,
    /// Sheet receiving the rolling close-price history per symbol.
    #[serde(default)]
    pub sparkline_sheet: Option<String>,
    /// Sheet receiving the close price at each return horizon per symbol.
    #[serde(default)]
    pub returns_sheet: Option<String>,
}

impl DocumentConfig {
    /// A document with all three standard sheets (`Data`, `Sparklines`, `Returns`).
    pub fn standard(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quote_sheet: Some("Data".to_string()),
            sparkline_sheet: Some("Sparklines".to_string()),
            returns_sheet: Some("Returns".to_string()),
        }
    }
}

/// A1 ranges used to read symbols from and write values into one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLayout {
    /// Column holding the symbols, e.g. `A2:A`.
    pub symbols: String,
    /// Region receiving the projected rows, e.g. `B2:E101`.
    pub output: String,
}

impl RegionLayout {
    fn new(symbols: &str, output: &str) -> Self {
        Self {
            symbols: symbols.to_string(),
            output: output.to_string(),
        }
    }
}

/// Ranges for each of the three projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Quote snapshot sheet.
    pub quotes: RegionLayout,
    /// Rolling close-price sheet. Row 1 carries a symbol too.
    pub sparklines: RegionLayout,
    /// Historical returns sheet.
    pub returns: RegionLayout,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            quotes: RegionLayout::new("A2:A", "B2:E101"),
            sparklines: RegionLayout::new("A1:A", "B1:BZ100"),
            returns: RegionLayout::new("A2:A", "B2:Z100"),
        }
    }
}

/// Global configuration for the `Quotesheet` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotesheetConfig {
    /// Text file with one `YYYY-MM-DD` market holiday per line.
    pub holidays_path: Option<PathBuf>,
    /// Years back from the last trading day, one returns column each, in column order.
    pub return_years: Vec<u32>,
    /// Calendar days covered by the rolling close-price sheet.
    pub rolling_window_days: u32,
    /// Pause after each sheet write; keeps within spreadsheet write quotas.
    pub write_pause: Duration,
    /// Pause between two full update cycles in continuous mode.
    pub cycle_pause: Duration,
    /// Timezone defining "today" and the day boundaries of fetch windows.
    pub market_timezone: chrono_tz::Tz,
    /// Maximum number of symbols fetched concurrently. `1` keeps the pipeline sequential.
    pub fetch_concurrency: usize,
    /// Timeout applied to every collaborator call.
    pub provider_timeout: Duration,
    /// Returns-row behavior for horizons without data.
    pub missing_horizon_policy: MissingHorizonPolicy,
    /// Documents to update, in order.
    pub documents: Vec<DocumentConfig>,
    /// Read/write ranges per projection.
    pub layout: SheetLayout,
}

impl Default for QuotesheetConfig {
    fn default() -> Self {
        Self {
            holidays_path: None,
            return_years: vec![0, 1, 3, 5, 10],
            rolling_window_days: 60,
            write_pause: Duration::from_secs(5),
            cycle_pause: Duration::ZERO,
            market_timezone: chrono_tz::America::Edmonton,
            fetch_concurrency: 1,
            provider_timeout: Duration::from_secs(30),
            missing_horizon_policy: MissingHorizonPolicy::default(),
            documents: Vec::new(),
            layout: SheetLayout::default(),
        }
    }
}

impl QuotesheetConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `Config` if the JSON is malformed or fails [`validate`](Self::validate).
    pub fn from_json_str(s: &str) -> Result<Self, QuotesheetError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Config` if the file cannot be read or its content is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QuotesheetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            QuotesheetError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns `Config` describing the first violated rule.
    pub fn validate(&self) -> Result<(), QuotesheetError> {
        if self.rolling_window_days == 0 {
            return Err(QuotesheetError::config("rolling_window_days must be at least 1"));
        }
        if self.fetch_concurrency == 0 {
            return Err(QuotesheetError::config("fetch_concurrency must be at least 1"));
        }
        if self.provider_timeout.is_zero() {
            return Err(QuotesheetError::config("provider_timeout must be non-zero"));
        }
        let mut seen = std::collections::HashSet::new();
        for doc in &self.documents {
            if doc.name.trim().is_empty() {
                return Err(QuotesheetError::config("document name must not be empty"));
            }
            if !seen.insert(doc.name.as_str()) {
                return Err(QuotesheetError::config(format!(
                    "duplicate document '{}'",
                    doc.name
                )));
            }
        }
        Ok(())
    }
}
