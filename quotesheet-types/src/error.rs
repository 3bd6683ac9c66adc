use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the quotesheet workspace.
///
/// Distinguishes configuration problems, expected absence of data, collaborator
/// failures (market data or spreadsheet service), malformed payloads and caller misuse.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuotesheetError {
    /// Startup configuration is missing or invalid (e.g. malformed holiday file).
    #[error("config error: {0}")]
    Config(String),

    /// The market-data collaborator cannot map the symbol to an internal identifier.
    #[error("symbol not found: {symbol}")]
    SymbolNotFound {
        /// Symbol as requested (e.g. "SU.TO").
        symbol: String,
    },

    /// Transport, authentication or service failure talking to a collaborator.
    #[error("{collaborator} unavailable: {msg}")]
    Unavailable {
        /// Collaborator name that failed.
        collaborator: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A collaborator call exceeded the configured per-call timeout.
    #[error("{collaborator} timed out: {capability}")]
    Timeout {
        /// Collaborator name that timed out.
        collaborator: String,
        /// Capability label (e.g. "candles", "write_region").
        capability: String,
    },

    /// The spreadsheet document does not exist or is not shared with the service account.
    #[error("document not found: {document}")]
    DocumentNotFound {
        /// Document name as configured.
        document: String,
    },

    /// The worksheet does not exist in the document.
    #[error("sheet not found: {sheet} in document {document}")]
    SheetNotFound {
        /// Document name as configured.
        document: String,
        /// Worksheet name as configured.
        sheet: String,
    },

    /// Issues with the returned data (negative price, unparsable timestamp, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl QuotesheetError {
    /// Helper: build a `Config` error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Helper: build a `SymbolNotFound` error for the given symbol.
    pub fn symbol_not_found(symbol: impl Into<String>) -> Self {
        Self::SymbolNotFound {
            symbol: symbol.into(),
        }
    }

    /// Helper: build an `Unavailable` error with the collaborator name and message.
    pub fn unavailable(collaborator: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator: collaborator.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Timeout` error.
    pub fn timeout(collaborator: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::Timeout {
            collaborator: collaborator.into(),
            capability: capability.into(),
        }
    }

    /// Returns true for the benign "no data for this symbol" condition.
    ///
    /// Such errors are never surfaced as warnings; the affected symbol simply
    /// contributes no data to the projection.
    #[must_use]
    pub const fn is_expected_absence(&self) -> bool {
        matches!(self, Self::SymbolNotFound { .. })
    }

    /// Returns true if a collaborator could not be reached or did not answer in time.
    #[must_use]
    pub const fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}

impl From<serde_json::Error> for QuotesheetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
