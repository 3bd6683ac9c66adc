//! JSON shapes returned by the Questrade REST API and their conversion into core types.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use quotesheet_core::{PriceBar, QuotesheetError};

/// `GET /oauth2/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until `access_token` expires.
    pub expires_in: u64,
    /// Single-use; replaces the token that was just exchanged.
    pub refresh_token: String,
    pub api_server: String,
}

/// `GET v1/symbols/search` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolSearchResponse {
    #[serde(default)]
    pub symbols: Vec<SymbolHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolHit {
    pub symbol: String,
    #[serde(rename = "symbolId")]
    pub symbol_id: u64,
}

impl SymbolSearchResponse {
    /// The hit whose symbol equals `symbol` ignoring case, else the first hit.
    pub fn best_match(&self, symbol: &str) -> Option<&SymbolHit> {
        self.symbols
            .iter()
            .find(|h| h.symbol.eq_ignore_ascii_case(symbol))
            .or_else(|| self.symbols.first())
    }
}

/// `GET v1/markets/candles/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CandlesResponse {
    #[serde(default)]
    pub candles: Vec<WireCandle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCandle {
    /// Session start with exchange offset, e.g. `2024-03-15T00:00:00.000000-04:00`.
    pub start: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl TryFrom<WireCandle> for PriceBar {
    type Error = QuotesheetError;

    fn try_from(c: WireCandle) -> Result<Self, Self::Error> {
        let date = DateTime::parse_from_rfc3339(&c.start)
            .map_err(|e| QuotesheetError::Data(format!("candle start '{}': {e}", c.start)))?
            .date_naive();
        let price = |v: f64, field: &str| {
            Decimal::try_from(v)
                .map_err(|_| QuotesheetError::Data(format!("candle {field} {v} on {date}")))
        };
        Ok(Self {
            date,
            open: price(c.open, "open")?,
            high: price(c.high, "high")?,
            low: price(c.low, "low")?,
            close: price(c.close, "close")?,
            volume: c.volume,
        })
    }
}
