//! quotesheet-questrade
//!
//! `MarketData` connector for the Questrade REST API.
//!
//! Authentication uses the refresh-token grant: the configured refresh token is
//! exchanged for an access token and an API server on first use and again shortly
//! before the access token expires. Questrade refresh tokens are single-use, so the
//! rotated token is kept in memory and exposed through
//! [`QuestradeMarketData::current_refresh_token`] for callers that persist it.
//!
//! Error mapping:
//! - HTTP 401/403, 429, 5xx and transport failures are `Unavailable`.
//! - A search with no hits is `SymbolNotFound`.
//! - Payloads that do not match the documented shapes are `Data`.
#![warn(missing_docs)]

mod auth;
mod wire;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

use quotesheet_core::{Interval, MarketData, PriceBar, QuotesheetError, SymbolId};

use crate::auth::{Credentials, Session};
use crate::wire::{CandlesResponse, SymbolSearchResponse};

/// Production login server.
pub const LOGIN_URL: &str = "https://login.questrade.com/";

pub(crate) const NAME: &str = "quotesheet-questrade";

pub(crate) fn transport_error(e: &reqwest::Error) -> QuotesheetError {
    QuotesheetError::unavailable(NAME, format!("transport: {e}"))
}

pub(crate) fn http_error(status: StatusCode, context: &str) -> QuotesheetError {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "unauthorized",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        s if s.is_server_error() => "server error",
        _ => "status",
    };
    QuotesheetError::unavailable(NAME, format!("{kind} {}: {context}", status.as_u16()))
}

/// Builder for [`QuestradeMarketData`].
pub struct QuestradeBuilder {
    refresh_token: String,
    login_url: String,
    http: Option<reqwest::Client>,
}

impl QuestradeBuilder {
    /// Start from a refresh token generated in the Questrade API hub.
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            login_url: LOGIN_URL.to_string(),
            http: None,
        }
    }

    /// Override the login server, e.g. the practice environment or a test server.
    #[must_use]
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client (proxies, timeouts, TLS settings).
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the connector. No request is made until the first call.
    ///
    /// # Errors
    /// Returns `Config` if the refresh token is blank or the login URL is invalid.
    pub fn build(self) -> Result<QuestradeMarketData, QuotesheetError> {
        let token = self.refresh_token.trim();
        if token.is_empty() {
            return Err(QuotesheetError::config("questrade refresh token is empty"));
        }
        let mut login = Url::parse(&self.login_url)
            .map_err(|e| QuotesheetError::config(format!("login url '{}': {e}", self.login_url)))?;
        if !login.path().ends_with('/') {
            let path = format!("{}/", login.path());
            login.set_path(&path);
        }
        Ok(QuestradeMarketData {
            http: self.http.unwrap_or_default(),
            login,
            credentials: Mutex::new(Credentials::new(token.to_string())),
        })
    }
}

/// Questrade market data: symbol search and daily candles.
pub struct QuestradeMarketData {
    http: reqwest::Client,
    login: Url,
    credentials: Mutex<Credentials>,
}

impl QuestradeMarketData {
    /// Start building a connector from a refresh token.
    pub fn builder(refresh_token: impl Into<String>) -> QuestradeBuilder {
        QuestradeBuilder::new(refresh_token)
    }

    /// The refresh token to use next time; changes after every session refresh.
    pub async fn current_refresh_token(&self) -> String {
        self.credentials.lock().await.refresh_token.clone()
    }

    async fn session(&self) -> Result<Session, QuotesheetError> {
        self.credentials
            .lock()
            .await
            .session(&self.http, &self.login)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, QuotesheetError> {
        let session = self.session().await?;
        let url = session
            .api_server
            .join(path)
            .map_err(|e| QuotesheetError::Data(format!("{context} url: {e}")))?;
        let resp = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &session.authorization)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                self.credentials.lock().await.invalidate();
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(status = status.as_u16(), context, "questrade request failed");
            return Err(http_error(status, context));
        }
        resp.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                QuotesheetError::Data(format!("{context}: {e}"))
            } else {
                transport_error(&e)
            }
        })
    }
}

#[async_trait]
impl MarketData for QuestradeMarketData {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn resolve_symbol(&self, symbol: &str) -> Result<SymbolId, QuotesheetError> {
        let found: SymbolSearchResponse = self
            .get_json("v1/symbols/search", &[("prefix", symbol)], "symbol search")
            .await?;
        found
            .best_match(symbol)
            .map(|hit| SymbolId::new(hit.symbol_id.to_string()))
            .ok_or_else(|| QuotesheetError::symbol_not_found(symbol))
    }

    async fn candles(
        &self,
        id: &SymbolId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, QuotesheetError> {
        let interval = match interval {
            Interval::D1 => "OneDay",
            _ => return Err(QuotesheetError::InvalidArg(format!("{interval:?} candles"))),
        };
        let start = start.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
        let end = end.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
        let path = format!("v1/markets/candles/{id}");
        let resp: CandlesResponse = self
            .get_json(
                &path,
                &[
                    ("startTime", start.as_str()),
                    ("endTime", end.as_str()),
                    ("interval", interval),
                ],
                "candles",
            )
            .await?;
        resp.candles.into_iter().map(PriceBar::try_from).collect()
    }
}
