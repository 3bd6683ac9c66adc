use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use quotesheet_core::QuotesheetError;

use crate::wire::TokenResponse;
use crate::{NAME, http_error, transport_error};

// Refresh this long before the advertised expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// An authorized API session.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub authorization: String,
    pub api_server: Url,
    expires_at: Instant,
}

impl Session {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

/// Refresh token plus the session it last produced.
#[derive(Debug)]
pub(crate) struct Credentials {
    pub refresh_token: String,
    pub session: Option<Session>,
}

impl Credentials {
    pub const fn new(refresh_token: String) -> Self {
        Self {
            refresh_token,
            session: None,
        }
    }

    /// The current session, exchanging the refresh token first if needed.
    pub async fn session(
        &mut self,
        http: &reqwest::Client,
        login: &Url,
    ) -> Result<Session, QuotesheetError> {
        if let Some(s) = self.session.as_ref().filter(|s| s.is_fresh()) {
            return Ok(s.clone());
        }
        let token = exchange(http, login, &self.refresh_token).await?;
        let mut api_server = Url::parse(&token.api_server).map_err(|e| {
            QuotesheetError::Data(format!("api_server '{}': {e}", token.api_server))
        })?;
        if !api_server.path().ends_with('/') {
            let path = format!("{}/", api_server.path());
            api_server.set_path(&path);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(api_server = %api_server, expires_in = token.expires_in, "questrade session refreshed");

        let session = Session {
            authorization: format!("{} {}", token.token_type, token.access_token),
            api_server,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        };
        self.refresh_token = token.refresh_token;
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Forget the session so the next call exchanges the refresh token again.
    pub fn invalidate(&mut self) {
        self.session = None;
    }
}

async fn exchange(
    http: &reqwest::Client,
    login: &Url,
    refresh_token: &str,
) -> Result<TokenResponse, QuotesheetError> {
    let url = login
        .join("oauth2/token")
        .map_err(|e| QuotesheetError::config(format!("login url: {e}")))?;
    let resp = http
        .get(url)
        .query(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(|e| transport_error(&e))?;

    let status = resp.status();
    if !status.is_success() {
        #[cfg(feature = "tracing")]
        tracing::warn!(status = status.as_u16(), "questrade token refresh rejected");
        return Err(http_error(status, "token refresh"));
    }
    resp.json::<TokenResponse>()
        .await
        .map_err(|e| QuotesheetError::Data(format!("{NAME} token response: {e}")))
}
