use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};

use quotesheet_core::{Interval, MarketData, PriceBar, QuotesheetError, SymbolId};

/// Settings for [`SymbolCacheMiddleware`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolCacheConfig {
    /// How long a resolved identifier is reused. Zero disables caching.
    pub ttl: Duration,
    /// Upper bound on cached symbols.
    pub max_entries: u64,
}

impl Default for SymbolCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_entries: 10_000,
        }
    }
}

/// Caches successful `resolve_symbol` answers of the wrapped market data.
///
/// The returns projection resolves every symbol once per horizon per cycle; with
/// this wrapper the collaborator sees one lookup per symbol per `ttl`. Failures,
/// including "not found", are never cached. `candles` passes straight through.
pub struct SymbolCacheMiddleware {
    inner: Arc<dyn MarketData>,
    ids: Option<Cache<String, SymbolId>>,
}

impl SymbolCacheMiddleware {
    /// Wrap `inner` with a symbol cache.
    #[must_use]
    pub fn new(inner: Arc<dyn MarketData>, cfg: &SymbolCacheConfig) -> Self {
        let ids = (!cfg.ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(cfg.max_entries)
                .time_to_live(cfg.ttl)
                .build()
        });
        Self { inner, ids }
    }

    /// Wrap `inner` and return it as a trait object ready for the orchestrator.
    #[must_use]
    pub fn wrap(inner: Arc<dyn MarketData>, cfg: &SymbolCacheConfig) -> Arc<dyn MarketData> {
        Arc::new(Self::new(inner, cfg))
    }
}

#[async_trait]
impl MarketData for SymbolCacheMiddleware {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn resolve_symbol(&self, symbol: &str) -> Result<SymbolId, QuotesheetError> {
        let Some(ids) = &self.ids else {
            return self.inner.resolve_symbol(symbol).await;
        };
        if let Some(id) = ids.get(symbol).await {
            #[cfg(feature = "tracing")]
            tracing::trace!(symbol, id = %id, "symbol cache hit");
            return Ok(id);
        }
        let id = self.inner.resolve_symbol(symbol).await?;
        ids.insert(symbol.to_string(), id.clone()).await;
        Ok(id)
    }

    async fn candles(
        &self,
        id: &SymbolId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, QuotesheetError> {
        self.inner.candles(id, start, end, interval).await
    }
}
