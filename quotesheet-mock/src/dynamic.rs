use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use quotesheet_core::{Interval, MarketData, PriceBar, QuotesheetError, SymbolId};

use crate::bar_in_window;

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(QuotesheetError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// One recorded `candles` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleRequest {
    /// Identifier requested.
    pub id: SymbolId,
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
    /// Requested granularity.
    pub interval: Interval,
}

#[derive(Default)]
struct InternalState {
    symbol_rules: HashMap<String, MockBehavior<SymbolId>>,
    candle_rules: HashMap<SymbolId, MockBehavior<Vec<PriceBar>>>,
    resolve_calls: Vec<String>,
    candle_requests: Vec<CandleRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `resolve_symbol` calls for a specific symbol.
    pub async fn set_symbol_behavior(&self, symbol: &str, behavior: MockBehavior<SymbolId>) {
        let mut guard = self.state.lock().await;
        guard.symbol_rules.insert(symbol.to_string(), behavior);
    }

    /// Set the behavior for `candles` calls for a specific identifier.
    ///
    /// Returned bars are filtered to the requested window but otherwise passed
    /// through untouched, in the given order.
    pub async fn set_candles_behavior(&self, id: SymbolId, behavior: MockBehavior<Vec<PriceBar>>) {
        let mut guard = self.state.lock().await;
        guard.candle_rules.insert(id, behavior);
    }

    /// Shorthand: `symbol` resolves to an id equal to itself and serves `bars`.
    pub async fn set_series(&self, symbol: &str, bars: Vec<PriceBar>) {
        let id = SymbolId::new(symbol);
        let mut guard = self.state.lock().await;
        guard
            .symbol_rules
            .insert(symbol.to_string(), MockBehavior::Return(id.clone()));
        guard.candle_rules.insert(id, MockBehavior::Return(bars));
    }

    /// Symbols passed to `resolve_symbol`, in call order.
    pub async fn resolve_calls(&self) -> Vec<String> {
        self.state.lock().await.resolve_calls.clone()
    }

    /// Recorded `candles` calls, in call order.
    pub async fn candle_requests(&self) -> Vec<CandleRequest> {
        self.state.lock().await.candle_requests.clone()
    }

    /// Clear all configured behaviors and recorded calls.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// Market data that defers all behavior to an external controller.
///
/// Unconfigured symbols are not found; unconfigured identifiers have no bars.
pub struct DynamicMockMarketData {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockMarketData {
    /// Create a new dynamic mock and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn MarketData>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn MarketData>, controller)
    }
}

#[async_trait]
impl MarketData for DynamicMockMarketData {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn resolve_symbol(&self, symbol: &str) -> Result<SymbolId, QuotesheetError> {
        // Snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.resolve_calls.push(symbol.to_string());
            guard.symbol_rules.get(symbol).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(id)) => Ok(id),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(QuotesheetError::symbol_not_found(symbol)),
        }
    }

    async fn candles(
        &self,
        id: &SymbolId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, QuotesheetError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.candle_requests.push(CandleRequest {
                id: id.clone(),
                start,
                end,
                interval,
            });
            guard.candle_rules.get(id).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(bars)) => Ok(bars
                .into_iter()
                .filter(|b| bar_in_window(b.date, start, end))
                .collect()),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(Vec::new()),
        }
    }
}
