//! quotesheet-middleware
//!
//! Wrappers that sit between the orchestrator and a `MarketData` collaborator.

mod cache;

pub use crate::cache::{SymbolCacheConfig, SymbolCacheMiddleware};
