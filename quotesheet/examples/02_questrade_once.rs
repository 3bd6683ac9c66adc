use std::sync::Arc;

use quotesheet::{Quotesheet, QuotesheetConfig, RunMode};
use quotesheet_middleware::{SymbolCacheConfig, SymbolCacheMiddleware};
use quotesheet_mock::MemorySheetStore;
use quotesheet_questrade::QuestradeMarketData;

// Usage: QUESTRADE_REFRESH_TOKEN=... cargo run --example 02_questrade_once -- quotesheet.json
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => QuotesheetConfig::from_json_file(path)?,
        None => QuotesheetConfig::default(),
    };
    let token = std::env::var("QUESTRADE_REFRESH_TOKEN")?;
    let questrade = Arc::new(QuestradeMarketData::builder(token).build()?);
    let market = SymbolCacheMiddleware::wrap(questrade.clone(), &SymbolCacheConfig::default());

    // Seed every configured document with a few symbols in memory.
    let sheets = MemorySheetStore::new();
    let symbols = ["SU.TO", "RY.TO", "ENB.TO"];
    for doc in &cfg.documents {
        let layout = &cfg.layout;
        let targets = [
            (&doc.quote_sheet, &layout.quotes.symbols),
            (&doc.sparkline_sheet, &layout.sparklines.symbols),
            (&doc.returns_sheet, &layout.returns.symbols),
        ];
        for (sheet, range) in targets {
            if let Some(sheet) = sheet {
                sheets.add_sheet(&doc.name, sheet).await;
                sheets.set_column(&doc.name, sheet, range, &symbols).await?;
            }
        }
    }

    let qs = Quotesheet::builder()
        .config(cfg)
        .market_data(market)
        .sheet_store(Arc::new(sheets.clone()))
        .build()?;
    let report = qs.run(RunMode::Once).await;
    println!("{report:#?}");

    for write in sheets.writes().await {
        println!("{} {}: {} rows", write.target, write.range, write.rows.len());
    }
    // Questrade refresh tokens are single-use.
    println!("next refresh token: {}", questrade.current_refresh_token().await);
    Ok(())
}
