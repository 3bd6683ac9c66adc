use std::sync::Arc;
use std::time::Duration;

use quotesheet::{DocumentConfig, Quotesheet, RunMode};
use quotesheet_mock::{MemorySheetStore, MockMarketData};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,quotesheet=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    // 1. An in-memory spreadsheet with the three standard sheets.
    let symbols = ["SU.TO", "RY.TO", "SHOP.TO", "NEWCO.TO", "NOPE.TO"];
    let sheets = MemorySheetStore::new();
    for sheet in ["Data", "Sparklines", "Returns"] {
        sheets.add_sheet("Portfolio", sheet).await;
    }
    sheets.set_column("Portfolio", "Data", "A2:A", &symbols).await?;
    sheets.set_column("Portfolio", "Sparklines", "A1:A", &symbols).await?;
    sheets.set_column("Portfolio", "Returns", "A2:A", &symbols).await?;

    // 2. Wire the orchestrator to fixture market data.
    let qs = Quotesheet::builder()
        .market_data(Arc::new(MockMarketData::new()))
        .sheet_store(Arc::new(sheets.clone()))
        .rolling_window_days(10)
        .write_pause(Duration::ZERO)
        .document(DocumentConfig::standard("Portfolio"))
        .build()?;

    // 3. One cycle, then print what landed in each sheet.
    let report = qs.run(RunMode::Once).await;
    for (doc, sheet, err) in report.failures() {
        eprintln!("{doc}/{}: {err}", sheet.unwrap_or("-"));
    }
    for (sheet, range) in [("Data", "A2:E6"), ("Sparklines", "A1:F5"), ("Returns", "A2:F6")] {
        println!("--- {sheet} ---");
        for row in sheets.region("Portfolio", sheet, range).await? {
            println!("{}", row.join("\t"));
        }
    }

    Ok(())
}
