use quotesheet_core::RunReport;

use crate::Quotesheet;

/// How long [`Quotesheet::run`] keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// A single update cycle over all documents.
    #[default]
    Once,
    /// Repeat cycles forever, pausing `cycle_pause` in between.
    Continuous,
}

impl Quotesheet {
    /// Run the update pipeline in the given mode.
    ///
    /// In [`RunMode::Continuous`] this future only completes if dropped; per-cycle
    /// failures are logged and recorded, never fatal.
    pub async fn run(&self, mode: RunMode) -> RunReport {
        match mode {
            RunMode::Once => self.update_all().await,
            RunMode::Continuous => self.run_until(std::future::pending::<()>()).await,
        }
    }

    /// Repeat update cycles until `stop` completes, returning the last cycle's report.
    ///
    /// At least one cycle always runs. `stop` is only observed between cycles, so a
    /// cycle in progress is never cut short.
    pub async fn run_until<F>(&self, stop: F) -> RunReport
    where
        F: core::future::Future<Output = ()>,
    {
        tokio::pin!(stop);
        #[cfg(feature = "tracing")]
        let mut cycle: u64 = 0;
        loop {
            let report = self.update_all().await;
            #[cfg(feature = "tracing")]
            {
                cycle += 1;
                let failures = report.failures().len();
                if failures == 0 {
                    tracing::info!(cycle, "update cycle complete");
                } else {
                    tracing::warn!(cycle, failures, "update cycle completed with failures");
                }
            }
            tokio::select! {
                biased;
                () = &mut stop => return report,
                () = tokio::time::sleep(self.cfg.cycle_pause) => {}
            }
        }
    }
}
