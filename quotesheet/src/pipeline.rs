use chrono::NaiveDate;
use quotesheet_core::{
    A1Range, DocumentConfig, DocumentReport, Projection, QuotesheetError, RegionLayout, RunReport,
    SheetReport,
};

use crate::Quotesheet;
use crate::core::call_with_timeout;

impl Quotesheet {
    /// Update every configured document as of the current trading day.
    ///
    /// "Today" is taken in the configured market timezone and rolled back to the
    /// last trading day.
    pub async fn update_all(&self) -> RunReport {
        let today = self.resolver.today(self.cfg.market_timezone);
        self.update_all_as_of(today.date()).await
    }

    /// Update every configured document, in order, as of `as_of`.
    ///
    /// Failures are recorded in the returned report and never stop the cycle.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "quotesheet::pipeline::update_all",
            skip(self),
            fields(documents = self.cfg.documents.len()),
        )
    )]
    pub async fn update_all_as_of(&self, as_of: NaiveDate) -> RunReport {
        let mut report = RunReport::default();
        for doc in &self.cfg.documents {
            report.documents.push(self.update_document(doc, as_of).await);
        }
        report
    }

    /// Update the sheets of one document: quotes, then sparklines, then returns.
    ///
    /// Each sheet is read, projected and written once. A missing document stops
    /// this document only; a failed sheet is recorded and the next sheet proceeds.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "quotesheet::pipeline::update_document",
            skip(self, doc),
            fields(document = %doc.name),
        )
    )]
    pub async fn update_document(&self, doc: &DocumentConfig, as_of: NaiveDate) -> DocumentReport {
        #[cfg(feature = "tracing")]
        tracing::info!(%as_of, "updating document");

        let layout = &self.cfg.layout;
        let targets = [
            (Projection::Snapshot, &doc.quote_sheet, &layout.quotes),
            (Projection::Rolling, &doc.sparkline_sheet, &layout.sparklines),
            (Projection::Returns, &doc.returns_sheet, &layout.returns),
        ];

        let mut report = DocumentReport {
            document: doc.name.clone(),
            sheets: Vec::new(),
            error: None,
        };
        for (projection, sheet, region) in targets {
            let Some(sheet) = sheet else { continue };
            match self
                .update_sheet(&doc.name, sheet, projection, region, as_of)
                .await
            {
                Err(e @ QuotesheetError::DocumentNotFound { .. }) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "document unavailable; skipping");
                    report.error = Some(e);
                    break;
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    if is_transient(&e) {
                        tracing::warn!(sheet = %sheet, %projection, error = %e, "sheet not updated");
                    } else {
                        tracing::error!(sheet = %sheet, %projection, error = %e, "sheet not updated");
                    }
                    report.sheets.push(SheetReport {
                        sheet: sheet.clone(),
                        projection,
                        symbols: 0,
                        rows_written: 0,
                        error: Some(e),
                    });
                }
                Ok(done) => report.sheets.push(done),
            }
        }
        report
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "quotesheet::pipeline::update_sheet",
            skip(self, region),
            fields(range = %region.output),
        )
    )]
    async fn update_sheet(
        &self,
        document: &str,
        sheet: &str,
        projection: Projection,
        region: &RegionLayout,
        as_of: NaiveDate,
    ) -> Result<SheetReport, QuotesheetError> {
        // Reject bad ranges before touching the store.
        let _: A1Range = region.symbols.parse()?;
        let _: A1Range = region.output.parse()?;

        let store = self.sheets.name();
        let timeout = self.cfg.provider_timeout;
        let target = call_with_timeout(
            store,
            "open_sheet",
            timeout,
            self.sheets.open_sheet(document, sheet),
        )
        .await?;
        let symbols = call_with_timeout(
            store,
            "read_column",
            timeout,
            self.sheets.read_column(&target, &region.symbols),
        )
        .await?;

        let rows = self.projector.project(projection, &symbols, as_of).await?;

        call_with_timeout(
            store,
            "write_region",
            timeout,
            self.sheets.write_region(&target, &region.output, &rows),
        )
        .await?;

        #[cfg(feature = "tracing")]
        tracing::info!(target_sheet = %target, rows = rows.len(), "sheet written");

        if !self.cfg.write_pause.is_zero() {
            tokio::time::sleep(self.cfg.write_pause).await;
        }

        Ok(SheetReport {
            sheet: sheet.to_string(),
            projection,
            symbols: symbols.iter().filter(|s| !s.trim().is_empty()).count(),
            rows_written: rows.len(),
            error: None,
        })
    }
}

/// Collaborator outages and missing targets may clear up on the next cycle;
/// bad payloads and bad ranges will not.
#[cfg(feature = "tracing")]
const fn is_transient(e: &QuotesheetError) -> bool {
    e.is_collaborator_failure()
        || matches!(
            e,
            QuotesheetError::SheetNotFound { .. } | QuotesheetError::DocumentNotFound { .. }
        )
}
