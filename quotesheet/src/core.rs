use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use quotesheet_core::{
    DocumentConfig, HolidayCalendar, HolidaySet, MarketData, MissingHorizonPolicy,
    QuotesheetConfig, QuotesheetError, SheetLayout, SheetStore, TradingDayResolver,
};

use crate::fetcher::PriceSeriesFetcher;
use crate::projector::SheetProjector;

/// Orchestrator that keeps spreadsheet documents in sync with market data.
pub struct Quotesheet {
    pub(crate) sheets: Arc<dyn SheetStore>,
    pub(crate) resolver: TradingDayResolver,
    pub(crate) projector: SheetProjector,
    pub(crate) cfg: QuotesheetConfig,
}

/// Builder for constructing a `Quotesheet` orchestrator with custom configuration.
pub struct QuotesheetBuilder {
    market: Option<Arc<dyn MarketData>>,
    sheets: Option<Arc<dyn SheetStore>>,
    holidays: Option<HolidaySet>,
    cfg: QuotesheetConfig,
}

impl Default for QuotesheetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotesheetBuilder {
    /// Create a new builder with the default configuration.
    ///
    /// Both collaborators must be registered before [`build`](Self::build):
    /// a market-data source via [`market_data`](Self::market_data) and a spreadsheet
    /// store via [`sheet_store`](Self::sheet_store).
    #[must_use]
    pub fn new() -> Self {
        Self {
            market: None,
            sheets: None,
            holidays: None,
            cfg: QuotesheetConfig::default(),
        }
    }

    /// Register the market-data collaborator.
    #[must_use]
    pub fn market_data(mut self, market: Arc<dyn MarketData>) -> Self {
        self.market = Some(market);
        self
    }

    /// Register the spreadsheet collaborator.
    #[must_use]
    pub fn sheet_store(mut self, sheets: Arc<dyn SheetStore>) -> Self {
        self.sheets = Some(sheets);
        self
    }

    /// Replace the whole configuration, e.g. one loaded with
    /// [`QuotesheetConfig::from_json_file`].
    ///
    /// Setters called afterwards still apply on top of it.
    #[must_use]
    pub fn config(mut self, cfg: QuotesheetConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Use an already loaded holiday set instead of reading `holidays_path`.
    #[must_use]
    pub fn holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = Some(holidays);
        self
    }

    /// Holiday file read once by [`build`](Self::build).
    #[must_use]
    pub fn holidays_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cfg.holidays_path = Some(path.into());
        self
    }

    /// Return horizons in years, in output column order.
    #[must_use]
    pub fn return_years(mut self, years: impl Into<Vec<u32>>) -> Self {
        self.cfg.return_years = years.into();
        self
    }

    /// Calendar days covered by the rolling close-price sheet.
    #[must_use]
    pub const fn rolling_window_days(mut self, days: u32) -> Self {
        self.cfg.rolling_window_days = days;
        self
    }

    /// Pause after each sheet write.
    ///
    /// Spreadsheet services enforce per-minute write quotas; a zero pause is only
    /// sensible against in-memory stores.
    #[must_use]
    pub const fn write_pause(mut self, pause: Duration) -> Self {
        self.cfg.write_pause = pause;
        self
    }

    /// Pause between full cycles when running continuously.
    #[must_use]
    pub const fn cycle_pause(mut self, pause: Duration) -> Self {
        self.cfg.cycle_pause = pause;
        self
    }

    /// Timezone defining "today" and the day boundaries of candle requests.
    #[must_use]
    pub const fn market_timezone(mut self, tz: Tz) -> Self {
        self.cfg.market_timezone = tz;
        self
    }

    /// Maximum number of symbols fetched at once within one sheet.
    ///
    /// Rows are always emitted in symbol order regardless of completion order,
    /// and each sheet is still written exactly once.
    #[must_use]
    pub const fn fetch_concurrency(mut self, n: usize) -> Self {
        self.cfg.fetch_concurrency = n;
        self
    }

    /// Timeout applied to every collaborator call.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// What a returns row carries for a horizon without data.
    #[must_use]
    pub const fn missing_horizon_policy(mut self, policy: MissingHorizonPolicy) -> Self {
        self.cfg.missing_horizon_policy = policy;
        self
    }

    /// Override the A1 ranges read and written per projection.
    #[must_use]
    pub fn layout(mut self, layout: SheetLayout) -> Self {
        self.cfg.layout = layout;
        self
    }

    /// Append a document to update. Documents are processed in registration order.
    #[must_use]
    pub fn document(mut self, doc: DocumentConfig) -> Self {
        self.cfg.documents.push(doc);
        self
    }

    /// Build the `Quotesheet` orchestrator.
    ///
    /// The holiday calendar is loaded here, once, so a bad holiday file stops startup
    /// instead of silently resolving dates against weekends only.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a collaborator is missing, and `Config` if the
    /// configuration is invalid or the holiday file cannot be loaded.
    pub fn build(self) -> Result<Quotesheet, QuotesheetError> {
        let market = self.market.ok_or_else(|| {
            QuotesheetError::InvalidArg(
                "no market data registered; add one via market_data(...)".to_string(),
            )
        })?;
        let sheets = self.sheets.ok_or_else(|| {
            QuotesheetError::InvalidArg(
                "no sheet store registered; add one via sheet_store(...)".to_string(),
            )
        })?;
        self.cfg.validate()?;

        let holidays = match (self.holidays, &self.cfg.holidays_path) {
            (Some(set), _) => set,
            (None, Some(path)) => HolidayCalendar::new(path).load()?,
            (None, None) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("no holiday calendar configured; only weekends are non-trading");
                HolidaySet::new()
            }
        };

        let resolver = TradingDayResolver::new(Arc::new(holidays));
        let fetcher = PriceSeriesFetcher::new(
            market,
            resolver.clone(),
            self.cfg.market_timezone,
            self.cfg.provider_timeout,
        );
        let projector = SheetProjector::new(fetcher, &self.cfg);

        Ok(Quotesheet {
            sheets,
            resolver,
            projector,
            cfg: self.cfg,
        })
    }
}

/// Wrap a collaborator future with a timeout and standardized timeout error mapping.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "quotesheet::core::call_with_timeout",
        skip(fut),
        fields(
            collaborator = collaborator,
            capability = capability,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )
)]
pub(crate) async fn call_with_timeout<T, Fut>(
    collaborator: &'static str,
    capability: &'static str,
    timeout: Duration,
    fut: Fut,
) -> Result<T, QuotesheetError>
where
    Fut: core::future::Future<Output = Result<T, QuotesheetError>>,
{
    (tokio::time::timeout(timeout, fut).await)
        .unwrap_or_else(|_| Err(QuotesheetError::timeout(collaborator, capability)))
}

impl Quotesheet {
    /// Start building a new `Quotesheet` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use quotesheet::{DocumentConfig, Quotesheet};
    ///
    /// let qs = Quotesheet::builder()
    ///     .market_data(Arc::new(questrade))
    ///     .sheet_store(Arc::new(sheets))
    ///     .holidays_path("tsx_holidays.txt")
    ///     .document(DocumentConfig::standard("Portfolio"))
    ///     .build()?;
    /// let report = qs.update_all().await;
    /// ```
    #[must_use]
    pub fn builder() -> QuotesheetBuilder {
        QuotesheetBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &QuotesheetConfig {
        &self.cfg
    }

    /// Trading-day resolver built over the loaded holiday calendar.
    #[must_use]
    pub const fn resolver(&self) -> &TradingDayResolver {
        &self.resolver
    }

    /// Projector used by the update pipeline.
    #[must_use]
    pub const fn projector(&self) -> &SheetProjector {
        &self.projector
    }
}
