//! PortfolioPresenter
//!
//! Coordinates every refresh of the portfolio display.
//! Responsibilities:
//!   • Reload the portfolio at startup and on user request
//!   • Refresh quotes on a fixed cadence
//!   • Rebuild the table and publish status lines through `DisplayState`
//!   • Shut the view and the ticker down on quit
//!
//! Refreshes are serialized: the timer and user paths both run under the
//! same async mutex, so a table is always the product of exactly one cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::{TraceId, child_span, root_span, warn_if_slow};
use portfolio::{Portfolio, PortfolioService, QuoteService};
use tokio::sync::Mutex;
use tracing::{Instrument, Span, debug, info, warn};

use crate::config::AppConfig;
use crate::display::DisplayState;
use crate::error::RefreshError;
use crate::event::UiEvent;
use crate::shutdown::Shutdown;
use crate::table::build_rows;
use crate::ticker::run_ticker;
use crate::time::clock_now;
use crate::view::PortfolioView;

pub const STATUS_UPDATING: &str = "Updating quotes...";
pub const STATUS_RELOADING: &str = "Reloading portfolio...";
pub const STATUS_LAST_UPDATE_PREFIX: &str = "Last update: ";

/// Contract the view talks to.
#[async_trait]
pub trait Presenter: Send + Sync + 'static {
    /// Initialize the view, start the ticker and load the portfolio.
    async fn init(self: Arc<Self>);

    async fn process_ui_event(&self, event: UiEvent);

    /// Quit the view and close the shutdown latch. Idempotent.
    fn quit(&self);
}

#[derive(Debug, Default)]
struct RefreshState {
    /// Last successfully fetched portfolio.
    portfolio: Option<Portfolio>,
}

pub struct PortfolioPresenter<V, Q, P> {
    view: Arc<V>,
    quote_service: Arc<Q>,
    portfolio_service: Arc<P>,
    config: AppConfig,
    display: DisplayState,

    /// Held for the whole duration of a refresh cycle.
    refresh: Mutex<RefreshState>,

    ticker_started: AtomicBool,
    quitting: AtomicBool,
    shutdown: Shutdown,
}

impl<V, Q, P> PortfolioPresenter<V, Q, P>
where
    V: PortfolioView,
    Q: QuoteService,
    P: PortfolioService,
{
    pub fn new(
        view: Arc<V>,
        quote_service: Arc<Q>,
        portfolio_service: Arc<P>,
        config: AppConfig,
        shutdown: Shutdown,
    ) -> Arc<Self> {
        Arc::new(Self {
            view,
            quote_service,
            portfolio_service,
            config,
            display: DisplayState::new(),
            refresh: Mutex::new(RefreshState::default()),
            ticker_started: AtomicBool::new(false),
            quitting: AtomicBool::new(false),
            shutdown,
        })
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Timer path: refresh quotes for the portfolio already loaded.
    pub async fn refresh_quotes(&self) {
        let trace_id = TraceId::new();
        async {
            let state = self.refresh.lock().await;
            let outcome = self.update_quotes(&state).await;
            self.publish_outcome(outcome);
        }
        .instrument(root_span("refresh_quotes", &trace_id))
        .await
    }

    /// User path: fetch the portfolio, then refresh quotes for it.
    pub async fn reload_portfolio(&self) {
        let trace_id = TraceId::new();
        async {
            let mut state = self.refresh.lock().await;
            self.display.status.set(STATUS_RELOADING);

            let outcome = self.reload(&mut state).await;
            self.publish_outcome(outcome);
        }
        .instrument(root_span("reload_portfolio", &trace_id))
        .await
    }

    /// A failed portfolio fetch aborts before any quote is requested.
    async fn reload(&self, state: &mut RefreshState) -> Result<(), RefreshError> {
        let portfolio = self.fetch_portfolio().await?;
        info!(entries = portfolio.len(), "portfolio reloaded");
        state.portfolio = Some(portfolio);

        self.update_quotes(state).await
    }

    async fn fetch_portfolio(&self) -> Result<Portfolio, RefreshError> {
        warn_if_slow(
            "fetch_portfolio",
            self.config.slow_call_warn,
            self.portfolio_service.fetch_portfolio(),
        )
        .instrument(child_span("fetch_portfolio"))
        .await
        .map_err(RefreshError::PortfolioFetch)
    }

    /// Fetch quotes for the loaded portfolio and swap in a new table.
    /// The table is left untouched on any error.
    async fn update_quotes(&self, state: &RefreshState) -> Result<(), RefreshError> {
        let portfolio = state.portfolio.as_ref().ok_or(RefreshError::NoPortfolio)?;

        self.display.status.set(STATUS_UPDATING);

        let assets = portfolio.asset_ids();
        Span::current().record("assets", assets.len());

        let quotes = warn_if_slow(
            "fetch_quotes",
            self.config.slow_call_warn,
            self.quote_service.fetch_quotes(&assets),
        )
        .instrument(child_span("fetch_quotes"))
        .await
        .map_err(RefreshError::QuoteFetch)?;

        let rows = build_rows(portfolio, &quotes)?;
        self.display.table.replace(rows);

        Ok(())
    }

    fn publish_outcome(&self, outcome: Result<(), RefreshError>) {
        match outcome {
            Ok(()) => {
                let now = clock_now();
                debug!(at = %now, "display refreshed");
                self.display
                    .status
                    .set(format!("{STATUS_LAST_UPDATE_PREFIX}{now}"));
            }
            Err(RefreshError::NoPortfolio) => {
                debug!("no portfolio loaded yet; skipping quote refresh");
            }
            Err(e) => {
                warn!(error = ?e, "refresh failed");
                self.display.status.set(e.to_string());
            }
        }
    }

    /// Spawn the ticker once. Later calls, and calls after shutdown, are no-ops.
    fn start_ticker(self: &Arc<Self>) {
        if self.shutdown.is_triggered() {
            return;
        }
        if self.ticker_started.swap(true, Ordering::AcqRel) {
            debug!("ticker already running");
            return;
        }

        let presenter = Arc::clone(self);
        let every = self.config.tick_interval;
        let shutdown = self.shutdown.subscribe();
        let span = tracing::info_span!("ticker");

        tokio::spawn(
            run_ticker(every, shutdown, move || {
                let presenter = Arc::clone(&presenter);
                async move { presenter.refresh_quotes().await }
            })
            .instrument(span),
        );
    }
}

#[async_trait]
impl<V, Q, P> Presenter for PortfolioPresenter<V, Q, P>
where
    V: PortfolioView,
    Q: QuoteService,
    P: PortfolioService,
{
    async fn init(self: Arc<Self>) {
        let presenter: Arc<dyn Presenter> = self.clone();
        self.view.init(presenter, self.display.clone());

        self.start_ticker();
        self.reload_portfolio().await;
    }

    async fn process_ui_event(&self, event: UiEvent) {
        debug!(?event, "ui event");
        match event {
            UiEvent::PortfolioRefresh => self.reload_portfolio().await,
            UiEvent::ProgramQuit => self.quit(),
        }
    }

    fn quit(&self) {
        if self.quitting.swap(true, Ordering::AcqRel) {
            debug!("quit already requested");
            return;
        }

        self.view.quit();
        if self.shutdown.trigger() {
            info!("shutdown requested");
        }
    }
}
