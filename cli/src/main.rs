pub mod cli;
mod console;
mod services;

use std::sync::Arc;

use clap::Parser;
use common::{LogFormat, init_logger};
use presenter::{AppConfig, PortfolioPresenter, Presenter, Shutdown};

use cli::Cli;
use console::ConsoleView;
use services::SimulatedQuoteService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("portfolio-ticker", LogFormat::from_env());

    let cli = Cli::parse();

    let mut cfg = AppConfig::from_env();
    if let Some(every) = cli.tick_interval() {
        cfg = cfg.with_tick_interval(every);
    }
    tracing::info!(tick_secs = cfg.tick_interval.as_secs(), "Starting portfolio ticker...");

    let view = ConsoleView::new();
    let shutdown = Shutdown::new();
    let presenter = PortfolioPresenter::new(
        Arc::clone(&view),
        Arc::new(SimulatedQuoteService::new()),
        Arc::new(cli.portfolio_service()?),
        cfg,
        shutdown.clone(),
    );

    let on_ctrl_c = Arc::clone(&presenter);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                on_ctrl_c.quit();
            }
            Err(e) => tracing::error!(error = ?e, "failed to listen for ctrl-c"),
        }
    });

    presenter.clone().init().await;

    shutdown.wait().await;
    view.detach().await;

    tracing::info!("Bye");
    Ok(())
}
