use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use portfolio::{Portfolio, PortfolioEntry};

use crate::services::CliPortfolioService;

#[derive(Debug, Parser)]
#[clap(name = "portfolio-ticker", version)]
pub struct Cli {
    /// JSON portfolio file, re-read on every user refresh
    #[clap(long, conflicts_with = "entry")]
    pub portfolio: Option<PathBuf>,

    /// Inline holding as ASSET=AMOUNT (repeatable)
    #[clap(long, value_name = "ASSET=AMOUNT")]
    pub entry: Vec<PortfolioEntry>,

    /// Seconds between timer refreshes (overrides TICK_INTERVAL_SECS)
    #[clap(long)]
    pub tick_secs: Option<u64>,
}

impl Cli {
    pub fn tick_interval(&self) -> Option<Duration> {
        self.tick_secs.map(Duration::from_secs)
    }

    /// Portfolio source selected on the command line.
    pub fn portfolio_service(&self) -> anyhow::Result<CliPortfolioService> {
        if let Some(path) = &self.portfolio {
            return Ok(CliPortfolioService::File(path.clone()));
        }
        if self.entry.is_empty() {
            anyhow::bail!("no portfolio given: pass --portfolio <file.json> or --entry ASSET=AMOUNT");
        }
        let portfolio = Portfolio::new(self.entry.clone())?;
        Ok(CliPortfolioService::Inline(portfolio))
    }
}
