//! Demo collaborators for the console binary.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use portfolio::{Portfolio, PortfolioService, Quote, QuoteMap, QuoteService};
use tracing::debug;

/// Portfolio supplied on the command line.
#[derive(Debug)]
pub enum CliPortfolioService {
    /// Re-read on every fetch so edits show up on the next user refresh.
    File(PathBuf),
    Inline(Portfolio),
}

#[async_trait]
impl PortfolioService for CliPortfolioService {
    async fn fetch_portfolio(&self) -> anyhow::Result<Portfolio> {
        match self {
            Self::File(path) => {
                let path = path.clone();
                let portfolio = tokio::task::spawn_blocking(move || Portfolio::from_json_file(path)).await??;
                Ok(portfolio)
            }
            Self::Inline(portfolio) => Ok(portfolio.clone()),
        }
    }
}

/// Deterministic price walk. Every call moves each asset's price and reports
/// the change against the previous call.
#[derive(Debug, Default)]
pub struct SimulatedQuoteService {
    last: Mutex<HashMap<String, (u64, f64)>>,
}

impl SimulatedQuoteService {
    pub fn new() -> Self {
        Self::default()
    }

    fn seed(asset_id: &str) -> u64 {
        asset_id
            .bytes()
            .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
    }

    fn base_price(asset_id: &str) -> f64 {
        (Self::seed(asset_id) % 50_000) as f64 / 10.0 + 1.0
    }

    fn price_at(asset_id: &str, step: u64) -> f64 {
        let phase = (Self::seed(asset_id) % 360) as f64;
        let swing = ((step as f64 + phase) * 0.7).sin() * 0.02;
        Self::base_price(asset_id) * (1.0 + swing)
    }

    fn next_quotes(&self, asset_ids: &[String]) -> QuoteMap {
        let mut last = self.last.lock();

        asset_ids
            .iter()
            .map(|id| {
                let (step, previous) = last
                    .get(id)
                    .copied()
                    .unwrap_or_else(|| (0, Self::price_at(id, 0)));

                let step = step + 1;
                let price = Self::price_at(id, step);
                let change = price - previous;
                last.insert(id.clone(), (step, price));

                (id.clone(), Quote::new(price, change, change / previous))
            })
            .collect()
    }
}

#[async_trait]
impl QuoteService for SimulatedQuoteService {
    async fn fetch_quotes(&self, asset_ids: &[String]) -> anyhow::Result<QuoteMap> {
        let quotes = self.next_quotes(asset_ids);
        debug!(assets = quotes.len(), "simulated quotes");
        Ok(quotes)
    }
}
