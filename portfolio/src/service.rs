//! Collaborator seams.
//!
//! Implementations own every transport detail; callers only see the
//! request/response contract and an opaque error.

use async_trait::async_trait;

use crate::models::{Portfolio, QuoteMap};

/// Fetches the latest quote for each requested asset.
#[async_trait]
pub trait QuoteService: Send + Sync + 'static {
    async fn fetch_quotes(&self, asset_ids: &[String]) -> anyhow::Result<QuoteMap>;
}

/// Fetches the user's current portfolio.
#[async_trait]
pub trait PortfolioService: Send + Sync + 'static {
    async fn fetch_portfolio(&self) -> anyhow::Result<Portfolio>;
}
