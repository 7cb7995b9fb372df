use thiserror::Error;

/// The display table could not be built from the fetched data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("No quote received for {asset}")]
    MissingQuote { asset: String },
}

/// Why a refresh cycle stopped early.
///
/// The `Display` text of each variant is the status line shown to the user.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Error reloading portfolio: {0}")]
    PortfolioFetch(anyhow::Error),

    #[error("Failed to fetch quotes from server")]
    QuoteFetch(anyhow::Error),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("No portfolio loaded")]
    NoPortfolio,
}
