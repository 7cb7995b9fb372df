use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("invalid portfolio entry: {0}")]
    InvalidEntry(String),

    #[error("asset {0} is listed more than once")]
    DuplicateAsset(String),

    #[error("failed to read portfolio: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed portfolio document: {0}")]
    Json(#[from] serde_json::Error),
}
