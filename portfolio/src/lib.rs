//! Portfolio and quote models plus the call contracts of the services that
//! produce them.

pub mod error;
pub mod models;
pub mod service;

pub use error::PortfolioError;
pub use models::{Portfolio, PortfolioEntry, Quote, QuoteMap};
pub use service::{PortfolioService, QuoteService};
