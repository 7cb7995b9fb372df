//! Refresh coordination for the portfolio display.
//!
//! The [`PortfolioPresenter`] reloads the portfolio, refreshes quotes on a
//! fixed cadence, rebuilds the display table and publishes every change
//! through the observables in [`DisplayState`].

pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod presenter;
pub mod shutdown;
pub mod table;
pub mod ticker;
pub mod time;
pub mod view;

pub use config::AppConfig;
pub use display::{DisplayState, PortfolioRow, PortfolioTable, StatusBoard};
pub use error::{RefreshError, TableError};
pub use event::UiEvent;
pub use presenter::{PortfolioPresenter, Presenter};
pub use shutdown::{Shutdown, ShutdownSignal};
pub use view::PortfolioView;
