//! Display state owned by the presenter.
//!
//! Each piece of state is paired with the observable that announces its
//! changes. Writers replace the value wholesale and then notify; readers
//! take a snapshot when signalled.

use std::sync::Arc;

use parking_lot::RwLock;
use signal::{EmptySignalObservable, Observable};

/// One line of the portfolio table, already formatted for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortfolioRow {
    pub asset_name: String,
    pub asset_amount: String,
    pub asset_price: String,
    pub asset_value: String,
    pub value_change: String,
    pub percent_change: String,
}

/// Current status line.
#[derive(Debug)]
pub struct StatusBoard {
    message: RwLock<String>,
    observable: EmptySignalObservable,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            message: RwLock::new(String::new()),
            observable: EmptySignalObservable::new("status"),
        }
    }
}

impl StatusBoard {
    pub fn message(&self) -> String {
        self.message.read().clone()
    }

    pub fn observable(&self) -> &EmptySignalObservable {
        &self.observable
    }

    pub(crate) fn set(&self, message: impl Into<String>) {
        *self.message.write() = message.into();
        self.observable.notify();
    }
}

/// Current portfolio table.
#[derive(Debug)]
pub struct PortfolioTable {
    rows: RwLock<Arc<Vec<PortfolioRow>>>,
    observable: EmptySignalObservable,
}

impl Default for PortfolioTable {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Arc::new(Vec::new())),
            observable: EmptySignalObservable::new("portfolio_table"),
        }
    }
}

impl PortfolioTable {
    /// Consistent snapshot of the whole table.
    pub fn rows(&self) -> Arc<Vec<PortfolioRow>> {
        self.rows.read().clone()
    }

    pub fn observable(&self) -> &EmptySignalObservable {
        &self.observable
    }

    pub(crate) fn replace(&self, rows: Vec<PortfolioRow>) {
        *self.rows.write() = Arc::new(rows);
        self.observable.notify();
    }
}

/// Everything the view renders. Cheap to clone; clones share state.
#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    pub status: Arc<StatusBoard>,
    pub table: Arc<PortfolioTable>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }
}
