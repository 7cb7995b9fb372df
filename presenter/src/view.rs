use std::sync::Arc;

use crate::display::DisplayState;
use crate::presenter::Presenter;

/// The rendering side of the application.
///
/// A view watches the observables in [`DisplayState`] and re-reads the
/// state it needs when signalled; it reports user input back through the
/// presenter it was initialized with.
pub trait PortfolioView: Send + Sync + 'static {
    fn init(&self, presenter: Arc<dyn Presenter>, display: DisplayState);

    fn quit(&self);
}
