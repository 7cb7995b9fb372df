/// Events raised by the view on behalf of the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UiEvent {
    /// Reload the portfolio and refresh quotes now.
    PortfolioRefresh,
    ProgramQuit,
}
