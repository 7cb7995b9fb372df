
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use mock_services::{MockPortfolioService, MockQuoteService, RecordingView, sample_portfolio};
use presenter::presenter::{STATUS_LAST_UPDATE_PREFIX, STATUS_RELOADING, STATUS_UPDATING};
use presenter::table::TOTAL_ROW_LABEL;
use presenter::{AppConfig, PortfolioPresenter, Presenter, Shutdown, UiEvent};
use tracing_test::traced_test;

type TestPresenter = PortfolioPresenter<RecordingView, MockQuoteService, MockPortfolioService>;

struct Harness {
    view: Arc<RecordingView>,
    quotes: Arc<MockQuoteService>,
    portfolio: Arc<MockPortfolioService>,
    presenter: Arc<TestPresenter>,
}

fn harness_with(config: AppConfig) -> Harness {
    let view = RecordingView::new();
    let quotes = MockQuoteService::new();
    let portfolio = MockPortfolioService::with(sample_portfolio());
    let presenter = PortfolioPresenter::new(
        view.clone(),
        quotes.clone(),
        portfolio.clone(),
        config,
        Shutdown::new(),
    );

    Harness {
        view,
        quotes,
        portfolio,
        presenter,
    }
}

fn harness() -> Harness {
    harness_with(AppConfig::default())
}

fn assert_last_update(status: &str) {
    let clock = status
        .strip_prefix(STATUS_LAST_UPDATE_PREFIX)
        .unwrap_or_else(|| panic!("unexpected status {status:?}"));
    assert_eq!(clock.len(), "HH:MM:SS".len());
}

#[tokio::test(start_paused = true)]
async fn init_loads_portfolio_and_publishes_table() {
    let h = harness();

    h.presenter.clone().init().await;

    assert_eq!(h.view.inits.load(Ordering::SeqCst), 1);
    assert!(h.view.display.lock().is_some());
    assert_eq!(h.portfolio.calls(), 1);
    assert_eq!(h.quotes.calls(), 1);
    assert_eq!(h.quotes.requested.lock()[0], vec!["BTC", "ETH"]);

    let rows = h.presenter.display().table.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].asset_name, "BTC");
    assert_eq!(rows[0].asset_amount, "2.0000");
    assert_eq!(rows[0].asset_price, "10000.0000");
    assert_eq!(rows[0].asset_value, "20000.0000");
    assert_eq!(rows[0].percent_change, "1.0000");
    assert_eq!(rows[1].asset_name, "ETH");
    assert_eq!(rows[1].value_change, "-10.0000");
    assert_eq!(rows[2].asset_name, TOTAL_ROW_LABEL);
    assert_eq!(rows[2].asset_value, "26000.0000");

    assert_last_update(&h.presenter.display().status.message());

    h.presenter.quit();
}

#[tokio::test(start_paused = true)]
async fn reload_shows_progress_statuses() {
    let h = harness();
    *h.portfolio.delay.lock() = Some(Duration::from_secs(1));
    *h.quotes.delay.lock() = Some(Duration::from_secs(1));

    let presenter = h.presenter.clone();
    let reload = tokio::spawn(async move { presenter.reload_portfolio().await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.presenter.display().status.message(), STATUS_RELOADING);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.presenter.display().status.message(), STATUS_UPDATING);

    reload.await.unwrap();
    assert_last_update(&h.presenter.display().status.message());
}

#[tokio::test(start_paused = true)]
async fn timer_refreshes_quotes_every_interval() {
    let h = harness();

    h.presenter.clone().init().await;
    assert_eq!(h.quotes.calls(), 1);

    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(h.quotes.calls(), 1, "no tick before the first interval elapses");

    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert_eq!(h.quotes.calls(), 2);
    assert_eq!(h.portfolio.calls(), 1, "ticks never reload the portfolio");
    assert_eq!(h.presenter.display().table.rows()[0].asset_price, "20000.0000");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.quotes.calls(), 3);

    h.presenter.quit();
}

#[tokio::test(start_paused = true)]
async fn portfolio_failure_skips_quotes_and_keeps_table() {
    let h = harness();
    h.presenter.clone().init().await;
    let before = h.presenter.display().table.rows();

    h.portfolio.set(None);
    h.presenter.process_ui_event(UiEvent::PortfolioRefresh).await;

    assert_eq!(h.portfolio.calls(), 2);
    assert_eq!(h.quotes.calls(), 1);
    assert!(Arc::ptr_eq(&before, &h.presenter.display().table.rows()));
    assert_eq!(
        h.presenter.display().status.message(),
        "Error reloading portfolio: portfolio service down"
    );

    h.presenter.quit();
}

#[tokio::test(start_paused = true)]
async fn quote_failure_keeps_table_on_both_paths() {
    let h = harness();
    h.presenter.clone().init().await;
    let before = h.presenter.display().table.rows();

    h.quotes.set_failing(true);

    h.presenter.refresh_quotes().await;
    assert_eq!(h.presenter.display().status.message(), "Failed to fetch quotes from server");
    assert!(Arc::ptr_eq(&before, &h.presenter.display().table.rows()));

    h.presenter.process_ui_event(UiEvent::PortfolioRefresh).await;
    assert_eq!(h.presenter.display().status.message(), "Failed to fetch quotes from server");
    assert!(Arc::ptr_eq(&before, &h.presenter.display().table.rows()));

    h.quotes.set_failing(false);
    h.presenter.refresh_quotes().await;
    assert_last_update(&h.presenter.display().status.message());
    assert!(!Arc::ptr_eq(&before, &h.presenter.display().table.rows()));

    h.presenter.quit();
}

#[tokio::test(start_paused = true)]
async fn missing_quote_rejects_the_whole_table() {
    let h = harness();
    h.quotes.omit.lock().push("ETH".into());

    h.presenter.clone().init().await;

    assert!(h.presenter.display().table.rows().is_empty());
    assert_eq!(h.presenter.display().status.message(), "No quote received for ETH");

    h.presenter.quit();
}

#[tokio::test]
async fn tick_before_first_load_is_skipped() {
    let h = harness();

    h.presenter.refresh_quotes().await;

    assert_eq!(h.quotes.calls(), 0);
    assert!(h.presenter.display().status.message().is_empty());
    assert!(h.presenter.display().table.rows().is_empty());
}

#[tokio::test(start_paused = true)]
async fn refreshes_never_overlap() {
    let h = harness_with(AppConfig::default().with_tick_interval(Duration::from_secs(600)));
    *h.quotes.delay.lock() = Some(Duration::from_secs(1));

    h.presenter.clone().init().await;

    let p = &h.presenter;
    tokio::join!(p.reload_portfolio(), p.refresh_quotes(), p.refresh_quotes());

    assert_eq!(h.quotes.calls(), 4);
    assert_eq!(h.quotes.max_in_flight.load(Ordering::SeqCst), 1);

    // Every row comes from the same fetch.
    let rows = h.presenter.display().table.rows();
    assert_eq!(rows[0].asset_price, "40000.0000");
    assert_eq!(rows[1].asset_price, "8000.0000");
    assert_eq!(rows[2].asset_value, "104000.0000");

    h.presenter.quit();
}

#[tokio::test(start_paused = true)]
async fn quit_stops_ticker_and_runs_once() {
    let h = harness();
    h.presenter.clone().init().await;

    h.presenter.process_ui_event(UiEvent::ProgramQuit).await;
    h.presenter.quit();

    assert_eq!(h.view.quits.load(Ordering::SeqCst), 1);
    assert!(h.presenter.shutdown().is_triggered());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.quotes.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn init_twice_starts_a_single_ticker() {
    let h = harness();

    h.presenter.clone().init().await;
    h.presenter.clone().init().await;
    assert_eq!(h.quotes.calls(), 2);

    tokio::time::sleep(Duration::from_millis(10_001)).await;
    assert_eq!(h.quotes.calls(), 3);

    h.presenter.quit();
}

#[tokio::test(start_paused = true)]
async fn no_ticker_after_shutdown() {
    let h = harness();
    h.presenter.quit();

    h.presenter.clone().init().await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(h.quotes.calls(), 1, "only the startup reload ran");
}

#[tokio::test]
async fn view_can_drive_the_presenter_it_was_given() {
    let h = harness();
    h.presenter.clone().init().await;

    let handle = h.view.presenter.lock().clone().unwrap();
    handle.process_ui_event(UiEvent::PortfolioRefresh).await;

    assert_eq!(h.portfolio.calls(), 2);
    handle.quit();
    assert!(h.presenter.shutdown().is_triggered());
}

#[tokio::test]
#[traced_test]
async fn failed_refresh_is_logged() {
    let h = harness();
    h.portfolio.set(None);

    h.presenter.reload_portfolio().await;

    assert!(logs_contain("refresh failed"));
}
