//! Console view
//!
//! Watches the presenter's status and table observables and redraws on
//! every signal. Input comes from stdin, one command per line.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use presenter::{DisplayState, PortfolioRow, PortfolioView, Presenter, UiEvent};
use signal::{EmptySignalObserver, Observer, WatchHandle};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const HEADERS: [&str; 6] = ["Asset", "Amount", "Price", "Value", "Change", "Change %"];

#[derive(Default)]
struct Bindings {
    display: Option<DisplayState>,
    status: Option<WatchHandle>,
    table: Option<WatchHandle>,
}

#[derive(Default)]
pub struct ConsoleView {
    observer: EmptySignalObserver,
    bindings: Mutex<Bindings>,
    closed: Arc<AtomicBool>,
}

impl ConsoleView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Detach both watchers. After this returns nothing is printed anymore.
    pub async fn detach(&self) {
        let (display, status, table) = {
            let mut bindings = self.bindings.lock();
            (bindings.display.take(), bindings.status.take(), bindings.table.take())
        };

        let Some(display) = display else {
            return;
        };
        if let Some(handle) = status {
            self.observer.ignore(display.status.observable(), handle).await;
        }
        if let Some(handle) = table {
            self.observer.ignore(display.table.observable(), handle).await;
        }
        debug!("console view detached");
    }
}

impl PortfolioView for ConsoleView {
    fn init(&self, presenter: Arc<dyn Presenter>, display: DisplayState) {
        let mut bindings = self.bindings.lock();
        if bindings.display.is_some() {
            warn!("console view already initialized");
            return;
        }

        let status = {
            let board = Arc::clone(&display.status);
            let closed = Arc::clone(&self.closed);
            self.observer.watch(display.status.observable(), move || {
                if !closed.load(Ordering::Acquire) {
                    print_out(&format!("{}\n", board.message()));
                }
            })
        };

        let table = {
            let table = Arc::clone(&display.table);
            let closed = Arc::clone(&self.closed);
            self.observer.watch(display.table.observable(), move || {
                if !closed.load(Ordering::Acquire) {
                    print_out(&render_table(&table.rows()));
                }
            })
        };

        bindings.display = Some(display);
        bindings.status = Some(status);
        bindings.table = Some(table);

        tokio::spawn(read_commands(presenter));
    }

    fn quit(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("console view closed");
        }
    }
}

fn print_out(text: &str) {
    let mut out = std::io::stdout().lock();
    // A closed stdout leaves nothing to report to.
    let _ = out.write_all(text.as_bytes()).and_then(|()| out.flush());
}

/// Map one input line to a UI event.
pub fn parse_command(line: &str) -> Option<UiEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "refresh" => Some(UiEvent::PortfolioRefresh),
        "q" | "quit" => Some(UiEvent::ProgramQuit),
        _ => None,
    }
}

/// Stdin is read on a plain thread: a blocking read inside the runtime
/// would hold up runtime shutdown until the next newline.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn read_commands(presenter: Arc<dyn Presenter>) {
    let mut lines = spawn_stdin_reader();

    while let Some(line) = lines.recv().await {
        match parse_command(&line) {
            Some(UiEvent::ProgramQuit) => {
                presenter.process_ui_event(UiEvent::ProgramQuit).await;
                break;
            }
            Some(event) => presenter.process_ui_event(event).await,
            None if line.trim().is_empty() => {}
            None => print_out("commands: r = refresh, q = quit\n"),
        }
    }
    debug!("command reader stopped");
}

/// Render rows as a right-aligned text table.
pub fn render_table(rows: &[PortfolioRow]) -> String {
    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.asset_name.as_str(),
                r.asset_amount.as_str(),
                r.asset_price.as_str(),
                r.asset_value.as_str(),
                r.value_change.as_str(),
                r.percent_change.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&HEADERS).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:>w$}"))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}
