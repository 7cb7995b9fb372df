//! Fixed-cadence trigger.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::shutdown::ShutdownSignal;

/// Call `on_tick` every `every` until `shutdown` closes.
///
/// The first tick fires one full interval after start. Ticks missed while
/// `on_tick` runs long are skipped, never queued.
pub async fn run_ticker<F, Fut>(every: Duration, mut shutdown: ShutdownSignal, mut on_tick: F)
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(every_ms = every.as_millis() as u64, "ticker started");

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = ticker.tick() => {
                debug!("tick");
                on_tick().await;
            }
        }
    }

    info!("ticker stopped");
}
