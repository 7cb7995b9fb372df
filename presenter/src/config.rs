use std::time::Duration;

const DEFAULT_TICK_INTERVAL_SECS: u64 = 10;
const DEFAULT_SLOW_CALL_WARN_MS: u64 = 2_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Cadence of the timer-driven quote refresh.
    ///
    /// Never zero; a zero override falls back to the default.
    pub tick_interval: Duration,

    /// Service calls slower than this are logged on the `performance` target.
    ///
    /// Purely diagnostic: calls are never cancelled.
    pub slow_call_warn: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(DEFAULT_TICK_INTERVAL_SECS),
            slow_call_warn: Duration::from_millis(DEFAULT_SLOW_CALL_WARN_MS),
        }
    }
}

impl AppConfig {
    /// Read `TICK_INTERVAL_SECS` and `SLOW_CALL_WARN_MS`, keeping defaults
    /// for anything missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            tick_interval: Duration::from_secs(read("TICK_INTERVAL_SECS", DEFAULT_TICK_INTERVAL_SECS)),
            slow_call_warn: Duration::from_millis(read("SLOW_CALL_WARN_MS", DEFAULT_SLOW_CALL_WARN_MS)),
        }
    }

    /// Override the tick interval; zero is ignored.
    pub fn with_tick_interval(mut self, every: Duration) -> Self {
        if !every.is_zero() {
            self.tick_interval = every;
        }
        self
    }
}
