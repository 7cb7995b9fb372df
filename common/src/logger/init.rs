use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Output flavour for the global subscriber.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `APP_ENV=production` switches to JSON lines.
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV").unwrap_or_default().as_str() {
            "production" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Install the global tracing subscriber. Safe to call more than once;
/// only the first call has an effect.
///
/// Logs go to stderr: stdout belongs to the console view.
pub fn init_logger(service_name: &'static str, format: LogFormat) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE);

        let installed = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(base.json())
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(base)
                .try_init(),
        };

        // Someone else (a test harness, usually) already owns the global subscriber.
        if installed.is_err() {
            return;
        }

        tracing::info!(service = service_name, ?format, "logger initialized");
    });
}
