use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global fmt subscriber. Safe to call more than once.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // try_init: a host application may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .try_init();

        tracing::info!(service = service_name, "logger initialized");
    });
}
