//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vigil_core::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects the `VIGIL_LOG` environment variable for filtering.
/// Defaults to `info` level if not set. Calling it more than once is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("VIGIL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter, true);
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter), true);
}

/// Initialize tracing from the `observability` config section.
/// `VIGIL_LOG` still wins over the configured level.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env("VIGIL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    install(filter, config.json);
}

fn install(filter: EnvFilter, json: bool) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_line_number(true))
                .try_init()
        };
        // Another subscriber was installed by the host; keep theirs.
        let _ = result;
    });
}
