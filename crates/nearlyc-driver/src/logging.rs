//! Tracing setup.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `NEARLYC_LOG=debug`.
pub const LOG_VAR: &str = "NEARLYC_LOG";

/// Install the global tracing subscriber.
///
/// Does nothing unless `NEARLYC_LOG` or `RUST_LOG` is set or `verbose` is
/// true; in verbose mode without a filter, `debug` is used. Safe to call
/// more than once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let directive = std::env::var(LOG_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .or_else(|| verbose.then(|| "debug".to_string()));
        let Some(directive) = directive else {
            return;
        };

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::new(directive))
            .init();
    });
}
