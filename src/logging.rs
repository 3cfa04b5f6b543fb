//! Diagnostics setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to the caller.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive, e.g. `CHATLAB_LOG=chatlab=debug`
pub const LOG_ENV: &str = "CHATLAB_LOG";

/// Install a stderr subscriber. `CHATLAB_LOG` wins over `level` when set and valid.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
