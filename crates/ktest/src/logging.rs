//! Diagnostic logging
//!
//! ktest reports results on stdout/stderr directly. `tracing` events carry the
//! runner's internals (spawning, classification, degraded isolation) and are
//! silent unless `KTEST_LOG` holds a filter such as `debug`.

use crate::config::LOG_ENV;
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `KTEST_LOG`.
///
/// Does nothing if `KTEST_LOG` is unset or a subscriber is already installed.
pub fn init() {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
