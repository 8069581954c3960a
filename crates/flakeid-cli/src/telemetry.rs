//! Log output for the `flakeid` binary.
//!
//! Logs go to **stderr** so that stdout carries nothing but IDs. The level
//! defaults to `warn` and follows `RUST_LOG` when set, e.g.
//!
//! ```bash
//! RUST_LOG=flakeid=debug flakeid generate -n 3
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if `RUST_LOG` cannot be parsed or a subscriber is already set.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives)?,
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()?;

    Ok(())
}
