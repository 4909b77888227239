//! Tracing setup for the command-line tool.
//!
//! Logs go to stderr so stdout only ever carries summaries, extracted text or
//! JSON. `RUST_LOG` wins when set; otherwise the level is `info`, or `debug`
//! with `--verbose`.
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing(false);
        init_tracing(true);
        tracing::info!("subscriber installed");
    }
}
