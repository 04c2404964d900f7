//! Stderr logging. Stdout carries the JSON protocol and never sees a log line.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "SHXREF_LOG";

/// Install a stderr subscriber filtered by `SHXREF_LOG` (default `warn`).
/// `verbose` raises the default to `debug`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_err| return EnvFilter::new(fallback));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    // A second init (tests, embedding) keeps the first subscriber.
    if let Err(err) = tracing_subscriber::registry().with(filter).with(stderr_layer).try_init() {
        eprintln!("shxref: logging already initialised: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_keeps_first_subscriber() {
        init_logging(false);
        init_logging(true);
        tracing::warn!("still routed");
    }
}
