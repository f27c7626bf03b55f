//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive.
const DEFAULT_FILTER: &str = "talkcalc=info";

/// Filter directive used with `--verbose`.
const VERBOSE_FILTER: &str = "talkcalc=debug,tower_http=debug,info";

/// Builds the filter for the given verbosity.
fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    })
}

/// Installs the global subscriber.
///
/// Does nothing if a subscriber is already installed, so tests and
/// embedding applications can call it freely.
pub fn init(verbose: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbose));
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init()
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
