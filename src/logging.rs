//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so that primary command output (listings, diffs,
//! copy reports) stays clean on stdout.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// The default filter level is `info`, overridable through `RUST_LOG`;
/// `verbose` forces `debug`. Calling this more than once is a no-op.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();
}
