//! Logging setup for the command-line binary
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Output goes to stderr so streamed text on stdout stays clean.

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Filter directive used when `RUST_LOG` is unset
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::VeryVerbose => "debug",
        Verbosity::Trace => "trace",
    }
}

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags. Calling this twice
/// is harmless; the second call is ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
