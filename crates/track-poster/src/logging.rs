//! Logging setup for the command line tool
//!
//! Logs go to stderr so `--json` output on stdout stays machine readable. `RUST_LOG`
//! overrides the default `info` level.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

/// Keeps profiling output alive; drop it last so traces are flushed
#[cfg(feature = "profiling")]
pub type LoggingGuard = Option<tracing_chrome::FlushGuard>;
#[cfg(not(feature = "profiling"))]
pub type LoggingGuard = ();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging; profiling is a no-op in this build
#[cfg(not(feature = "profiling"))]
pub fn setup_logging() -> LoggingGuard {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Initialize logging and write a Chrome trace (`trace-<unix time>.json`) for the whole run
#[cfg(feature = "profiling")]
pub fn setup_logging() -> LoggingGuard {
    use tracing_chrome::ChromeLayerBuilder;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    let trace_file = format!(
        "trace-{}.json",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    );
    let (chrome_layer, guard) = ChromeLayerBuilder::new()
        .file(&trace_file)
        .include_args(true)
        .build();

    tracing_subscriber::registry()
        .with(chrome_layer)
        .with(fmt_layer)
        .init();

    tracing::info!("Profiling enabled, writing trace to {trace_file}");
    Some(guard)
}
