use crate::error_classifier::LogLevel;
use std::env;
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is absent, as given to [`init`].
static FALLBACK_LEVEL: OnceLock<LogLevel> = OnceLock::new();

/// Level of the first directive in an env-filter string, `info` if unrecognized.
///
/// `dashboard_embed=debug,hyper=info` yields `Debug`.
pub fn parse_rust_log_level(filter: &str) -> LogLevel {
    let first = filter.split(',').next().unwrap_or_default();
    let level = first.rsplit('=').next().unwrap_or_default();
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

fn threshold(rust_log: Option<&str>, fallback: LogLevel) -> LogLevel {
    match rust_log.map(str::trim) {
        Some(filter) if !filter.is_empty() => parse_rust_log_level(filter),
        _ => fallback,
    }
}

/// Whether a line at `level` passes the active filter: `RUST_LOG` when set,
/// otherwise the fallback passed to [`init`].
pub fn enabled(level: LogLevel) -> bool {
    let rust_log = env::var("RUST_LOG").ok();
    let fallback = FALLBACK_LEVEL.get().copied().unwrap_or(LogLevel::Info);
    level >= threshold(rust_log.as_deref(), fallback)
}

/// Installs the process-wide subscriber.
///
/// `RUST_LOG` wins when set; otherwise `fallback` applies to every target.
/// Records emitted through the `log` macros are bridged into the subscriber.
pub fn init(fallback: LogLevel) {
    let _ = FALLBACK_LEVEL.set(fallback);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
