//! File logging for the dashboard and CLI.
//!
//! The TUI owns the terminal, so nothing is ever logged to stdout or stderr.
//! Records go to a daily-rotated file under the XDG state directory
//! (`~/.local/state/clientdash/clientdash.log.YYYY-MM-DD`).
//!
//! The HTTP stack is chatty at `debug`, so its targets are capped at `warn`
//! unless the configured level already names targets itself.

use crate::config::{Config, LoggingConfig};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Base name of the rotated log files
pub const LOG_FILE_NAME: &str = "clientdash.log";

/// Transport crates kept at `warn` by default.
const QUIET_TARGETS: [&str; 4] = ["hyper", "hyper_util", "reqwest", "rustls"];

/// Keeps the background log writer alive; pending records flush on drop.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Filter directives for a configured level.
///
/// A bare level (`"debug"`) gets the transport crates capped at `warn`. A
/// value that already contains target directives is used verbatim.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };

    if level.contains('=') {
        return level.to_string();
    }

    let mut directives = vec![level.to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));
    directives.join(",")
}

/// `RUST_LOG` wins over the configured level. An unparsable level falls
/// back to `info`.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(filter_directives(&config.level)).unwrap_or_else(|_| {
        EnvFilter::new(filter_directives("info"))
    })
}

/// Start file logging for a binary.
///
/// Hold the returned guard for the life of the process.
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(file_layer)
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "clientdash logging started"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Route logs through the test harness' captured output.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(filter_directives("debug"))),
        )
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_quiets_transport_crates() {
        assert_eq!(
            filter_directives("debug"),
            "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
        );
    }

    #[test]
    fn test_blank_level_defaults_to_info() {
        assert!(filter_directives("  ").starts_with("info,"));
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        assert_eq!(
            filter_directives("clientdash_core=trace,reqwest=debug"),
            "clientdash_core=trace,reqwest=debug"
        );
    }

    #[test]
    fn test_log_path_matches_appender_name() {
        assert!(Config::log_path().ends_with(LOG_FILE_NAME));
    }
}
