//! File logging for agenthub
//!
//! Written to `$XDG_STATE_HOME/agenthub/agenthub.log.<date>`, one file per day.
//! `RUST_LOG` overrides the configured level entirely.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};

/// HTTP stack crates are noisy at debug; keep them at warn unless RUST_LOG says otherwise.
const QUIET_DEPENDENCIES: [&str; 3] = ["hyper", "reqwest", "rustls"];

/// Keeps the background writer alive. Pending lines are flushed on drop.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed or the log directory cannot
/// be created.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("agenthub.log")
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to open log file in {:?}: {}", log_dir, e)))?;
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(&config.level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))?;

    tracing::info!(dir = %log_dir.display(), level = %config.level, "logging to file");
    Ok(LoggingGuard { _worker: worker })
}

/// Subscriber for tests: output goes through the test harness capture.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agenthub_core=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn directives(level: &str) -> String {
    let mut directives = level.trim().to_string();
    for target in QUIET_DEPENDENCIES {
        directives.push_str(&format!(",{target}=warn"));
    }
    directives
}
