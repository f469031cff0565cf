use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const SESSION_PREFIX: &str = "session";
pub const REPLAY_PREFIX: &str = "replay";

const KEPT_LOG_FILES: usize = 5;

/// Installs the global subscriber. Logs always go to a daily file under `<dir>/logs`, one set of
/// files per `prefix`. `verbose` raises the level to trace and mirrors everything to stderr,
/// since stdout belongs to the session.
pub fn enable_logging(prefix: &str, application_data_path: &Path, verbose: bool) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(prefix)
        .build(application_data_path.join("logs"))?;

    let stderr = std::io::stderr.with_filter(move |_| verbose);

    tracing_subscriber::fmt()
        .with_env_filter(crate_filter(verbose, std::env::var("RUST_LOG").ok()))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(appender))
        .pretty()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber {e}"))?;
    Ok(())
}

/// Only this crate's events pass. `RUST_LOG` holds a bare level here, like `info`, and `verbose`
/// overrides it.
fn crate_filter(verbose: bool, rust_log: Option<String>) -> EnvFilter {
    let level = if verbose {
        LevelFilter::TRACE.to_string()
    } else {
        rust_log
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| LevelFilter::DEBUG.to_string())
    };
    EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level.trim()))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});
