//! File logging. The terminal belongs to the timer display, so tracing output
//! goes to a daily log file under the state directory instead of stdout.

use std::path::{Path, PathBuf};

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use crate::app_dirs::AppDirs;

pub const LOG_ENV: &str = "GYMCLOCK_LOG";
const LOG_FILE_PREFIX: &str = "gymclock.log";

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program or buffered lines are lost on exit.
pub fn init() -> std::io::Result<(WorkerGuard, PathBuf)> {
    let dir = AppDirs::state_dir().unwrap_or_else(|| PathBuf::from("."));
    init_in(&dir)
}

pub fn init_in(dir: &Path) -> std::io::Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(dir)?;

    let appender = rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer().with_ansi(false).with_writer(writer);

    // A second init (tests, embedding) keeps the first subscriber
    if Registry::default().with(filter).with(layer).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    Ok((guard, dir.to_path_buf()))
}
