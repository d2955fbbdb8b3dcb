//! Logging bootstrap.
//!
//! # Invariants
//! - The logger is started at most once per process.
//! - A second init with the same level is a no-op; a different level is rejected.

use anyhow::{anyhow, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::Path;

const LOG_FILE_BASENAME: &str = "moodtasks";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Default level for the current build mode
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    }
}

pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(anyhow!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

/// Start logging to stderr, or to rotating files under `log_dir` when given
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<()> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != level {
            return Err(anyhow!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level,
                level
            ));
        }
        return Ok(());
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        let logger = Logger::try_with_str(level)?;
        let logger = match log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                logger
                    .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                    .rotate(
                        Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                        Naming::Numbers,
                        Cleanup::KeepLogFiles(MAX_LOG_FILES),
                    )
                    .write_mode(WriteMode::BufferAndFlush)
                    .append()
                    .format_for_files(flexi_logger::detailed_format)
                    .start()?
            }
            None => logger.log_to_stderr().format(flexi_logger::default_format).start()?,
        };

        info!(
            "event=app_start module=core status=ok version={} level={}",
            env!("CARGO_PKG_VERSION"),
            level
        );

        Ok(LoggingState { level, _logger: logger })
    })?;

    if state.level != level {
        return Err(anyhow!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level,
            level
        ));
    }
    Ok(())
}
