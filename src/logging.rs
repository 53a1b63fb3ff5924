// src/logging.rs
//! Logger setup. The TUI owns stdout, so while it runs records go to a file.

use crate::errors::ConfigError;
use chrono::Local;
use log::LevelFilter;
use std::path::Path;

/// Appends all records at `level` and above to `path`.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<(), ConfigError> {
    let file = fern::log_file(path).map_err(|source| ConfigError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // reqwest/hyper are chatty at debug.
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info)
        .chain(file)
        .apply()?;
    Ok(())
}

/// Stderr logging for the headless `generate` command.
pub fn init_stderr_logger(level: LevelFilter) -> Result<(), ConfigError> {
    env_logger::Builder::new().filter_level(level).target(env_logger::Target::Stderr).try_init()?;
    Ok(())
}

/// Captured test logging; safe to call from every test.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).filter_level(LevelFilter::Debug).try_init();
}
