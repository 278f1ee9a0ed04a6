#![deny(missing_docs)]
//! Shared logging utilities for the pagewatch workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the logger setup used by the command-line front end, and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to the configured log file only.
    File,
    /// Write to the terminal (stderr for warnings and errors).
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Logger setup read from the application config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Where log records go.
    pub destination: LogDestination,
    /// Level name understood by `log` (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
    /// File used by `File` and `Both` destinations.
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::Terminal,
            level: "info".to_string(),
            file: PathBuf::from("./pagewatch.log"),
        }
    }
}

impl LogSettings {
    /// Parsed level, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// Initializes the global logger from `settings`.
///
/// A second call is ignored, as is a log file that cannot be created (a
/// warning is printed and the remaining loggers are still installed).
pub fn initialize(settings: &LogSettings) {
    let level = settings.level_filter();
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(
        settings.destination,
        LogDestination::Terminal | LogDestination::Both
    ) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if matches!(
        settings.destination,
        LogDestination::File | LogDestination::Both
    ) {
        if let Some(file_logger) = create_file_logger(level, config, &settings.file) {
            loggers.push(file_logger);
        }
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
