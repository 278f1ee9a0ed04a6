use std::fs;
use std::path::Path;

use engine_logging::{engine_info, engine_warn, LogDestination, LogSettings};
use pagewatch_core::{ConfigError, ValidationThresholds, WatchConfig};
use pagewatch_engine::{SearchOptions, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

use super::Args;

/// Settings read from `pagewatch.ron`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub max_results: u32,
    pub use_cache: bool,
    pub poll_ms: u64,
    pub max_ms: u64,
    pub validation: ValidationThresholds,
    pub logging: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        let watch = WatchConfig::default();
        let search = SearchOptions::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: search.max_results,
            use_cache: search.use_cache,
            poll_ms: duration_ms(watch.poll_interval()),
            max_ms: duration_ms(watch.max_duration()),
            validation: ValidationThresholds::default(),
            logging: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Command-line flags win over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(max_results) = args.max_results {
            self.max_results = max_results;
        }
        if args.no_cache {
            self.use_cache = false;
        }
        if let Some(poll_ms) = args.poll_ms {
            self.poll_ms = poll_ms;
        }
        if let Some(max_ms) = args.max_ms {
            self.max_ms = max_ms;
        }
        if let Some(file) = &args.log_file {
            self.logging.file = file.clone();
            if self.logging.destination == LogDestination::Terminal {
                self.logging.destination = LogDestination::Both;
            }
        }
    }

    pub fn watch_config(&self) -> Result<WatchConfig, ConfigError> {
        WatchConfig::from_millis(self.poll_ms, self.max_ms)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.max_results,
            use_cache: self.use_cache,
            session_id: None,
        }
    }
}

/// Reads the config file. A missing or unreadable file yields the defaults.
///
/// Runs before the logger exists, so problems are returned as warnings for
/// the caller to log once logging is up.
pub fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (AppConfig::default(), None);
        }
        Err(err) => {
            return (
                AppConfig::default(),
                Some(format!("Failed to read config from {path:?}: {err}")),
            );
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, None),
        Err(err) => (
            AppConfig::default(),
            Some(format!("Failed to parse config from {path:?}: {err}")),
        ),
    }
}

pub fn report_load(path: &Path, warning: Option<&str>) {
    match warning {
        Some(warning) => engine_warn!("{}; using defaults", warning),
        None => engine_info!("Configuration from {:?} (defaults if absent)", path),
    }
}

fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
