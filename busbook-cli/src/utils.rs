//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management and value formatting.

use crate::error::CliError;
use busbook::config::OutputFormat;
use busbook::database::{default_data_dir, DATABASE_FILE_NAME};
use busbook::notify::{dispatcher_from_config, sender_from_config, NotificationDispatcher};
use busbook::{Config, ConfigBuilder, Database, DatabaseConfig, Schedule};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the database lock wait (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Output format for listings.
    pub format: Option<OutputFormat>,
}

/// Everything a command needs to talk to the ledger.
pub struct Session {
    /// Merged configuration.
    pub config: Config,
    /// Open database.
    pub db: Database,
    /// Service schedule from configuration.
    pub schedule: Schedule,
}

impl Session {
    /// Loads configuration and opens the database.
    pub fn open(global: &GlobalOptions) -> Result<Self, CliError> {
        let config = load_configuration(global)?;
        let schedule = Schedule::from_config(&config).map_err(|e| CliError::Config(e.to_string()))?;
        let db = open_database(global, &config)?;
        Ok(Self {
            config,
            db,
            schedule,
        })
    }

    /// Builds the dispatcher selected by configuration.
    pub fn notifier(&self) -> Box<dyn NotificationDispatcher> {
        dispatcher_from_config(&self.config)
    }

    /// Returns the sender name recorded on notices.
    pub fn sender(&self) -> String {
        sender_from_config(&self.config)
    }

    /// Resolves the listing format: flag, then configuration, then table.
    pub fn format(&self, global: &GlobalOptions) -> OutputFormat {
        output_format(global, &self.config)
    }
}

/// Resolve the data directory: the global flag (or `BUSBOOK_DATA_DIR`),
/// otherwise `~/.busbook`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.clone());
    }

    default_data_dir()
        .map_err(|_| CliError::Config("Could not determine home directory".to_string()))
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    let mut config = ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    if global.disable_autoinit {
        config.disable_autoinit = Some(true);
    }
    if let Some(seconds) = global.busy_timeout {
        if seconds == 0 {
            return Err(CliError::InvalidArguments(
                "--busy-timeout must be greater than 0".to_string(),
            ));
        }
        config.maximum_lock_wait_seconds = Some(seconds.into());
    }
    if let Some(format) = global.format {
        config.output_format = Some(format);
    }

    Ok(config)
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && config.disable_autoinit.unwrap_or(false) {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);
    if let Some(timeout_seconds) = config.maximum_lock_wait_seconds {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Resolves the listing format: flag, then configuration, then table.
pub fn output_format(global: &GlobalOptions, config: &Config) -> OutputFormat {
    global
        .format
        .or(config.output_format)
        .unwrap_or(OutputFormat::Table)
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats a yes/no flag for tabular output.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
