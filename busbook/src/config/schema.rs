//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for busbook:
//! the service schedule, notification settings, lock timeout and output
//! preferences. Every field is optional so that files can be layered.

use serde::{Deserialize, Serialize};

/// Complete configuration for busbook.
///
/// # Examples
///
/// ```
/// use busbook::config::Config;
///
/// let yaml = r#"
/// maximum_lock_wait_seconds: 10
/// schedule:
///   allowed_weekdays: [tuesday, saturday]
/// notifications:
///   enabled: false
/// "#;
/// let config: Config = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.maximum_lock_wait_seconds, Some(10));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Days of the week on which the bus runs.
    pub schedule: Option<ScheduleConfig>,

    /// Passenger notification settings.
    pub notifications: Option<NotificationConfig>,

    /// Do not create the database automatically.
    pub disable_autoinit: Option<bool>,

    /// How long to wait for the database write lock.
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Default output format for listings.
    pub output_format: Option<OutputFormat>,
}

/// Service schedule settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Weekday names (`tuesday`, `Sat`, ...). Defaults to Tuesday and Saturday.
    pub allowed_weekdays: Option<Vec<String>>,
}

/// Notification settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Whether to send notifications at all (default: true).
    pub enabled: Option<bool>,

    /// Name used as the sender of notices.
    pub sender: Option<String>,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array.
    Json,
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Aligned table.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            _ => Err(format!("invalid output format: {s}")),
        }
    }
}
