//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `BUSBOOK_*` environment variables that
//! override configuration file values.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use busbook::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Reads all `BUSBOOK_*` environment variables and applies them to the
    /// configuration with higher precedence than file-based configs.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric timeout, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var("BUSBOOK_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("BUSBOOK_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(seconds) = env::var("BUSBOOK_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(seconds.trim().parse().map_err(|_| Error::Validation {
                    field: "BUSBOOK_MAXIMUM_LOCK_WAIT_SECONDS".into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        if let Ok(format) = env::var("BUSBOOK_OUTPUT_FORMAT") {
            config.output_format = Some(format.parse().map_err(|message| Error::Validation {
                field: "BUSBOOK_OUTPUT_FORMAT".into(),
                message,
            })?);
        }

        // BUSBOOK_ALLOWED_WEEKDAYS (comma-separated)
        if let Ok(days) = env::var("BUSBOOK_ALLOWED_WEEKDAYS") {
            let schedule = config.schedule.get_or_insert_with(Default::default);
            schedule.allowed_weekdays = Some(Self::parse_list(&days));
        }

        if let Ok(val) = env::var("BUSBOOK_NOTIFICATIONS") {
            let notifications = config.notifications.get_or_insert_with(Default::default);
            notifications.enabled = Some(Self::parse_bool("BUSBOOK_NOTIFICATIONS", &val)?);
        }

        if let Ok(sender) = env::var("BUSBOOK_NOTIFICATION_SENDER") {
            let notifications = config.notifications.get_or_insert_with(Default::default);
            notifications.sender = Some(sender);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    /// Split a comma-separated list, dropping blank entries.
    fn parse_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    }
}
