//! Configuration validation.
//!
//! This module checks the merged configuration before anything is opened,
//! so a typo in a weekday name fails fast instead of at booking time.

use crate::config::schema::{Config, NotificationConfig, ScheduleConfig};
use crate::error::{Error, Result};
use crate::schedule::parse_weekday;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use busbook::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns validation errors for invalid configurations.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref schedule) = config.schedule {
            Self::validate_schedule(schedule)?;
        }

        if let Some(ref notifications) = config.notifications {
            Self::validate_notifications(notifications)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    /// Every weekday name must parse and the list cannot be empty.
    fn validate_schedule(schedule: &ScheduleConfig) -> Result<()> {
        let Some(ref days) = schedule.allowed_weekdays else {
            return Ok(());
        };

        if days.is_empty() {
            return Err(Error::Validation {
                field: "schedule.allowed_weekdays".into(),
                message: "At least one service day is required".into(),
            });
        }

        for day in days {
            parse_weekday(day)?;
        }

        Ok(())
    }

    fn validate_notifications(notifications: &NotificationConfig) -> Result<()> {
        if let Some(ref sender) = notifications.sender {
            Self::validate_identifier("notifications.sender", sender)?;
        }
        Ok(())
    }

    /// Validate free-text identifiers.
    ///
    /// Checks that the identifier is non-empty after trimming, contains no
    /// null bytes, and is not longer than 255 characters.
    fn validate_identifier(field: &str, value: &str) -> Result<()> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot be empty or only whitespace".into(),
            });
        }

        if trimmed.contains('\0') {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot contain null bytes".into(),
            });
        }

        if trimmed.len() > 255 {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot exceed 255 characters".into(),
            });
        }

        Ok(())
    }
}
