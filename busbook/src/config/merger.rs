//! Configuration merging and precedence handling.
//!
//! This module implements hierarchical merging of configuration sources.
//! Nested sections merge field by field; the weekday list is replaced as a
//! whole rather than accumulated.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, NotificationConfig, ScheduleConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use busbook::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(30), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(30));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Nested configs: field-by-field merge
    /// - Allowed weekdays: complete replacement
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_schedule) = source.schedule {
            target.schedule = Some(match &target.schedule {
                Some(target_schedule) => Self::merge_schedule(target_schedule, source_schedule),
                None => source_schedule.clone(),
            });
        }

        if let Some(ref source_notifications) = source.notifications {
            target.notifications = Some(match &target.notifications {
                Some(target_notifications) => {
                    Self::merge_notifications(target_notifications, source_notifications)
                }
                None => source_notifications.clone(),
            });
        }
    }

    fn merge_schedule(target: &ScheduleConfig, source: &ScheduleConfig) -> ScheduleConfig {
        ScheduleConfig {
            allowed_weekdays: source
                .allowed_weekdays
                .clone()
                .or_else(|| target.allowed_weekdays.clone()),
        }
    }

    fn merge_notifications(
        target: &NotificationConfig,
        source: &NotificationConfig,
    ) -> NotificationConfig {
        NotificationConfig {
            enabled: source.enabled.or(target.enabled),
            sender: source.sender.clone().or_else(|| target.sender.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OutputFormat;
    use std::path::PathBuf;

    fn source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("config-{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_empty() {
        assert_eq!(ConfigMerger::merge(vec![]), Config::default());
    }

    #[test]
    fn test_merge_simple_fields_override() {
        let low = Config {
            disable_autoinit: Some(true),
            output_format: Some(OutputFormat::Csv),
            ..Default::default()
        };
        let high = Config {
            output_format: Some(OutputFormat::Json),
            ..Default::default()
        };

        let merged = ConfigMerger::merge(vec![source(1, low), source(2, high)]);
        assert_eq!(merged.disable_autoinit, Some(true));
        assert_eq!(merged.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_merge_weekdays_replaced_not_accumulated() {
        let low = Config {
            schedule: Some(ScheduleConfig {
                allowed_weekdays: Some(vec!["tuesday".into(), "saturday".into()]),
            }),
            ..Default::default()
        };
        let high = Config {
            schedule: Some(ScheduleConfig {
                allowed_weekdays: Some(vec!["friday".into()]),
            }),
            ..Default::default()
        };

        let merged = ConfigMerger::merge(vec![source(1, low), source(3, high)]);
        assert_eq!(
            merged.schedule.unwrap().allowed_weekdays,
            Some(vec!["friday".to_string()])
        );
    }

    #[test]
    fn test_merge_notifications_field_by_field() {
        let low = Config {
            notifications: Some(NotificationConfig {
                enabled: Some(false),
                sender: Some("Transport Division".into()),
            }),
            ..Default::default()
        };
        let high = Config {
            notifications: Some(NotificationConfig {
                enabled: Some(true),
                sender: None,
            }),
            ..Default::default()
        };

        let merged = ConfigMerger::merge(vec![source(1, low), source(2, high)]);
        let notifications = merged.notifications.unwrap();
        assert_eq!(notifications.enabled, Some(true));
        assert_eq!(notifications.sender.as_deref(), Some("Transport Division"));
    }
}
