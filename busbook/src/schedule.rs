//! Travel dates and the weekly service schedule.
//!
//! The bus only runs on a fixed set of weekdays (Tuesday and Saturday by
//! default). Every date that reaches storage goes through [`TravelDate`],
//! which normalizes the many shapes a date can arrive in to a single ISO
//! `YYYY-MM-DD` form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::reservation::ValidationError;

const ISO_DATE: &str = "%Y-%m-%d";

/// A calendar date on which a seat can be booked.
///
/// `TravelDate` carries no schedule information by itself; use
/// [`Schedule::validate`] to check that the bus actually runs that day.
///
/// # Examples
///
/// ```
/// use busbook::TravelDate;
///
/// let date: TravelDate = "2024-06-08".parse().unwrap();
/// assert_eq!(date.to_string(), "2024-06-08");
///
/// // Date-times are normalized to their date part
/// let staged: TravelDate = "2024-06-08T07:30".parse().unwrap();
/// assert_eq!(staged, date);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TravelDate(NaiveDate);

impl TravelDate {
    /// Parses a travel date.
    ///
    /// Accepts, in order:
    /// - an ISO date (`2024-06-08`)
    /// - an RFC 3339 timestamp (`2024-06-08T07:30:00+05:30`), keeping the
    ///   date as written
    /// - a local date-time without offset (`2024-06-08T07:30` or
    ///   `2024-06-08T07:30:00`)
    ///
    /// # Errors
    ///
    /// Returns a validation error if none of the formats match.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE) {
            return Ok(Self(date));
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(stamp.date_naive()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(stamp.date()));
            }
        }

        Err(ValidationError {
            field: "travel_date".into(),
            message: format!("'{input}' is not a valid date (expected YYYY-MM-DD)"),
        })
    }

    /// Returns the underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Returns the day of the week.
    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the canonical ISO representation used in storage keys.
    #[must_use]
    pub fn iso(self) -> String {
        self.0.format(ISO_DATE).to_string()
    }
}

impl From<NaiveDate> for TravelDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for TravelDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TravelDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TravelDate> for String {
    fn from(date: TravelDate) -> Self {
        date.iso()
    }
}

impl fmt::Display for TravelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE))
    }
}

/// The weekdays on which the bus runs.
///
/// # Examples
///
/// ```
/// use busbook::{Schedule, TravelDate};
///
/// let schedule = Schedule::default();
/// let saturday: TravelDate = "2024-06-08".parse().unwrap();
/// let wednesday: TravelDate = "2024-06-05".parse().unwrap();
///
/// assert!(schedule.validate(saturday).is_ok());
/// assert!(schedule.validate(wednesday).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    allowed: Vec<Weekday>,
}

impl Schedule {
    /// Creates a schedule running on the given weekdays.
    ///
    /// Duplicates are dropped and days are kept in Monday-first order.
    #[must_use]
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut allowed: Vec<Weekday> = days.into_iter().collect();
        allowed.sort_by_key(Weekday::num_days_from_monday);
        allowed.dedup();
        Self { allowed }
    }

    /// Builds the schedule from configuration, falling back to the default
    /// Tuesday/Saturday service when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured weekday name is not recognized.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let Some(names) = config
            .schedule
            .as_ref()
            .and_then(|s| s.allowed_weekdays.as_ref())
        else {
            return Ok(Self::default());
        };

        let days = names
            .iter()
            .map(|name| parse_weekday(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(days))
    }

    /// Returns the weekdays on which the bus runs.
    #[must_use]
    pub fn allowed_weekdays(&self) -> &[Weekday] {
        &self.allowed
    }

    /// Returns `true` if the bus runs on the given date.
    #[must_use]
    pub fn is_allowed(&self, date: TravelDate) -> bool {
        self.allowed.contains(&date.weekday())
    }

    /// Checks that the bus runs on the given date.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the weekday when the date falls
    /// outside the schedule.
    pub fn validate(&self, date: TravelDate) -> Result<TravelDate, ValidationError> {
        if self.is_allowed(date) {
            return Ok(date);
        }

        let allowed = self
            .allowed
            .iter()
            .map(|d| weekday_name(*d))
            .collect::<Vec<_>>()
            .join(" or ");
        Err(ValidationError {
            field: "travel_date".into(),
            message: format!(
                "{date} is a {}; the bus only runs on {allowed}",
                weekday_name(date.weekday())
            ),
        })
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new([Weekday::Tue, Weekday::Sat])
    }
}

/// Parses a weekday name such as `tuesday` or `Sat`.
///
/// # Errors
///
/// Returns a validation error if the name is not a weekday.
pub fn parse_weekday(name: &str) -> Result<Weekday, ValidationError> {
    name.trim().parse::<Weekday>().map_err(|_| ValidationError {
        field: "schedule.allowed_weekdays".into(),
        message: format!("'{name}' is not a weekday"),
    })
}

/// Returns the full English name of a weekday.
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;

    fn date(s: &str) -> TravelDate {
        TravelDate::parse(s).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        let d = date("2024-06-08");
        assert_eq!(d.iso(), "2024-06-08");
        assert_eq!(d.weekday(), Weekday::Sat);
    }

    #[test]
    fn test_parse_normalizes_datetime_forms() {
        assert_eq!(date("2024-06-08T07:30"), date("2024-06-08"));
        assert_eq!(date("2024-06-08T07:30:15"), date("2024-06-08"));
        assert_eq!(date("2024-06-08 07:30:15"), date("2024-06-08"));
        assert_eq!(date("2024-06-08T23:30:00+05:30"), date("2024-06-08"));
        assert_eq!(date("  2024-06-08 "), date("2024-06-08"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TravelDate::parse("08/06/2024").is_err());
        assert!(TravelDate::parse("2024-02-30").is_err());
        assert!(TravelDate::parse("").is_err());
    }

    #[test]
    fn test_default_schedule_is_tuesday_and_saturday() {
        let schedule = Schedule::default();
        assert_eq!(schedule.allowed_weekdays(), &[Weekday::Tue, Weekday::Sat]);
        assert!(schedule.is_allowed(date("2024-06-04")));
        assert!(schedule.is_allowed(date("2024-06-08")));
        for non_service in ["2024-06-03", "2024-06-05", "2024-06-06", "2024-06-07", "2024-06-09"]
        {
            assert!(!schedule.is_allowed(date(non_service)), "{non_service}");
        }
    }

    #[test]
    fn test_validate_names_weekday() {
        let err = Schedule::default().validate(date("2024-06-05")).unwrap_err();
        assert_eq!(err.field, "travel_date");
        assert!(err.message.contains("Wednesday"));
        assert!(err.message.contains("Tuesday or Saturday"));
    }

    #[test]
    fn test_schedule_new_dedups_and_orders() {
        let schedule = Schedule::new([Weekday::Sat, Weekday::Tue, Weekday::Sat]);
        assert_eq!(schedule.allowed_weekdays(), &[Weekday::Tue, Weekday::Sat]);
    }

    #[test]
    fn test_schedule_from_config() {
        let config = Config {
            schedule: Some(ScheduleConfig {
                allowed_weekdays: Some(vec!["monday".into(), "Fri".into()]),
            }),
            ..Default::default()
        };
        let schedule = Schedule::from_config(&config).unwrap();
        assert_eq!(schedule.allowed_weekdays(), &[Weekday::Mon, Weekday::Fri]);

        let schedule = Schedule::from_config(&Config::default()).unwrap();
        assert_eq!(schedule, Schedule::default());
    }

    #[test]
    fn test_schedule_from_config_rejects_unknown_day() {
        let config = Config {
            schedule: Some(ScheduleConfig {
                allowed_weekdays: Some(vec!["funday".into()]),
            }),
            ..Default::default()
        };
        assert!(Schedule::from_config(&config).is_err());
    }

    #[test]
    fn test_travel_date_serde_is_iso_string() {
        let d = date("2024-06-08");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-06-08\"");
        let back: TravelDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
