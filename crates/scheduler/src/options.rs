//! Scheduler configuration.
//!
//! `SchedulerConfig` is the raw, deserializable surface (whole hours and an
//! optional `"HH:MM"` string). It is validated once into `SchedulerOptions`,
//! which is immutable afterwards.

use std::time::Duration;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::ConfigError;

/// Longest accepted period, ten years in hours.
pub const MAX_PERIOD_HOURS: i64 = 24 * 365 * 10;

const SECONDS_PER_HOUR: u64 = 3600;

/// Raw scheduler settings as they appear in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    pub training_period_hours: i64,
    pub recommending_period_hours: i64,
    /// Local time of day ("HH:MM") of the first tick; absent means start now.
    #[serde(default)]
    pub first_run_time_of_day: Option<String>,
}

/// Validated scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    training_period: Duration,
    recommending_period: Duration,
    first_run_time_of_day: Option<NaiveTime>,
}

impl SchedulerOptions {
    /// Build options from periods given directly as durations.
    pub fn new(
        training_period: Duration,
        recommending_period: Duration,
        first_run_time_of_day: Option<NaiveTime>,
    ) -> Result<Self, ConfigError> {
        check_period("training_period", training_period)?;
        check_period("recommending_period", recommending_period)?;
        Ok(Self {
            training_period,
            recommending_period,
            first_run_time_of_day,
        })
    }

    /// Build options from whole hours and an optional `"HH:MM"` string.
    pub fn from_hours(
        training_period_hours: i64,
        recommending_period_hours: i64,
        first_run_time_of_day: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let training_period = hours("training_period_hours", training_period_hours)?;
        let recommending_period = hours("recommending_period_hours", recommending_period_hours)?;
        let first_run_time_of_day = first_run_time_of_day
            .map(parse_time_of_day)
            .transpose()?;

        Self::new(training_period, recommending_period, first_run_time_of_day)
    }

    pub fn training_period(&self) -> Duration {
        self.training_period
    }

    pub fn recommending_period(&self) -> Duration {
        self.recommending_period
    }

    pub fn first_run_time_of_day(&self) -> Option<NaiveTime> {
        self.first_run_time_of_day
    }
}

impl TryFrom<SchedulerConfig> for SchedulerOptions {
    type Error = ConfigError;

    fn try_from(config: SchedulerConfig) -> Result<Self, Self::Error> {
        Self::from_hours(
            config.training_period_hours,
            config.recommending_period_hours,
            config.first_run_time_of_day.as_deref(),
        )
    }
}

/// Parse an ISO local time of day, `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ConfigError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|source| ConfigError::InvalidTimeOfDay {
            value: value.to_string(),
            source,
        })
}

fn hours(field: &'static str, value: i64) -> Result<Duration, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositivePeriod { field, value });
    }
    if value > MAX_PERIOD_HOURS {
        return Err(ConfigError::PeriodTooLong {
            field,
            value,
            max: MAX_PERIOD_HOURS,
        });
    }
    Ok(Duration::from_secs(value as u64 * SECONDS_PER_HOUR))
}

fn check_period(field: &'static str, period: Duration) -> Result<(), ConfigError> {
    if period.is_zero() {
        return Err(ConfigError::ZeroPeriod { field });
    }
    if period > Duration::from_secs(MAX_PERIOD_HOURS as u64 * SECONDS_PER_HOUR) {
        return Err(ConfigError::PeriodTooLong {
            field,
            value: (period.as_secs() / SECONDS_PER_HOUR) as i64,
            max: MAX_PERIOD_HOURS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hours_valid() {
        let options = SchedulerOptions::from_hours(24, 1, Some("03:30")).unwrap();

        assert_eq!(options.training_period(), Duration::from_secs(24 * 3600));
        assert_eq!(options.recommending_period(), Duration::from_secs(3600));
        assert_eq!(
            options.first_run_time_of_day(),
            NaiveTime::from_hms_opt(3, 30, 0)
        );
    }

    #[test]
    fn test_without_alignment() {
        let options = SchedulerOptions::from_hours(2, 1, None).unwrap();
        assert!(options.first_run_time_of_day().is_none());
    }

    #[test]
    fn test_non_positive_periods_rejected() {
        let err = SchedulerOptions::from_hours(0, 1, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositivePeriod {
                field: "training_period_hours",
                value: 0
            }
        ));

        let err = SchedulerOptions::from_hours(1, -3, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositivePeriod {
                field: "recommending_period_hours",
                value: -3
            }
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = SchedulerOptions::new(Duration::ZERO, Duration::from_secs(1), None).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPeriod { field: "training_period" }));
    }

    #[test]
    fn test_overlong_period_rejected() {
        let err = SchedulerOptions::from_hours(MAX_PERIOD_HOURS + 1, 1, None).unwrap_err();
        assert!(matches!(err, ConfigError::PeriodTooLong { .. }));
    }

    #[test]
    fn test_malformed_time_of_day_rejected() {
        for bad in ["", "25:00", "7pm", "12:60", "12-30"] {
            let err = SchedulerOptions::from_hours(1, 1, Some(bad)).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidTimeOfDay { .. }),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_time_of_day_with_seconds() {
        let time = parse_time_of_day("23:59:30").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(23, 59, 30).unwrap());
    }

    #[test]
    fn test_config_deserializes_and_converts() {
        let config: SchedulerConfig = serde_json::from_str(
            r#"{"training_period_hours": 24, "recommending_period_hours": 1}"#,
        )
        .unwrap();
        assert!(config.first_run_time_of_day.is_none());

        let options = SchedulerOptions::try_from(config).unwrap();
        assert_eq!(options.training_period(), Duration::from_secs(86_400));
    }
}
