//! ISO-8601 repeating interval schedules (`R<n>/<start>/<interval>`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^R(\d*)/([^/]+)/([^/]+)$").expect("schedule grammar is valid"));

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(\d+Y)?(\d+M)?(\d+W)?(\d+D)?(T(\d+H)?(\d+M)?(\d+([.,]\d+)?S)?)?$")
        .expect("duration grammar is valid")
});

/// Errors from parsing a schedule string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Not of the form `R<n>/<start>/<interval>`
    #[error("'{0}' is not of the form R<n>/<start>/<interval>")]
    Format(String),

    /// Repetition count doesn't fit
    #[error("invalid repetition count '{0}'")]
    Repetitions(String),

    /// Start is not an ISO-8601 instant
    #[error("invalid start time '{0}'")]
    Start(String),

    /// Interval is not an ISO-8601 duration
    #[error("invalid interval '{0}'")]
    Interval(String),
}

/// A parsed repeating interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Remaining repetitions; `None` repeats forever
    pub repetitions: Option<u64>,
    /// First run
    pub start: DateTime<Utc>,
    /// ISO-8601 duration between runs, as written
    pub interval: String,
}

impl Schedule {
    /// Parse a schedule string
    pub fn parse(schedule: &str) -> Result<Self, ScheduleError> {
        let caps = GRAMMAR
            .captures(schedule)
            .ok_or_else(|| ScheduleError::Format(schedule.to_string()))?;

        let repetitions = match &caps[1] {
            "" => None,
            count => Some(
                count
                    .parse()
                    .map_err(|_| ScheduleError::Repetitions(count.to_string()))?,
            ),
        };
        let start = parse_instant(&caps[2])?;
        let interval = &caps[3];
        if !is_duration(interval) {
            return Err(ScheduleError::Interval(interval.to_string()));
        }

        Ok(Self {
            repetitions,
            start,
            interval: interval.to_string(),
        })
    }
}

/// Drop the leading `R<n>/` segment.
///
/// The scheduler rewrites the repetition count as a job runs, so it is
/// masked out before comparing. Strings without the prefix come back as is.
pub fn strip_recurrence(schedule: &str) -> &str {
    schedule
        .strip_prefix('R')
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(schedule)
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, ScheduleError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    let zoned = value
        .strip_suffix('Z')
        .map_or_else(|| value.to_string(), |v| format!("{v}+00:00"));
    for format in [
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%dT%H:%M%z",
        "%Y%m%dT%H%M%S%.f%:z",
        "%Y%m%dT%H%M%S%.f%z",
        "%Y%m%dT%H%M%:z",
        "%Y%m%dT%H%M%z",
    ] {
        if let Ok(instant) = DateTime::parse_from_str(&zoned, format) {
            return Ok(instant.with_timezone(&Utc));
        }
    }
    // No offset means UTC
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y%m%dT%H%M%S%.f",
        "%Y%m%dT%H%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    Err(ScheduleError::Start(value.to_string()))
}

fn is_duration(value: &str) -> bool {
    DURATION.is_match(value)
        && value.chars().any(|c| c.is_ascii_digit())
        && !value.ends_with('T')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_infinite() {
        let schedule = Schedule::parse("R/2024-01-01T00:00:00Z/PT1H").unwrap();
        assert_eq!(schedule.repetitions, None);
        assert_eq!(
            schedule.start,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(schedule.interval, "PT1H");
    }

    #[test]
    fn test_parse_counted_with_offset() {
        let schedule = Schedule::parse("R5/2024-03-10T12:30:00.000+02:00/P1D").unwrap();
        assert_eq!(schedule.repetitions, Some(5));
        assert_eq!(
            schedule.start,
            Utc.with_ymd_and_hms(2024, 3, 10, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_lenient_start() {
        assert!(Schedule::parse("R/2024-01-01T08:00:00/PT30M").is_ok());
        assert!(Schedule::parse("R/2024-01-01/P1W").is_ok());
    }

    #[test]
    fn test_parse_minute_precision_and_basic_format() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for start in [
            "2024-01-01T00:00Z",
            "2024-01-01T02:00+02:00",
            "20240101T000000Z",
            "20240101T020000+0200",
            "20240101T0000Z",
            "20240101",
        ] {
            let schedule = Schedule::parse(&format!("R/{start}/PT1H"))
                .unwrap_or_else(|e| panic!("{start}: {e}"));
            assert_eq!(schedule.start, midnight, "{start}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Schedule::parse("every hour"),
            Err(ScheduleError::Format(_))
        ));
        assert!(matches!(
            Schedule::parse("R/yesterday/PT1H"),
            Err(ScheduleError::Start(_))
        ));
        assert!(matches!(
            Schedule::parse("R/2024-13-01T00:00:00Z/PT1H"),
            Err(ScheduleError::Start(_))
        ));
        assert!(matches!(
            Schedule::parse("R/2024-01-01T00:00:00Z/1H"),
            Err(ScheduleError::Interval(_))
        ));
        assert!(matches!(
            Schedule::parse("R/2024-01-01T00:00:00Z/PT"),
            Err(ScheduleError::Interval(_))
        ));
        assert!(matches!(
            Schedule::parse("R99999999999999999999/2024-01-01T00:00:00Z/PT1H"),
            Err(ScheduleError::Repetitions(_))
        ));
    }

    #[test]
    fn test_strip_recurrence() {
        assert_eq!(
            strip_recurrence("R3/2024-01-01T00:00:00Z/PT1H"),
            "2024-01-01T00:00:00Z/PT1H"
        );
        assert_eq!(
            strip_recurrence("R/2024-01-01T00:00:00Z/PT1H"),
            "2024-01-01T00:00:00Z/PT1H"
        );
        assert_eq!(strip_recurrence("2024-01-01T00:00:00Z"), "2024-01-01T00:00:00Z");
        assert_eq!(strip_recurrence("Rx/foo"), "Rx/foo");
    }
}
