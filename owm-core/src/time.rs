//! Normalization of the time shapes accepted by the alerting API.
//!
//! Callers may hand in UNIX epochs, `chrono` date-times or ISO-8601 strings;
//! everything is reduced to non-negative epoch seconds before it is stored.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Layout OWM uses when it renders timestamps. Always UTC.
pub const OWM_ISO8601_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

/// Space-separated layouts with an offset: `+HH:MM`, then `+HH` or `+HHMM`.
const OFFSET_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%#z"];

/// Layouts without an offset, read as UTC.
const NAIVE_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// A point in time in any of the shapes the API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    Unix(i64),
    DateTime(DateTime<Utc>),
    Iso8601(String),
}

impl From<i64> for TimeInput {
    fn from(value: i64) -> Self {
        TimeInput::Unix(value)
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimeInput::DateTime(value)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::Iso8601(value.to_owned())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        TimeInput::Iso8601(value)
    }
}

/// Convert any supported time shape to UNIX epoch seconds.
///
/// Strings may be RFC 3339, `YYYY-MM-DD HH:MM:SS` followed by a `+HH:MM`,
/// `+HHMM` or `+HH` offset, or a date-time without offset, which is taken as
/// UTC. Negative epochs, epochs outside chrono's range and anything else are
/// rejected.
pub fn to_unix_time(input: impl Into<TimeInput>) -> Result<i64> {
    let ts = match input.into() {
        TimeInput::Unix(ts) => ts,
        TimeInput::DateTime(dt) => dt.timestamp(),
        TimeInput::Iso8601(s) => parse_iso8601(&s)?,
    };

    if ts < 0 {
        return Err(Error::invalid(format!("UNIX time cannot be negative: {ts}")));
    }
    if DateTime::from_timestamp(ts, 0).is_none() {
        return Err(Error::invalid(format!("UNIX time out of range: {ts}")));
    }

    Ok(ts)
}

/// Render epoch seconds in the OWM ISO-8601 layout.
pub fn to_iso8601(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format(OWM_ISO8601_FORMAT).to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn parse_iso8601(s: &str) -> Result<i64> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(s, layout) {
            return Ok(dt.timestamp());
        }
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Ok(naive.and_utc().timestamp());
        }
    }

    Err(Error::invalid(format!("'{s}' is not an ISO-8601 timestamp")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn unix_input_passes_through() {
        assert_eq!(to_unix_time(1_234_567_i64).unwrap(), 1_234_567);
        assert_eq!(to_unix_time(0_i64).unwrap(), 0);
    }

    #[test]
    fn negative_unix_input_is_rejected() {
        let err = to_unix_time(-1_i64).unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn datetime_input_is_converted() {
        let dt = Utc.with_ymd_and_hms(2017, 9, 1, 10, 0, 0).unwrap();
        assert_eq!(to_unix_time(dt).unwrap(), 1_504_260_000);
    }

    #[test]
    fn owm_string_is_parsed() {
        assert_eq!(to_unix_time("2017-09-01 10:00:00+00:00").unwrap(), 1_504_260_000);
    }

    #[test]
    fn offsets_are_honored() {
        assert_eq!(to_unix_time("2017-09-01 12:00:00+02:00").unwrap(), 1_504_260_000);
        assert_eq!(to_unix_time("2017-09-01T10:00:00Z").unwrap(), 1_504_260_000);
    }

    #[test]
    fn hour_only_offset_is_accepted() {
        assert_eq!(to_unix_time("2017-09-01 10:00:00+00").unwrap(), 1_504_260_000);
        assert_eq!(to_unix_time("2017-09-01 12:00:00+02").unwrap(), 1_504_260_000);
        assert_eq!(to_unix_time("2017-09-01 12:00:00+0200").unwrap(), 1_504_260_000);
    }

    #[test]
    fn naive_strings_are_utc() {
        assert_eq!(to_unix_time("2017-09-01T10:00:00").unwrap(), 1_504_260_000);
        assert_eq!(to_unix_time("2017-09-01 10:00:00").unwrap(), 1_504_260_000);
    }

    #[test]
    fn garbage_string_is_rejected() {
        let err = to_unix_time("yesterday at noon").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn pre_epoch_string_is_rejected() {
        assert!(to_unix_time("1969-12-31 23:59:59+00:00").is_err());
    }

    #[test]
    fn renders_owm_layout() {
        assert_eq!(to_iso8601(1_504_260_000), "2017-09-01 10:00:00+00:00");
        assert_eq!(to_iso8601(0), "1970-01-01 00:00:00+00:00");
    }

    proptest! {
        #[test]
        fn iso8601_rendering_parses_back(ts in 0i64..4_102_444_800i64) {
            prop_assert_eq!(to_unix_time(to_iso8601(ts)).unwrap(), ts);
        }
    }
}
