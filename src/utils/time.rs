//! Time utilities: parsing user supplied timestamps and clock times.

use crate::errors::{AppError, AppResult};
use crate::utils::zone::Zone;
use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};

/// A timestamp as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampInput {
    /// Fully qualified instant.
    Instant(DateTime<Utc>),
    /// Clock time only; the calendar date comes from the value being edited.
    TimeOfDay(NaiveTime),
}

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

/// Accepts RFC3339 (`2024-03-01T08:15:00Z`), local date-times
/// (`2024-03-01 08:15`, `2024-03-01T08:15:30`) and bare clock times (`08:15`).
pub fn parse_timestamp(s: &str, zone: &Zone) -> AppResult<TimestampInput> {
    let v = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Ok(TimestampInput::Instant(dt.with_timezone(&Utc)));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(v, fmt) {
            return zone
                .to_utc(naive)
                .map(TimestampInput::Instant)
                .ok_or_else(|| AppError::InvalidTimestamp(format!("{v} does not exist in {zone}")));
        }
    }

    parse_time(v)
        .map(TimestampInput::TimeOfDay)
        .ok_or_else(|| AppError::InvalidTimestamp(v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_with_offset() {
        let got = parse_timestamp("2024-03-01T10:15:00+02:00", &Zone::Utc).unwrap();
        assert_eq!(
            got,
            TimestampInput::Instant(Utc.with_ymd_and_hms(2024, 3, 1, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn local_datetime_uses_zone() {
        let zone = Zone::parse("-05:00").unwrap();
        let got = parse_timestamp("2024-03-01 08:15", &zone).unwrap();
        assert_eq!(
            got,
            TimestampInput::Instant(Utc.with_ymd_and_hms(2024, 3, 1, 13, 15, 0).unwrap())
        );
    }

    #[test]
    fn bare_clock_time() {
        assert_eq!(
            parse_timestamp("08:15", &Zone::Utc).unwrap(),
            TimestampInput::TimeOfDay(NaiveTime::from_hms_opt(8, 15, 0).unwrap())
        );
    }

    #[test]
    fn garbage_is_invalid_timestamp() {
        let err = parse_timestamp("quarter past eight", &Zone::Utc).unwrap_err();
        assert!(matches!(err, AppError::InvalidTimestamp(_)));
        assert!(parse_timestamp("25:00", &Zone::Utc).is_err());
    }
}
