//! Calendar zone used to turn UTC instants into calendar dates and back.

use crate::errors::{AppError, AppResult};
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Zone {
    /// Parse the `timezone` config value: `local`, `utc` or an offset like `+02:00`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let v = s.trim();
        match v.to_lowercase().as_str() {
            "" | "local" => return Ok(Zone::Local),
            "utc" | "z" => return Ok(Zone::Utc),
            _ => {}
        }

        let probe = format!("2000-01-01T00:00:00{v}");
        DateTime::parse_from_rfc3339(&probe)
            .map(|dt| Zone::Fixed(*dt.offset()))
            .map_err(|_| AppError::Config(format!("unknown timezone '{v}'")))
    }

    /// Wall-clock date/time of an instant.
    pub fn naive(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Local => ts.with_timezone(&Local).naive_local(),
            Zone::Utc => ts.naive_utc(),
            Zone::Fixed(off) => ts.with_timezone(off).naive_local(),
        }
    }

    /// Calendar date of an instant.
    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.naive(ts).date()
    }

    /// Wall-clock time of an instant.
    pub fn time_of(&self, ts: DateTime<Utc>) -> NaiveTime {
        self.naive(ts).time()
    }

    /// Instant for a wall-clock date/time. Ambiguous times resolve to the
    /// earliest instant; times skipped by a DST jump are rejected.
    pub fn to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Local => first(Local.from_local_datetime(&naive)),
            Zone::Utc => Some(Utc.from_utc_datetime(&naive)),
            Zone::Fixed(off) => first(off.from_local_datetime(&naive)),
        }
    }

    /// First instant of a calendar day.
    pub fn start_of_day(&self, d: NaiveDate) -> Option<DateTime<Utc>> {
        self.to_utc(d.and_hms_opt(0, 0, 0)?)
    }

    /// Last millisecond of a calendar day.
    pub fn end_of_day(&self, d: NaiveDate) -> Option<DateTime<Utc>> {
        self.to_utc(d.and_hms_milli_opt(23, 59, 59, 999)?)
    }
}

fn first<T: TimeZone>(r: LocalResult<DateTime<T>>) -> Option<DateTime<Utc>> {
    r.earliest().map(|dt| dt.with_timezone(&Utc))
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Utc => write!(f, "utc"),
            Zone::Fixed(off) => write!(f, "{off}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_values() {
        assert_eq!(Zone::parse("UTC").unwrap(), Zone::Utc);
        assert_eq!(Zone::parse("local").unwrap(), Zone::Local);
        let z = Zone::parse("+02:00").unwrap();
        assert_eq!(z, Zone::Fixed(FixedOffset::east_opt(7200).unwrap()));
        assert!(Zone::parse("Mars/Olympus").is_err());
    }

    #[test]
    fn fixed_offset_shifts_calendar_date() {
        let z = Zone::parse("-05:00").unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 2, 3, 0, 0).unwrap();
        assert_eq!(z.date_of(ts), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(Zone::Utc.date_of(ts), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn day_bounds_in_utc() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let start = Zone::Utc.start_of_day(d).unwrap();
        let end = Zone::Utc.end_of_day(d).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!((end - start).num_milliseconds(), 86_399_999);
    }
}
