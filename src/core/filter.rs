//! Period filter.

use crate::models::period::Period;
use crate::models::record::Record;

/// Records whose clock-in lies inside the period (both ends included),
/// in input order.
pub fn filter_by_period(records: &[Record], period: &Period) -> Vec<Record> {
    records
        .iter()
        .filter(|r| period.contains(r.start))
        .cloned()
        .collect()
}

/// Borrowing variant of [`filter_by_period`].
pub fn filter_refs<'a>(records: &'a [Record], period: &Period) -> Vec<&'a Record> {
    records.iter().filter(|r| period.contains(r.start)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn keeps_records_on_both_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        let p = Period::new(start, end, None).unwrap();

        let records = vec![
            Record::new("before", "u", start - Duration::milliseconds(1), None),
            Record::new("first", "u", start, None),
            Record::new("mid", "u", start + Duration::days(3), None),
            Record::new("last", "u", end, None),
            Record::new("after", "u", end + Duration::seconds(1), None),
        ];

        let ids: Vec<String> = filter_by_period(&records, &p)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["first", "mid", "last"]);
    }

    #[test]
    fn subset_and_repeatable() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let p = Period::new(start, start + Duration::days(1), None).unwrap();
        let records: Vec<Record> = (0..48)
            .map(|h| Record::new(format!("r{h}"), "u", start + Duration::hours(h), None))
            .collect();

        let a = filter_by_period(&records, &p);
        let b = filter_by_period(&records, &p);
        assert_eq!(a, b);
        assert_eq!(a.len(), 25);
        assert!(a.iter().all(|r| records.contains(r) && p.contains(r.start)));
        assert_eq!(filter_refs(&records, &p).len(), 25);
    }
}
