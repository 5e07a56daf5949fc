//! Hours-by-day series used by the chart view.

use super::duration::{duration_hours, measure_all, round2};
use crate::models::period::Period;
use crate::models::record::Record;
use crate::utils::zone::Zone;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub hours: f64,
    /// Short axis label, e.g. `Fri 1`.
    pub label: String,
}

/// One entry per calendar day of the period, zero when nothing was worked.
///
/// Completed records add `minutes / 60` (two decimals) to the day their
/// clock-in falls on. Output is sorted by date.
pub fn daily_series(records: &[Record], period: &Period, zone: &Zone) -> Vec<DailyEntry> {
    let mut buckets: BTreeMap<NaiveDate, f64> =
        period.days(zone).into_iter().map(|d| (d, 0.0)).collect();

    let (measured, _) = measure_all(records);

    for m in measured {
        let Some(minutes) = m.minutes else {
            continue;
        };
        if let Some(h) = buckets.get_mut(&zone.date_of(m.record.start)) {
            *h += duration_hours(minutes);
        }
    }

    buckets
        .into_iter()
        .map(|(date, hours)| DailyEntry {
            date,
            hours: round2(hours),
            label: date.format("%a %-d").to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::stats::compute_stats;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn single_empty_day() {
        let p = Period::from_range("2024-03-01", &Zone::Utc).unwrap();
        let s = daily_series(&[], &p, &Zone::Utc);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].hours, 0.0);
        assert_eq!(s[0].label, "Fri 1");
    }

    #[test]
    fn dense_and_sorted() {
        let p = Period::from_range("2024-03-01:2024-03-07", &Zone::Utc).unwrap();
        let records = vec![
            Record::new("c", "u", at(5, 8, 0), Some(at(5, 12, 0))),
            Record::new("a", "u", at(1, 8, 0), Some(at(1, 16, 30))),
            Record::new("b", "u", at(1, 17, 0), Some(at(1, 17, 20))),
            Record::new("open", "u", at(6, 8, 0), None),
        ];

        let s = daily_series(&records, &p, &Zone::Utc);
        assert_eq!(s.len(), 7);
        assert!(s.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(s[0].hours, 8.83); // 8.5 + 0.33
        assert_eq!(s[4].hours, 4.0);
        assert_eq!(s[5].hours, 0.0);
    }

    #[test]
    fn series_sums_to_total_hours() {
        let p = Period::from_range("2024-03-01:2024-03-10", &Zone::Utc).unwrap();
        let records: Vec<Record> = (1..=9)
            .map(|d| Record::new(format!("r{d}"), "u", at(d, 8, 0), Some(at(d, 8 + d, 5 * d))))
            .collect();

        let total = compute_stats(&records, &Zone::Utc).total_minutes as f64 / 60.0;
        let sum: f64 = daily_series(&records, &p, &Zone::Utc)
            .iter()
            .map(|e| e.hours)
            .sum();
        assert_eq!(daily_series(&records, &p, &Zone::Utc).len(), 10);
        assert!((sum - total).abs() < 0.01 * records.len() as f64);
    }

    #[test]
    fn anomalies_do_not_reach_buckets() {
        let p = Period::from_range("2024-03-01", &Zone::Utc).unwrap();
        let records = vec![Record::new("bad", "u", at(1, 12, 0), Some(at(1, 8, 0)))];
        let s = daily_series(&records, &p, &Zone::Utc);
        assert_eq!(s[0].hours, 0.0);
    }
}
