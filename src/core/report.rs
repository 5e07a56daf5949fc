//! Document model shared by every export format.

use crate::core::calculator::duration::measure_all;
use crate::core::calculator::stats::Stats;
use crate::models::period::Period;
use crate::models::record::Record;
use crate::utils::zone::Zone;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use crate::utils::formatting::format_minutes_to_hours;

pub const REPORT_TITLE: &str = "OnSite Timekeeper - Work Hours Report";

pub const DETAIL_HEADERS: [&str; 6] = [
    "Location", "Date", "Clock In", "Clock Out", "Duration", "Edited",
];

/// Whose hours the report covers.
#[derive(Debug, Clone, Default)]
pub struct Subject {
    pub display_name: Option<String>,
    /// Email or owner id; used when no display name is set.
    pub contact: String,
}

impl Subject {
    pub fn worker(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.contact)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Clock In")]
    pub clock_in: String,
    #[serde(rename = "Clock Out")]
    pub clock_out: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Edited")]
    pub edited: String,
}

impl DetailRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            self.location.as_str(),
            self.date.as_str(),
            self.clock_in.as_str(),
            self.clock_out.as_str(),
            self.duration.as_str(),
            self.edited.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub summary: Vec<SummaryLine>,
    pub rows: Vec<DetailRow>,
}

impl Report {
    pub fn summary_value(&self, label: &str) -> Option<&str> {
        self.summary
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

/// Assemble the report for `records` (already filtered to `period`).
///
/// Rows keep the input order. Records with inconsistent timestamps are left
/// out, the same way they are left out of `stats`.
pub fn build_report(
    subject: &Subject,
    period: &Period,
    records: &[Record],
    stats: &Stats,
    zone: &Zone,
    generated_at: DateTime<Utc>,
) -> Report {
    let line = |label: &'static str, value: String| SummaryLine { label, value };

    let summary = vec![
        line("Worker", subject.worker().to_string()),
        line("Period", period.bounds_label(zone)),
        line("Total Hours", format_minutes_to_hours(stats.total_minutes)),
        line("Days Worked", stats.days_worked.to_string()),
        line("Sessions", stats.total_sessions.to_string()),
        line("Locations", stats.locations_joined()),
        line("Edited Records", stats.edited_count.to_string()),
        line(
            "Generated",
            zone.naive(generated_at)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
    ];

    let (measured, _) = measure_all(records);
    let rows = measured
        .iter()
        .map(|m| {
            let r = m.record;
            DetailRow {
                location: r.location_label().unwrap_or("Unknown").to_string(),
                date: zone.date_of(r.start).format("%Y-%m-%d").to_string(),
                clock_in: zone.time_of(r.start).format("%H:%M").to_string(),
                clock_out: r
                    .end
                    .map(|e| zone.time_of(e).format("%H:%M").to_string())
                    .unwrap_or_else(|| "In progress".to_string()),
                duration: m
                    .minutes
                    .map(format_minutes_to_hours)
                    .unwrap_or_else(|| "-".to_string()),
                edited: if r.is_edited() { "Yes" } else { "No" }.to_string(),
            }
        })
        .collect();

    Report {
        title: REPORT_TITLE.to_string(),
        summary,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calculator::stats::compute_stats;
    use chrono::TimeZone;

    fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn subject() -> Subject {
        Subject {
            display_name: Some("Ana Silva".into()),
            contact: "ana@example.com".into(),
        }
    }

    #[test]
    fn single_completed_record() {
        let records = vec![
            Record::new("r1", "u1", at(1, 8, 0), Some(at(1, 16, 30))).with_location("l1", "Site A"),
        ];
        let period = Period::from_range("2024-03-01", &Zone::Utc).unwrap();
        let stats = compute_stats(&records, &Zone::Utc);
        let report = build_report(&subject(), &period, &records, &stats, &Zone::Utc, at(2, 9, 0));

        assert_eq!(report.title, REPORT_TITLE);
        assert_eq!(report.summary_value("Worker"), Some("Ana Silva"));
        assert_eq!(report.summary_value("Period"), Some("2024-03-01 - 2024-03-01"));
        assert_eq!(report.summary_value("Total Hours"), Some("8h 30min"));
        assert_eq!(report.summary_value("Days Worked"), Some("1"));
        assert_eq!(report.summary_value("Sessions"), Some("1"));
        assert_eq!(report.summary_value("Locations"), Some("Site A"));
        assert_eq!(report.summary_value("Edited Records"), Some("0"));
        assert_eq!(report.summary_value("Generated"), Some("2024-03-02 09:00:00"));

        assert_eq!(
            report.rows,
            vec![DetailRow {
                location: "Site A".into(),
                date: "2024-03-01".into(),
                clock_in: "08:00".into(),
                clock_out: "16:30".into(),
                duration: "8h 30min".into(),
                edited: "No".into(),
            }]
        );
    }

    #[test]
    fn open_record_and_missing_location() {
        let mut edited = Record::new("r2", "u1", at(2, 9, 0), Some(at(2, 10, 0)));
        edited.edited_at = Some(at(2, 11, 0));
        let records = vec![Record::new("r1", "u1", at(1, 8, 0), None), edited];
        let period = Period::from_range("2024-03", &Zone::Utc).unwrap();
        let stats = compute_stats(&records, &Zone::Utc);
        let report = build_report(&subject(), &period, &records, &stats, &Zone::Utc, at(3, 0, 0));

        let open = &report.rows[0];
        assert_eq!(open.location, "Unknown");
        assert_eq!(open.clock_out, "In progress");
        assert_eq!(open.duration, "-");
        assert_eq!(report.rows[1].edited, "Yes");
        assert_eq!(report.summary_value("Sessions"), Some("2"));
        assert_eq!(report.summary_value("Edited Records"), Some("1"));
        assert_eq!(report.summary_value("Total Hours"), Some("1h 0min"));
    }

    #[test]
    fn anomalous_records_are_left_out() {
        let records = vec![
            Record::new("bad", "u1", at(1, 10, 0), Some(at(1, 9, 0))),
            Record::new("ok", "u1", at(1, 8, 0), Some(at(1, 9, 0))),
        ];
        let period = Period::from_range("2024-03-01", &Zone::Utc).unwrap();
        let stats = compute_stats(&records, &Zone::Utc);
        let report = build_report(&subject(), &period, &records, &stats, &Zone::Utc, at(2, 0, 0));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.summary_value("Sessions"), Some("1"));
    }

    #[test]
    fn worker_falls_back_to_contact() {
        let s = Subject {
            display_name: Some("   ".into()),
            contact: "ana@example.com".into(),
        };
        assert_eq!(s.worker(), "ana@example.com");
    }

    #[test]
    fn detail_row_headers_match_serialized_names() {
        let row = DetailRow {
            location: "A".into(),
            date: "2024-03-01".into(),
            clock_in: "08:00".into(),
            clock_out: "09:00".into(),
            duration: "1h 0min".into(),
            edited: "No".into(),
        };
        let v = serde_json::to_value(&row).unwrap();
        for h in DETAIL_HEADERS {
            assert!(v.get(h).is_some(), "missing {h}");
        }
    }
}
