use crate::errors::{AppError, AppResult};
use crate::utils::date::{days_between, parse_range};
use crate::utils::zone::Zone;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Time window a view or report is scoped to.
///
/// Both bounds are included: a record starting exactly at `end` belongs to
/// the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: Option<String>,
}

impl Period {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        label: Option<String>,
    ) -> AppResult<Self> {
        if end < start {
            return Err(AppError::InvalidRange(format!(
                "period end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end, label })
    }

    /// Rolling window ending at `now` (dashboard default: 7 days).
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(i64::from(days)),
            end: now,
            label: Some(format!("Last {days} days")),
        }
    }

    /// Whole calendar days, from the first instant of `first` to the last
    /// millisecond of `last`.
    pub fn from_dates(
        first: NaiveDate,
        last: NaiveDate,
        zone: &Zone,
        label: Option<String>,
    ) -> AppResult<Self> {
        let start = zone
            .start_of_day(first)
            .ok_or_else(|| AppError::InvalidDate(first.to_string()))?;
        let end = zone
            .end_of_day(last)
            .ok_or_else(|| AppError::InvalidDate(last.to_string()))?;
        Self::new(start, end, label)
    }

    /// Build a period from a range expression (`2024`, `2024-03`,
    /// `2024-03-01:2024-03-07`, ...).
    pub fn from_range(expr: &str, zone: &Zone) -> AppResult<Self> {
        let (first, last) = parse_range(expr)?;
        Self::from_dates(first, last, zone, Some(range_label(expr, first, last)))
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }

    pub fn first_day(&self, zone: &Zone) -> NaiveDate {
        zone.date_of(self.start)
    }

    pub fn last_day(&self, zone: &Zone) -> NaiveDate {
        zone.date_of(self.end)
    }

    /// Every calendar day touched by the period.
    pub fn days(&self, zone: &Zone) -> Vec<NaiveDate> {
        days_between(self.first_day(zone), self.last_day(zone))
    }

    /// `YYYY-MM-DD - YYYY-MM-DD`
    pub fn bounds_label(&self, zone: &Zone) -> String {
        format!(
            "{} - {}",
            self.first_day(zone).format("%Y-%m-%d"),
            self.last_day(zone).format("%Y-%m-%d")
        )
    }

    pub fn display_label(&self, zone: &Zone) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.bounds_label(zone))
    }
}

fn range_label(expr: &str, first: NaiveDate, last: NaiveDate) -> String {
    let e = expr.trim();
    if e.contains(':') {
        return format!("{} to {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"));
    }
    match e.len() {
        4 => format!("Year {e}"),
        7 => first.format("%B %Y").to_string(),
        _ => first.format("%Y-%m-%d").to_string(),
    }
}
