//! Summary figures for a filtered record set.

use super::duration::{IntegrityAnomaly, measure_all};
use crate::models::record::Record;
use crate::utils::zone::Zone;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    /// Minutes across completed records.
    pub total_minutes: i64,
    /// Completed + open records.
    pub total_sessions: usize,
    /// Records still in progress (counted in `total_sessions` only).
    pub open_sessions: usize,
    /// Distinct calendar days with at least one completed record.
    pub days_worked: usize,
    pub locations_used: BTreeSet<String>,
    pub edited_count: usize,
    /// Records left out because of inconsistent timestamps.
    #[serde(skip)]
    pub anomalies: Vec<IntegrityAnomaly>,
}

impl Stats {
    pub fn locations_joined(&self) -> String {
        self.locations_used
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fold an already filtered record set into [`Stats`].
pub fn compute_stats(records: &[Record], zone: &Zone) -> Stats {
    let (measured, anomalies) = measure_all(records);
    for a in &anomalies {
        tracing::warn!(record_id = %a.record_id, reason = %a.reason, "excluding record with inconsistent timestamps");
    }

    let mut stats = Stats {
        total_sessions: measured.len(),
        ..Default::default()
    };
    let mut days = HashSet::new();

    for m in &measured {
        let r = m.record;

        if let Some(name) = r.location_label() {
            stats.locations_used.insert(name.to_string());
        }
        if r.is_edited() {
            stats.edited_count += 1;
        }

        match m.minutes {
            Some(minutes) => {
                stats.total_minutes += minutes;
                days.insert(zone.date_of(r.start));
            }
            None => stats.open_sessions += 1,
        }
    }

    stats.days_worked = days.len();
    stats.anomalies = anomalies;
    stats
}
