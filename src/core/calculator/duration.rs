//! Elapsed time of a single record.

use crate::models::record::Record;
use std::fmt;

const MS_PER_MINUTE: i64 = 60_000;

/// A record whose timestamps cannot be turned into a duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityAnomaly {
    pub record_id: String,
    pub reason: String,
}

impl fmt::Display for IntegrityAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.record_id, self.reason)
    }
}

/// Minutes between clock-in and clock-out, rounded half-up.
///
/// `Ok(None)` while the session is open. A clock-out earlier than the
/// clock-in is reported as an anomaly instead of a negative value.
pub fn duration_minutes(r: &Record) -> Result<Option<i64>, IntegrityAnomaly> {
    let Some(end) = r.end else {
        return Ok(None);
    };

    let ms = (end - r.start).num_milliseconds();
    if ms < 0 {
        return Err(IntegrityAnomaly {
            record_id: r.id.clone(),
            reason: format!(
                "clock-out {} is before clock-in {}",
                end.to_rfc3339(),
                r.start.to_rfc3339()
            ),
        });
    }

    Ok(Some((ms + MS_PER_MINUTE / 2) / MS_PER_MINUTE))
}

/// A record paired with its duration (None while open).
#[derive(Debug, Clone, Copy)]
pub struct Measured<'a> {
    pub record: &'a Record,
    pub minutes: Option<i64>,
}

/// Measure every record, setting aside the ones with inconsistent
/// timestamps. Silent: `compute_stats` is the one place that logs them.
pub fn measure_all(records: &[Record]) -> (Vec<Measured<'_>>, Vec<IntegrityAnomaly>) {
    let mut ok = Vec::with_capacity(records.len());
    let mut anomalies = Vec::new();

    for record in records {
        match duration_minutes(record) {
            Ok(minutes) => ok.push(Measured { record, minutes }),
            Err(a) => anomalies.push(a),
        }
    }

    (ok, anomalies)
}

/// Minutes → hours, rounded to two decimals.
pub fn duration_hours(minutes: i64) -> f64 {
    round2(minutes as f64 / 60.0)
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
