//! Audit-preserving correction of clock-in / clock-out timestamps.

use crate::db::store::{Correction, CorrectionValue, RecordStore};
use crate::errors::{AppError, AppResult};
use crate::models::field::RecordField;
use crate::models::record::Record;
use crate::utils::time::{TimestampInput, parse_timestamp};
use crate::utils::zone::Zone;
use chrono::{DateTime, Utc};

/// A correction as received from the caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct CorrectionRequest<'a> {
    pub record_id: &'a str,
    pub field: &'a str,
    pub value: &'a str,
    pub reason: Option<&'a str>,
    pub request_id: Option<&'a str>,
}

/// High-level business logic for the `edit` command.
pub struct EditLogic;

impl EditLogic {
    /// Correct one field of one record and return the stored result.
    ///
    /// The first correction of a field preserves its previous value in
    /// `original_<field>`; later corrections only move the live value.
    /// Every correction marks the record as manually edited at `now`.
    pub fn correct<S>(
        store: &mut S,
        owner_id: &str,
        req: &CorrectionRequest<'_>,
        zone: &Zone,
        now: DateTime<Utc>,
    ) -> AppResult<Record>
    where
        S: RecordStore + ?Sized,
    {
        let record_id = req.record_id.trim();
        if record_id.is_empty() {
            return Err(AppError::InvalidInput("missing record id".into()));
        }

        let field = RecordField::parse(req.field)
            .ok_or_else(|| AppError::InvalidField(req.field.to_string()))?;

        if req.value.trim().is_empty() {
            return Err(AppError::EmptyValue(field.as_str().to_string()));
        }

        // a bare clock time is anchored by the store, under its write lock
        let value = match parse_timestamp(req.value, zone)? {
            TimestampInput::Instant(ts) => CorrectionValue::At(ts),
            TimestampInput::TimeOfDay(time) => CorrectionValue::TimeOfDay { time, zone: *zone },
        };

        let correction = Correction {
            field,
            value,
            reason: non_blank(req.reason),
            request_id: non_blank(req.request_id),
            at: now,
        };

        let updated = store.update_record_field(record_id, owner_id, &correction)?;

        tracing::info!(
            record_id,
            field = field.as_str(),
            value = ?updated.value(field),
            "record corrected"
        );

        Ok(updated)
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
