//! Record store contract and its SQLite implementation.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{self, CorrectionRow, ts_to_db};
use crate::errors::{AppError, AppResult};
use crate::models::field::RecordField;
use crate::models::location::Location;
use crate::models::record::Record;
use crate::utils::zone::Zone;
use chrono::{DateTime, NaiveTime, Utc};
use rusqlite::TransactionBehavior;

/// New value of a corrected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionValue {
    At(DateTime<Utc>),
    /// Clock time on the calendar date (in `zone`) of the field's stored
    /// value, or of `start` when the field is empty. Resolved against the
    /// row read under the write lock.
    TimeOfDay { time: NaiveTime, zone: Zone },
}

impl CorrectionValue {
    pub fn resolve(&self, current: &Record, field: RecordField) -> AppResult<DateTime<Utc>> {
        match *self {
            CorrectionValue::At(ts) => Ok(ts),
            CorrectionValue::TimeOfDay { time, zone } => {
                let anchor = current.value(field).unwrap_or(current.start);
                zone.to_utc(zone.date_of(anchor).and_time(time)).ok_or_else(|| {
                    AppError::InvalidTimestamp(format!("{} does not exist in {zone}", time.format("%H:%M")))
                })
            }
        }
    }
}

/// A validated single-field correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub field: RecordField,
    pub value: CorrectionValue,
    pub reason: Option<String>,
    /// Idempotency key; replays with the same key are no-ops.
    pub request_id: Option<String>,
    /// Time stamped into `edited_at`.
    pub at: DateTime<Utc>,
}

/// What the aggregation and edit logic need from durable storage.
///
/// Every call is scoped to one owner: records of other owners behave as if
/// they did not exist.
pub trait RecordStore {
    fn list_records(
        &mut self,
        owner_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Record>>;

    fn list_locations(&mut self, owner_id: &str) -> AppResult<Vec<Location>>;

    fn get_record(&mut self, id: &str, owner_id: &str) -> AppResult<Record>;

    /// Apply a correction atomically: the field write, the audit stamp and
    /// the one-time capture of the original value succeed or fail together.
    fn update_record_field(
        &mut self,
        id: &str,
        owner_id: &str,
        correction: &Correction,
    ) -> AppResult<Record>;
}

impl RecordStore for DbPool {
    fn list_records(
        &mut self,
        owner_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Record>> {
        queries::list_records(&self.conn, owner_id, since)
    }

    fn list_locations(&mut self, owner_id: &str) -> AppResult<Vec<Location>> {
        queries::list_locations(&self.conn, owner_id)
    }

    fn get_record(&mut self, id: &str, owner_id: &str) -> AppResult<Record> {
        queries::find_record(&self.conn, id, owner_id)?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    fn update_record_field(
        &mut self,
        id: &str,
        owner_id: &str,
        c: &Correction,
    ) -> AppResult<Record> {
        // IMMEDIATE takes the write lock up front, so the read below and the
        // conditional update see the same row state.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = queries::find_record(&tx, id, owner_id)?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        let value = c.value.resolve(&current, c.field)?;

        let key = c.request_id.as_ref().map(|request_id| CorrectionRow {
            request_id: request_id.clone(),
            record_id: id.to_string(),
            owner_id: owner_id.to_string(),
            field: c.field.as_str().to_string(),
            value: ts_to_db(value),
        });

        if let Some(key) = &key
            && let Some(prev) = queries::find_correction(&tx, owner_id, &key.request_id)?
        {
            if &prev == key {
                tracing::debug!(request_id = %key.request_id, record_id = id, "correction replay ignored");
                return Ok(current);
            }
            return Err(AppError::InvalidInput(format!(
                "request id '{}' was already used for a different correction",
                key.request_id
            )));
        }

        current
            .check_correction(c.field, value)
            .map_err(AppError::InvalidInput)?;

        let touched = queries::apply_correction(
            &tx,
            id,
            owner_id,
            c.field,
            value,
            c.reason.as_deref(),
            c.at,
        )?;
        if touched == 0 {
            return Err(AppError::NotFound(id.to_string()));
        }

        if let Some(key) = &key {
            queries::insert_correction(&tx, key, c.at)?;
        }

        let previous = current.value(c.field).map(ts_to_db).unwrap_or_default();
        ttlog(
            &tx,
            "edit",
            id,
            &format!(
                "{} {} → {}{}",
                c.field.as_str(),
                previous,
                ts_to_db(value),
                c.reason
                    .as_deref()
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default()
            ),
        )?;

        let updated = queries::find_record(&tx, id, owner_id)?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        tx.commit()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::insert_record;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn correction(field: RecordField, value: DateTime<Utc>, key: Option<&str>) -> Correction {
        Correction {
            field,
            value: CorrectionValue::At(value),
            reason: None,
            request_id: key.map(str::to_string),
            at: at(18, 0),
        }
    }

    fn seeded() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        insert_record(&pool.conn, &Record::new("r1", "u1", at(8, 0), Some(at(16, 30)))).unwrap();
        insert_record(&pool.conn, &Record::new("open", "u1", at(9, 0), None)).unwrap();
        pool
    }

    #[test]
    fn not_found_and_not_owned_look_the_same() {
        let mut pool = seeded();
        let missing = pool.get_record("nope", "u1").unwrap_err();
        let foreign = pool.get_record("r1", "u2").unwrap_err();
        assert_eq!(missing.to_string(), "Record not found: nope");
        assert!(matches!(foreign, AppError::NotFound(_)));

        let err = pool
            .update_record_field("r1", "u2", &correction(RecordField::Start, at(8, 15), None))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn replay_with_same_key_is_a_no_op() {
        let mut pool = seeded();
        let c = correction(RecordField::End, at(17, 0), Some("req-1"));
        let first = pool.update_record_field("r1", "u1", &c).unwrap();
        let again = pool.update_record_field("r1", "u1", &c).unwrap();
        assert_eq!(first, again);
        assert_eq!(again.original_end, Some(at(16, 30)));

        let edits: i64 = pool
            .conn
            .query_row("SELECT COUNT(*) FROM log WHERE operation = 'edit'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(edits, 1);
    }

    #[test]
    fn reused_key_with_other_payload_is_rejected() {
        let mut pool = seeded();
        pool.update_record_field("r1", "u1", &correction(RecordField::End, at(17, 0), Some("k")))
            .unwrap();
        let err = pool
            .update_record_field("r1", "u1", &correction(RecordField::End, at(17, 5), Some("k")))
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn request_ids_are_scoped_to_the_owner() {
        let mut pool = seeded();
        insert_record(&pool.conn, &Record::new("b", "u2", at(9, 0), Some(at(12, 0)))).unwrap();

        pool.update_record_field("r1", "u1", &correction(RecordField::End, at(17, 0), Some("k")))
            .unwrap();
        let theirs = pool
            .update_record_field("b", "u2", &correction(RecordField::End, at(12, 30), Some("k")))
            .unwrap();
        assert_eq!(theirs.end, Some(at(12, 30)));
        assert_eq!(theirs.original_end, Some(at(12, 0)));

        // each owner's replay still resolves against its own key
        let mine = pool
            .update_record_field("r1", "u1", &correction(RecordField::End, at(17, 0), Some("k")))
            .unwrap();
        assert_eq!(mine.end, Some(at(17, 0)));
        assert!(queries::find_correction(&pool.conn, "u3", "k").unwrap().is_none());
    }

    #[test]
    fn time_of_day_uses_the_locked_row_date() {
        let mut pool = seeded();
        let c = Correction {
            field: RecordField::End,
            value: CorrectionValue::TimeOfDay {
                time: NaiveTime::from_hms_opt(17, 15, 0).unwrap(),
                zone: Zone::Utc,
            },
            reason: None,
            request_id: None,
            at: at(18, 0),
        };
        let r = pool.update_record_field("r1", "u1", &c).unwrap();
        assert_eq!(r.end, Some(at(17, 15)));
    }

    #[test]
    fn invalid_ordering_rolls_back() {
        let mut pool = seeded();
        let err = pool
            .update_record_field("r1", "u1", &correction(RecordField::End, at(7, 0), Some("k2")))
            .unwrap_err();
        assert!(err.is_invalid_input());

        let r = pool.get_record("r1", "u1").unwrap();
        assert_eq!(r.end, Some(at(16, 30)));
        assert!(!r.is_edited());
        assert!(queries::find_correction(&pool.conn, "u1", "k2").unwrap().is_none());
    }

    #[test]
    fn open_record_end_cannot_be_corrected() {
        let mut pool = seeded();
        let err = pool
            .update_record_field("open", "u1", &correction(RecordField::End, at(17, 0), None))
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
