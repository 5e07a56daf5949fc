use crate::errors::{AppError, AppResult};
use crate::models::edited_by::EditedBy;
use crate::models::field::RecordField;
use crate::models::location::Location;
use crate::models::record::Record;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const RECORD_COLUMNS: &str = "id, owner_id, location_id, start_at, end_at, location_name,
     location_latitude, location_longitude, sync_status, edited_at, edited_by,
     original_start, original_end, edit_reason, created_at, updated_at";

/// Timestamps are stored as fixed-width RFC3339 UTC so that text
/// comparison in SQL matches time order.
pub fn ts_to_db(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn ts_from_db(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

fn get_ts(row: &Row, col: usize) -> Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    ts_from_db(&raw).ok_or_else(|| conversion_error(col, AppError::InvalidTimestamp(raw)))
}

fn get_opt_ts(row: &Row, col: usize) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    match raw {
        None => Ok(None),
        Some(s) => ts_from_db(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(col, AppError::InvalidTimestamp(s))),
    }
}

/// Mapping DB → Record (column order of `RECORD_COLUMNS`).
pub fn map_record(row: &Row) -> Result<Record> {
    let edited_by_raw: Option<String> = row.get(10)?;
    let edited_by = EditedBy::from_db_str(edited_by_raw.as_deref()).ok_or_else(|| {
        conversion_error(
            10,
            AppError::InvalidInput(format!("edited_by {:?}", edited_by_raw)),
        )
    })?;

    Ok(Record {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        location_id: row.get(2)?,
        start: get_ts(row, 3)?,
        end: get_opt_ts(row, 4)?,
        location_name: row.get(5)?,
        location_latitude: row.get(6)?,
        location_longitude: row.get(7)?,
        sync_status: row.get(8)?,
        edited_at: get_opt_ts(row, 9)?,
        edited_by,
        original_start: get_opt_ts(row, 11)?,
        original_end: get_opt_ts(row, 12)?,
        edit_reason: row.get(13)?,
        created_at: get_ts(row, 14)?,
        updated_at: get_ts(row, 15)?,
    })
}

/// Rows that cannot be decoded are skipped; everything else propagates.
fn is_corrupted_row(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

/// Records of an owner, newest first, optionally only those starting at or
/// after `since`.
pub fn list_records(
    conn: &Connection,
    owner_id: &str,
    since: Option<DateTime<Utc>>,
) -> AppResult<Vec<Record>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records
         WHERE owner_id = ?1 AND (?2 IS NULL OR start_at >= ?2)
         ORDER BY start_at DESC, id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![owner_id, since.map(ts_to_db)], map_record)?;

    let mut out = Vec::new();
    for r in rows {
        match r {
            Ok(rec) => out.push(rec),
            Err(e) if is_corrupted_row(&e) => {
                tracing::warn!(owner_id, error = %e, "skipping unreadable record row");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

/// Record by id, only when owned by `owner_id`.
pub fn find_record(conn: &Connection, id: &str, owner_id: &str) -> AppResult<Option<Record>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1 AND owner_id = ?2");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt
        .query_row(params![id, owner_id], map_record)
        .optional()?)
}

/// Insert a record coming from the device pipeline. Existing ids are left
/// untouched; returns whether a row was written.
pub fn insert_record(conn: &Connection, r: &Record) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO records (id, owner_id, location_id, start_at, end_at,
             location_name, location_latitude, location_longitude, sync_status,
             edited_at, edited_by, original_start, original_end, edit_reason,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            r.id,
            r.owner_id,
            r.location_id,
            ts_to_db(r.start),
            r.end.map(ts_to_db),
            r.location_name,
            r.location_latitude,
            r.location_longitude,
            r.sync_status,
            r.edited_at.map(ts_to_db),
            r.edited_by.to_db_str(),
            r.original_start.map(ts_to_db),
            r.original_end.map(ts_to_db),
            r.edit_reason,
            ts_to_db(r.created_at),
            ts_to_db(r.updated_at),
        ],
    )?;
    Ok(n == 1)
}

/// Overwrite the live value of `field`, capturing the previous value into
/// `original_<field>` only when that column is still NULL. Returns the
/// number of rows touched (0 = not found / not owned).
pub fn apply_correction(
    conn: &Connection,
    id: &str,
    owner_id: &str,
    field: RecordField,
    value: DateTime<Utc>,
    reason: Option<&str>,
    at: DateTime<Utc>,
) -> AppResult<usize> {
    let col = field.column();
    let orig = field.original_column();
    let sql = format!(
        "UPDATE records
         SET {orig} = COALESCE({orig}, {col}),
             {col} = ?1,
             edited_at = ?2,
             edited_by = 'manual',
             edit_reason = COALESCE(?3, edit_reason),
             updated_at = ?2
         WHERE id = ?4 AND owner_id = ?5"
    );

    Ok(conn.execute(
        &sql,
        params![ts_to_db(value), ts_to_db(at), reason, id, owner_id],
    )?)
}

/// A correction already applied under an idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRow {
    pub request_id: String,
    pub record_id: String,
    pub owner_id: String,
    pub field: String,
    pub value: String,
}

/// Keys are looked up within one owner only.
pub fn find_correction(
    conn: &Connection,
    owner_id: &str,
    request_id: &str,
) -> AppResult<Option<CorrectionRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT request_id, record_id, owner_id, field, value
         FROM corrections WHERE owner_id = ?1 AND request_id = ?2",
    )?;
    Ok(stmt
        .query_row([owner_id, request_id], |row| {
            Ok(CorrectionRow {
                request_id: row.get(0)?,
                record_id: row.get(1)?,
                owner_id: row.get(2)?,
                field: row.get(3)?,
                value: row.get(4)?,
            })
        })
        .optional()?)
}

pub fn insert_correction(
    conn: &Connection,
    row: &CorrectionRow,
    applied_at: DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO corrections (request_id, record_id, owner_id, field, value, applied_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            row.request_id,
            row.record_id,
            row.owner_id,
            row.field,
            row.value,
            ts_to_db(applied_at)
        ],
    )?;
    Ok(())
}

fn map_location(row: &Row) -> Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        radius_m: row.get(6)?,
        active: row.get::<_, i32>(7)? == 1,
        created_at: get_ts(row, 8)?,
        updated_at: get_ts(row, 9)?,
    })
}

/// Locations of an owner ordered by name.
pub fn list_locations(conn: &Connection, owner_id: &str) -> AppResult<Vec<Location>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, owner_id, name, address, latitude, longitude, radius_m, active,
                created_at, updated_at
         FROM locations
         WHERE owner_id = ?1
         ORDER BY name ASC, id ASC",
    )?;
    let rows = stmt.query_map([owner_id], map_location)?;

    let mut out = Vec::new();
    for r in rows {
        match r {
            Ok(loc) => out.push(loc),
            Err(e) if is_corrupted_row(&e) => {
                tracing::warn!(owner_id, error = %e, "skipping unreadable location row");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

pub fn insert_location(conn: &Connection, l: &Location) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO locations (id, owner_id, name, address, latitude, longitude,
             radius_m, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            l.id,
            l.owner_id,
            l.name,
            l.address,
            l.latitude,
            l.longitude,
            l.radius_m,
            if l.active { 1 } else { 0 },
            ts_to_db(l.created_at),
            ts_to_db(l.updated_at),
        ],
    )?;
    Ok(n == 1)
}
