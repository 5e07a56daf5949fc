use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Locations and records as delivered by the device pipeline.
fn create_records_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL,
            name        TEXT NOT NULL,
            address     TEXT NOT NULL DEFAULT '',
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            radius_m    REAL NOT NULL DEFAULT 100,
            active      INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_locations_owner_name ON locations(owner_id, name);

        CREATE TABLE IF NOT EXISTS records (
            id                 TEXT PRIMARY KEY,
            owner_id           TEXT NOT NULL,
            location_id        TEXT,
            start_at           TEXT NOT NULL,
            end_at             TEXT,
            location_name      TEXT,
            location_latitude  REAL,
            location_longitude REAL,
            sync_status        TEXT NOT NULL DEFAULT 'synced',
            edited_at          TEXT,
            edited_by          TEXT CHECK(edited_by IS NULL OR edited_by IN ('manual','geofence')),
            original_start     TEXT,
            original_end       TEXT,
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_records_owner_start ON records(owner_id, start_at);
        "#,
    )?;
    Ok(())
}

/// Idempotency keys for corrections.
fn create_corrections_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS corrections (
            request_id  TEXT PRIMARY KEY,
            record_id   TEXT NOT NULL,
            owner_id    TEXT NOT NULL,
            field       TEXT NOT NULL CHECK(field IN ('start','end')),
            value       TEXT NOT NULL,
            applied_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn add_edit_reason_column(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info('records')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "edit_reason" {
            return Ok(());
        }
    }

    conn.execute("ALTER TABLE records ADD COLUMN edit_reason TEXT", [])?;
    Ok(())
}

/// Idempotency keys belong to one owner: two owners may use the same key.
fn scope_corrections_by_owner(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE corrections_scoped (
            owner_id    TEXT NOT NULL,
            request_id  TEXT NOT NULL,
            record_id   TEXT NOT NULL,
            field       TEXT NOT NULL CHECK(field IN ('start','end')),
            value       TEXT NOT NULL,
            applied_at  TEXT NOT NULL,
            PRIMARY KEY (owner_id, request_id)
        );
        INSERT INTO corrections_scoped (owner_id, request_id, record_id, field, value, applied_at)
            SELECT owner_id, request_id, record_id, field, value, applied_at FROM corrections;
        DROP TABLE corrections;
        ALTER TABLE corrections_scoped RENAME TO corrections;
        "#,
    )?;
    Ok(())
}

type Migration = (&'static str, &'static str, fn(&Connection) -> Result<()>);

/// Ordered list of schema migrations: (version, description, step).
const MIGRATIONS: &[Migration] = &[
    (
        "20250301_0001_create_records",
        "Created locations and records tables",
        create_records_tables,
    ),
    (
        "20250315_0002_add_corrections",
        "Created corrections table",
        create_corrections_table,
    ),
    (
        "20250402_0003_add_edit_reason",
        "Added edit_reason to records",
        add_edit_reason_column,
    ),
    (
        "20250420_0004_scope_correction_keys",
        "Scoped correction request ids by owner",
        scope_corrections_by_owner,
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
///
/// Called by `db::initialize::init_db`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, description, step) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        conn.execute_batch("BEGIN IMMEDIATE;")?;
        // A concurrent process may have applied it while we waited for the lock.
        let outcome = if is_applied(conn, version)? {
            Ok(false)
        } else {
            step(conn).and_then(|_| {
                let now = chrono::Utc::now().to_rfc3339();
                conn.execute(
                    "INSERT INTO log (date, operation, target, message)
                     VALUES (?1, 'migration_applied', ?2, ?3)",
                    params![now, version, description],
                )?;
                Ok(true)
            })
        };

        match outcome {
            Ok(applied) => {
                conn.execute_batch("COMMIT;")?;
                if applied {
                    tracing::debug!(version, "migration applied");
                    success(format!("Migration applied: {version} → {description}"));
                }
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK;").ok();
                return Err(e);
            }
        }
    }

    Ok(())
}
