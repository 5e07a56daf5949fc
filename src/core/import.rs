//! Loading device-pipeline data (locations + records) into the store.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_location, insert_record};
use crate::errors::{AppError, AppResult};
use crate::models::location::Location;
use crate::models::record::Record;
use rusqlite::TransactionBehavior;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Payload accepted by `import`: the same shape the pipeline syncs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ImportData {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub locations_added: usize,
    pub records_added: usize,
    /// Already present ids; existing rows are never overwritten.
    pub duplicates: usize,
    /// Rows belonging to another owner.
    pub foreign: usize,
}

pub struct ImportLogic;

impl ImportLogic {
    pub fn read_file(path: &Path) -> AppResult<ImportData> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::InvalidInput(format!("{}: {e}", path.display())))
    }

    /// Insert everything owned by `owner_id` in one transaction. Rows with
    /// an empty owner are adopted; rows of other owners are skipped.
    pub fn import(pool: &mut DbPool, owner_id: &str, data: ImportData) -> AppResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for mut loc in data.locations {
            if !adopt(&mut loc.owner_id, owner_id) {
                tracing::warn!(location_id = %loc.id, "skipping location of another owner");
                summary.foreign += 1;
                continue;
            }
            if insert_location(&tx, &loc)? {
                summary.locations_added += 1;
            } else {
                summary.duplicates += 1;
            }
        }

        for mut rec in data.records {
            if !adopt(&mut rec.owner_id, owner_id) {
                tracing::warn!(record_id = %rec.id, "skipping record of another owner");
                summary.foreign += 1;
                continue;
            }
            if let Some(end) = rec.end
                && end < rec.start
            {
                // kept as delivered; aggregation reports it as an anomaly
                tracing::warn!(record_id = %rec.id, "imported record ends before it starts");
            }
            if insert_record(&tx, &rec)? {
                summary.records_added += 1;
            } else {
                summary.duplicates += 1;
            }
        }

        ttlog(
            &tx,
            "import",
            owner_id,
            &format!(
                "{} records, {} locations ({} duplicates, {} foreign)",
                summary.records_added, summary.locations_added, summary.duplicates, summary.foreign
            ),
        )?;

        tx.commit()?;
        Ok(summary)
    }
}

fn adopt(row_owner: &mut String, owner_id: &str) -> bool {
    if row_owner.trim().is_empty() {
        *row_owner = owner_id.to_string();
    }
    row_owner.as_str() == owner_id
}
