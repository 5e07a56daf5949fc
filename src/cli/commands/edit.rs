use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{CorrectionRequest, EditLogic};
use crate::errors::AppResult;
use crate::models::field::{FieldAudit, RecordField};
use crate::models::record::Record;
use crate::ui::messages::{info, success};
use crate::utils::zone::Zone;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        field,
        value,
        reason,
        request_id,
    } = cmd
    {
        let owner = cfg.require_owner()?;
        let zone = cfg.zone()?;
        let mut pool = open_store(cfg)?;

        let request = CorrectionRequest {
            record_id: id,
            field,
            value,
            reason: reason.as_deref(),
            request_id: request_id.as_deref(),
        };

        let updated = EditLogic::correct(&mut pool, owner, &request, &zone, Utc::now())?;

        success(format!("Record {} updated", updated.id));
        print_audit(&updated, &zone);
    }

    Ok(())
}

fn print_audit(r: &Record, zone: &Zone) {
    let fmt = |ts: chrono::DateTime<Utc>| zone.naive(ts).format("%Y-%m-%d %H:%M").to_string();

    for field in [RecordField::Start, RecordField::End] {
        let current = r
            .value(field)
            .map(fmt)
            .unwrap_or_else(|| "In progress".to_string());
        match r.audit(field) {
            FieldAudit::Edited { original } => {
                info(format!("{:<5} {current}  (original {})", field.as_str(), fmt(original)))
            }
            FieldAudit::Unedited => info(format!("{:<5} {current}", field.as_str())),
        }
    }
    if let Some(reason) = &r.edit_reason {
        info(format!("reason {reason}"));
    }
}
