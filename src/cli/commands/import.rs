use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::ImportLogic;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let owner = cfg.require_owner()?;
        let data = ImportLogic::read_file(&expand_tilde(file))?;
        let mut pool = open_store(cfg)?;

        let summary = ImportLogic::import(&mut pool, owner, data)?;

        success(format!(
            "Imported {} records and {} locations",
            summary.records_added, summary.locations_added
        ));
        if summary.duplicates > 0 {
            warning(format!("{} already present, left unchanged", summary.duplicates));
        }
        if summary.foreign > 0 {
            warning(format!("{} belong to another owner, skipped", summary.foreign));
        }
    }

    Ok(())
}
