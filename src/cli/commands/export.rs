use crate::cli::commands::load_view;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::stats::compute_stats;
use crate::core::report::{Subject, build_report};
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::export::{default_file_name, ensure_writable, write_report};
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let (pool, view) = load_view(cfg, range)?;
        let stats = compute_stats(&view.records, &view.zone);

        if view.records.is_empty() {
            warning("No records in the selected period: the report will be empty.");
        }

        let subject = Subject {
            display_name: cfg.display_name.clone(),
            contact: cfg.email.clone().unwrap_or_else(|| view.owner.clone()),
        };
        let report = build_report(
            &subject,
            &view.period,
            &view.records,
            &stats,
            &view.zone,
            Utc::now(),
        );

        let path = match file {
            Some(f) => expand_tilde(f),
            None => default_file_name(&view.period, &view.zone, *format),
        };

        ensure_writable(&path, *force)?;
        write_report(&report, *format, &path)?;

        if let Err(e) = ttlog(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!(
                "{} rows as {} ({})",
                report.rows.len(),
                format.as_str(),
                view.period.bounds_label(&view.zone)
            ),
        ) {
            tracing::warn!(error = %e, "failed to write internal log");
        }
    }

    Ok(())
}
