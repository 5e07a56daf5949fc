use crate::cli::commands::load_view;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::stats::compute_stats;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::{bold, format_minutes_to_hours, pad_right};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { range } = cmd {
        let (_pool, view) = load_view(cfg, range)?;
        let stats = compute_stats(&view.records, &view.zone);

        header(format!(
            "Stats - {} ({})",
            view.period.display_label(&view.zone),
            view.period.bounds_label(&view.zone)
        ));

        let card = |label: &str, value: String, subtitle: Option<String>| {
            let sub = subtitle
                .map(|s| format!("  {GREY}{s}{RESET}"))
                .unwrap_or_default();
            println!("{} {}{}", pad_right(label, 14), bold(&value), sub);
        };

        card(
            "Total Hours",
            format_minutes_to_hours(stats.total_minutes),
            (stats.open_sessions > 0).then(|| format!("{} in progress", stats.open_sessions)),
        );
        card("Days Worked", stats.days_worked.to_string(), None);
        card(
            "Locations",
            stats.locations_used.len().to_string(),
            (!stats.locations_used.is_empty()).then(|| stats.locations_joined()),
        );
        card(
            "Sessions",
            stats.total_sessions.to_string(),
            (stats.edited_count > 0).then(|| format!("{} edited", stats.edited_count)),
        );

        if !stats.anomalies.is_empty() {
            println!();
            warning(format!(
                "{} record(s) with inconsistent timestamps left out",
                stats.anomalies.len()
            ));
        }
    }

    Ok(())
}
