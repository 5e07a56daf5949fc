use crate::cli::commands::load_view;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::daily::{DailyEntry, daily_series};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::formatting::{format_hours, pad_left, pad_right};

const BAR_WIDTH: usize = 40;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Chart { range } = cmd {
        let (_pool, view) = load_view(cfg, range)?;
        let series = daily_series(&view.records, &view.period, &view.zone);

        header(format!(
            "Hours by day - {} ({})",
            view.period.display_label(&view.zone),
            view.period.bounds_label(&view.zone)
        ));

        for line in render(&series) {
            println!("{line}");
        }
    }

    Ok(())
}

/// One text bar per day, scaled to the busiest day.
fn render(series: &[DailyEntry]) -> Vec<String> {
    let max = series.iter().map(|d| d.hours).fold(0.0_f64, f64::max);

    series
        .iter()
        .map(|d| {
            let len = if max > 0.0 {
                ((d.hours / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar = if len == 0 {
                format!("{GREY}·{RESET}")
            } else {
                format!("{CYAN}{}{RESET}", "█".repeat(len))
            };
            format!(
                "{} {} {} {}",
                pad_right(&d.label, 7),
                d.date.format("%Y-%m-%d"),
                pad_left(&format_hours(d.hours), 7),
                bar
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32, hours: f64) -> DailyEntry {
        DailyEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            hours,
            label: format!("Day {d}"),
        }
    }

    #[test]
    fn busiest_day_gets_full_bar() {
        let lines = render(&[day(1, 8.5), day(2, 0.0), day(3, 4.25)]);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(&"█".repeat(BAR_WIDTH)));
        assert!(lines[0].contains("8.50h"));
        assert!(!lines[1].contains('█'));
        assert!(lines[2].contains(&"█".repeat(BAR_WIDTH / 2)));
    }
}
