use crate::cli::commands::load_view;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::duration::measure_all;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{colorize_in_out, colorize_optional, edited_marker};
use crate::utils::formatting::{format_minutes_to_hours, pad_right};
use unicode_width::UnicodeWidthStr;

const W_LOCATION: usize = 25;
const W_DATE: usize = 10;
const W_TIME: usize = 11;
const W_DURATION: usize = 10;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { range } = cmd {
        let (_pool, view) = load_view(cfg, range)?;
        let zone = &view.zone;

        header(format!(
            "Records - {} ({})",
            view.period.display_label(zone),
            view.period.bounds_label(zone)
        ));

        if view.records.is_empty() {
            info("No records in this period.");
            return Ok(());
        }

        let (measured, anomalies) = measure_all(&view.records);

        // ids are opaque and can be long (uuids); size the column to fit
        let w_id = measured
            .iter()
            .map(|m| UnicodeWidthStr::width(m.record.id.as_str()))
            .max()
            .unwrap_or(0)
            .max(2);

        println!(
            "{} {} {} {} {} {} ",
            pad_right("Id", w_id),
            pad_right("Location", W_LOCATION),
            pad_right("Date", W_DATE),
            pad_right("In", W_TIME),
            pad_right("Out", W_TIME),
            pad_right("Duration", W_DURATION),
        );
        println!(
            "{}",
            "-".repeat(w_id + W_LOCATION + W_DATE + 2 * W_TIME + W_DURATION + 7)
        );

        let mut any_edited = false;
        for m in &measured {
            let r = m.record;
            any_edited |= r.is_edited();

            let location = r.location_label().unwrap_or("Unknown");
            let date = zone.date_of(r.start).format("%Y-%m-%d").to_string();
            let clock_in = zone.time_of(r.start).format("%H:%M").to_string();
            let clock_out = r
                .end
                .map(|e| zone.time_of(e).format("%H:%M").to_string())
                .unwrap_or_else(|| "In progress".to_string());
            let duration = m
                .minutes
                .map(format_minutes_to_hours)
                .unwrap_or_else(|| "—".to_string());

            println!(
                "{} {} {} {} {} {} {}",
                pad_right(&r.id, w_id),
                pad_right(location, W_LOCATION),
                pad_right(&date, W_DATE),
                colorize_in_out(&pad_right(&clock_in, W_TIME), true),
                colorize_in_out(&pad_right(&clock_out, W_TIME), false),
                colorize_optional(&pad_right(&duration, W_DURATION)),
                edited_marker(r.is_edited()),
            );
        }

        println!();
        if any_edited {
            println!("✎ = manually edited");
        }
        println!("Correct a row with: timekeeper edit <id> start|end <value>");
        for a in &anomalies {
            warning(format!("Skipped {a}"));
        }
    }

    Ok(())
}
