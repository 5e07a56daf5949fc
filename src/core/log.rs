use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const OP_WIDTH_MAX: usize = 60;

static ANSI_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok());

fn strip_ansi(s: &str) -> String {
    match ANSI_RE.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI color for each operation kind.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "import" => Colour::Green,
        "edit" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        "export" => Colour::Blue,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// One formatted line per entry, operation colored, `op (target)` column
    /// cut at 60 visible characters.
    pub fn render(entries: &[LogEntry]) -> Vec<String> {
        let rows: Vec<(&LogEntry, String, String)> = entries
            .iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone());
                let op_target = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                (e, date, op_target)
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|(_, _, t)| t.chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);
        let id_w = rows
            .iter()
            .map(|(e, _, _)| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rows.iter().map(|(_, d, _)| d.len()).max().unwrap_or(0);

        rows.into_iter()
            .map(|(e, date, op_target)| {
                let color = color_for_operation(&e.operation);

                let visible = if op_target.chars().count() > OP_WIDTH_MAX {
                    let mut s: String = op_target.chars().take(OP_WIDTH_MAX - 3).collect();
                    s.push_str("...");
                    s
                } else {
                    op_target
                };

                // only the operation word is colored
                let colored = match visible.split_once(' ') {
                    Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                    None => color.paint(visible.as_str()).to_string(),
                };

                let padding =
                    " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

                format!(
                    "{:>id_w$}: {:<date_w$} | {}{} => {}",
                    e.id, date, colored, padding, e.message
                )
            })
            .collect()
    }

    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        println!("📜 Internal log:\n");
        for line in Self::render(&entries) {
            println!("{line}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, op: &str, target: &str, msg: &str) -> LogEntry {
        LogEntry {
            id,
            date: "2024-03-01T08:00:00+00:00".into(),
            operation: op.into(),
            target: target.into(),
            message: msg.into(),
        }
    }

    #[test]
    fn lines_are_aligned_without_ansi() {
        let lines = LogLogic::render(&[
            entry(1, "init", "", "Database initialized"),
            entry(12, "edit", "r1", "start a → b"),
        ]);
        let plain: Vec<String> = lines.iter().map(|l| strip_ansi(l)).collect();
        assert_eq!(plain[0].find("=>"), plain[1].find("=>"));
        assert!(plain[1].starts_with("12: 2024-03-01T08:00:00+00:00 | edit (r1)"));
    }

    #[test]
    fn long_targets_are_cut() {
        let target = "x".repeat(100);
        let lines = LogLogic::render(&[entry(1, "edit", &target, "m")]);
        assert!(strip_ansi(&lines[0]).contains("..."));
    }
}
