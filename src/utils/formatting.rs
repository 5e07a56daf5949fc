//! Formatting utilities used for CLI and export outputs.

use unicode_width::UnicodeWidthStr;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Pad to `width` terminal columns (wide glyphs count double).
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - w))
    }
}

pub fn pad_left(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{s}", " ".repeat(width - w))
    }
}

/// `510` → `8h 30min`. Negative input is clamped to zero.
pub fn format_minutes_to_hours(minutes: i64) -> String {
    let m = minutes.max(0);
    format!("{}h {}min", m / 60, m % 60)
}

/// Hours with two decimals, as shown on the chart axis.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}h")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_to_hours() {
        assert_eq!(format_minutes_to_hours(510), "8h 30min");
        assert_eq!(format_minutes_to_hours(435), "7h 15min");
        assert_eq!(format_minutes_to_hours(0), "0h 0min");
        assert_eq!(format_minutes_to_hours(59), "0h 59min");
    }

    #[test]
    fn padding_counts_columns() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_left("ab", 4), "  ab");
        assert_eq!(pad_right("abcdef", 4), "abcdef");
    }
}
