/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Placeholders rendered in grey: missing durations and running sessions.
fn is_placeholder(value: &str) -> bool {
    matches!(value.trim(), "" | "-" | "—" | "In progress" | "0h 0min")
}

pub fn colorize_optional(value: &str) -> String {
    if is_placeholder(value) {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn colorize_in_out(value: &str, is_in: bool) -> String {
    if is_placeholder(value) {
        return format!("{GREY}{value}{RESET}");
    }

    if is_in {
        format!("{GREEN}{value}{RESET}")
    } else {
        format!("{RED}{value}{RESET}")
    }
}

/// Marker for manually corrected rows.
pub fn edited_marker(edited: bool) -> String {
    if edited {
        format!("{YELLOW}✎{RESET}")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_grey() {
        assert_eq!(colorize_optional("In progress"), format!("{GREY}In progress{RESET}"));
        assert_eq!(colorize_optional("8h 30min"), "8h 30min");
        assert!(colorize_in_out("08:00", true).starts_with(GREEN));
        assert!(colorize_in_out("—", false).starts_with(GREY));
    }
}
