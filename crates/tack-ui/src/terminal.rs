//! Terminal detection utilities.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns the terminal width in columns, defaulting to 80 if detection fails.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _rows)| cols as usize)
        .unwrap_or(80)
}

/// Returns `(columns, rows)`, defaulting to 80x24 if detection fails.
pub fn terminal_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(cols, rows)| (cols as usize, rows as usize))
        .unwrap_or((80, 24))
}

/// Determines if ANSI color codes should be used.
///
/// Respects the usual conventions:
/// - `NO_COLOR` (any value) disables color (<https://no-color.org/>)
/// - `CLICOLOR=0` disables color
/// - `TERM=dumb` disables color
/// - `CLICOLOR_FORCE` (any value) forces color even in non-TTY
/// - otherwise color is used only on a TTY
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }
    is_tty()
}

/// Truncates `s` to at most `max` characters, ending with `…` when cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_width_returns_positive() {
        assert!(terminal_width() > 0);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("ünïcödé title", 5), "ünïc\u{2026}");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
