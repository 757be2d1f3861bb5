//! Ayu color theme and styling functions for tack CLI output.
//!
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Only states that need attention get color: HIGH and URGENT priorities,
//! bugs, and overdue dates. Column headers use each column's own color.

use chrono::NaiveDate;
use owo_colors::OwoColorize;

use tack_core::enums::{Priority, TaskType};
use tack_core::task::Task;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff

const PRIORITY_URGENT: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178
const PRIORITY_HIGH: (u8, u8, u8) = (0xff, 0x8f, 0x40); // #ff8f40

const TYPE_BUG: (u8, u8, u8) = (0xf2, 0x6d, 0x78); // #f26d78

/// Priority icon: small filled circle, colored by urgency.
pub const PRIORITY_ICON: &str = "\u{25CF}"; // ●
/// Bug marker shown in front of bug titles.
pub const BUG_ICON: &str = "\u{2716}"; // ✖
/// Selection checkbox, unchecked and checked.
pub const CHECKBOX_EMPTY: &str = "\u{2610}"; // ☐
pub const CHECKBOX_CHECKED: &str = "\u{2611}"; // ☑

pub const ICON_PASS: &str = "\u{2713}"; // ✓
pub const ICON_WARN: &str = "\u{26A0}"; // ⚠
pub const ICON_FAIL: &str = "\u{2716}"; // ✖

pub const COLUMN_BAR: &str = "\u{2588}"; // █
pub const SEPARATOR_LIGHT: &str = "\u{2500}";

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

/// Parses `#rrggbb` (or `rrggbb`) into RGB components.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_warn_icon() -> String {
    color_str(ICON_WARN, WARN)
}

pub fn render_fail_icon() -> String {
    color_str(ICON_FAIL, FAIL)
}

/// A light separator of the given width, muted.
pub fn render_separator(width: usize) -> String {
    render_muted(&SEPARATOR_LIGHT.repeat(width))
}

// ---------------------------------------------------------------------------
// Board elements
// ---------------------------------------------------------------------------

/// Renders `s` in a column's hex color, bold. Invalid colors fall back to
/// the accent color.
pub fn render_in_column_color(s: &str, hex: &str) -> String {
    color_bold_str(s, parse_hex_color(hex).unwrap_or(ACCENT))
}

/// Renders a priority as `● NAME`. URGENT is bold red, HIGH orange, the
/// rest neutral.
pub fn render_priority(priority: Priority) -> String {
    let label = format!("{PRIORITY_ICON} {}", priority.as_str());
    match priority {
        Priority::Urgent => color_bold_str(&label, PRIORITY_URGENT),
        Priority::High => color_str(&label, PRIORITY_HIGH),
        _ => label,
    }
}

/// Renders just the first letter of the priority, colored like
/// [`render_priority`].
pub fn render_priority_compact(priority: Priority) -> String {
    let label = &priority.as_str()[..1];
    match priority {
        Priority::Urgent => color_bold_str(label, PRIORITY_URGENT),
        Priority::High => color_str(label, PRIORITY_HIGH),
        _ => label.to_string(),
    }
}

/// Bugs get color; tasks use standard text.
pub fn render_type(task_type: TaskType) -> String {
    match task_type {
        TaskType::Bug => color_str(task_type.as_str(), TYPE_BUG),
        TaskType::Task => task_type.as_str().to_string(),
    }
}

/// Renders a due date. Past dates on unfinished tasks are red.
pub fn render_due(task: &Task, today: NaiveDate, done_column: &str) -> Option<String> {
    let due = task.due_date?;
    let label = format!("due {due}");
    if due < today && task.status != done_column {
        Some(color_str(&label, FAIL))
    } else if due == today {
        Some(color_str(&label, WARN))
    } else {
        Some(render_muted(&label))
    }
}

/// One-line task summary: `ID [P] [type] Title @assignee #tag due ...`.
pub fn render_task_compact(task: &Task, today: NaiveDate, done_column: &str) -> String {
    let mut line = format!(
        "{} [{}] [{}] {}",
        render_bold(&task.id),
        render_priority_compact(task.priority),
        render_type(task.task_type),
        task.title
    );
    if let Some(assignee) = &task.assignee_id {
        line.push(' ');
        line.push_str(&render_accent(&format!("@{assignee}")));
    }
    for tag in &task.tags {
        line.push(' ');
        line.push_str(&render_muted(&format!("#{tag}")));
    }
    if let Some(due) = render_due(task, today, done_column) {
        line.push(' ');
        line.push_str(&due);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_core::task::TaskBuilder;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#f29668"), Some((0xf2, 0x96, 0x68)));
        assert_eq!(parse_hex_color("59C2FF"), Some((0x59, 0xc2, 0xff)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn priority_labels() {
        assert!(render_priority(Priority::Urgent).contains("URGENT"));
        assert!(render_priority(Priority::Low).contains("LOW"));
        assert!(render_priority_compact(Priority::High).contains('H'));
    }

    #[test]
    fn compact_task_contains_fields() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let task = TaskBuilder::new("T-7", "Fix login crash")
            .task_type(TaskType::Bug)
            .assignee("alice")
            .tag("auth")
            .due_date(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap())
            .build();
        let line = render_task_compact(&task, today, "DONE");
        assert!(line.contains("T-7"));
        assert!(line.contains("Fix login crash"));
        assert!(line.contains("@alice"));
        assert!(line.contains("#auth"));
        assert!(line.contains("due 2024-06-09"));
    }

    #[test]
    fn no_due_date_renders_nothing() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(render_due(&Task::new("T-1", "x"), today, "DONE").is_none());
    }
}
