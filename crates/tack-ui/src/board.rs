//! Plain-text rendering of a board and of a single task.

use std::collections::BTreeSet;
use std::fmt::Write;

use chrono::NaiveDate;

use tack_core::column::Column;
use tack_core::task::{Task, TaskId};

use crate::styles::{
    CHECKBOX_CHECKED, CHECKBOX_EMPTY, COLUMN_BAR, render_in_column_color, render_muted, render_priority,
    render_separator, render_task_compact, render_type,
};
use crate::terminal::truncate_chars;

/// What the board renderer needs besides the columns.
#[derive(Debug, Clone)]
pub struct BoardStyle<'a> {
    pub today: NaiveDate,
    pub done_column: &'a str,
    /// Selected ids get a checked box; `None` hides the checkboxes.
    pub selected: Option<&'a BTreeSet<TaskId>>,
    pub width: usize,
}

/// Renders the columns top to bottom, each with a colored header and its
/// cards in order.
pub fn render_board(columns: &[Column], style: &BoardStyle<'_>) -> String {
    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let header = format!("{COLUMN_BAR} {} ({})", column.name, column.tasks.len());
        let _ = writeln!(out, "{}", render_in_column_color(&header, &column.color));
        let _ = writeln!(out, "{}", render_separator(style.width.min(60)));

        if column.tasks.is_empty() {
            let _ = writeln!(out, "  {}", render_muted("(empty)"));
            continue;
        }
        for task in &column.tasks {
            let line = render_task_compact(task, style.today, style.done_column);
            match style.selected {
                Some(selected) => {
                    let mark = if selected.contains(&task.id) {
                        CHECKBOX_CHECKED
                    } else {
                        CHECKBOX_EMPTY
                    };
                    let _ = writeln!(out, "  {mark} {line}");
                }
                None => {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }
    }
    out
}

/// Renders every field of a task, one per line.
pub fn render_task_detail(task: &Task, column_name: &str, width: usize) -> String {
    let mut out = String::new();
    let title = truncate_chars(&task.title, width.saturating_sub(task.id.len() + 2).max(10));
    let _ = writeln!(out, "{}: {}", task.id, title);
    let _ = writeln!(out, "Column:   {column_name} ({})", task.status);
    let _ = writeln!(out, "Priority: {}", render_priority(task.priority));
    let _ = writeln!(out, "Type:     {}", render_type(task.task_type));
    if let Some(assignee) = &task.assignee_id {
        let _ = writeln!(out, "Assignee: {assignee}");
    }
    if let Some(due) = task.due_date {
        let _ = writeln!(out, "Due:      {due}");
    }
    if !task.tags.is_empty() {
        let tags: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Tags:     {}", tags.join(", "));
    }
    if task.comment_count > 0 || task.attachment_count > 0 {
        let _ = writeln!(
            out,
            "{}",
            render_muted(&format!(
                "{} comments, {} attachments",
                task.comment_count, task.attachment_count
            ))
        );
    }
    if !task.description.is_empty() {
        let _ = writeln!(out, "\n{}", task.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_core::column::{ColumnModel, ColumnSpec};
    use tack_core::task::TaskBuilder;

    fn columns() -> Vec<Column> {
        ColumnModel::distribute(
            &[
                ColumnSpec::new("TODO", "To Do", "#f29668"),
                ColumnSpec::new("DONE", "Done", "#7fd962"),
            ],
            vec![
                TaskBuilder::new("T-1", "Write docs").build(),
                TaskBuilder::new("T-2", "Fix parser").build(),
            ],
        )
        .columns()
        .to_vec()
    }

    #[test]
    fn board_lists_columns_and_cards_in_order() {
        let style = BoardStyle {
            today: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            done_column: "DONE",
            selected: None,
            width: 80,
        };
        let out = render_board(&columns(), &style);
        let todo = out.find("To Do (2)").unwrap();
        let t1 = out.find("Write docs").unwrap();
        let t2 = out.find("Fix parser").unwrap();
        let done = out.find("Done (0)").unwrap();
        assert!(todo < t1 && t1 < t2 && t2 < done);
        assert!(out.contains("(empty)"));
    }

    #[test]
    fn board_marks_selection() {
        let selected: BTreeSet<TaskId> = ["T-2".to_string()].into();
        let style = BoardStyle {
            today: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            done_column: "DONE",
            selected: Some(&selected),
            width: 80,
        };
        let out = render_board(&columns(), &style);
        assert!(out.contains(CHECKBOX_CHECKED));
        assert!(out.contains(CHECKBOX_EMPTY));
    }

    #[test]
    fn detail_shows_optional_fields_only_when_set() {
        let task = TaskBuilder::new("T-3", "Release").assignee("bob").tag("ops").build();
        let out = render_task_detail(&task, "To Do", 80);
        assert!(out.contains("T-3: Release"));
        assert!(out.contains("Assignee: bob"));
        assert!(out.contains("Tags:     ops"));
        assert!(!out.contains("Due:"));
    }
}
