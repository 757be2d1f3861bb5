//! `tack quick` -- hover a card, press a shortcut key and commit a value.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use tack_board::{QuickAction, QuickActionValue, Rect, Viewport};
use tack_core::column::Column;
use tack_ui::terminal::terminal_size;

use crate::cli::QuickArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Value that clears the field instead of setting it.
const CLEAR: &str = "none";

/// Where a card sits in the `tack board` rendering: every column is a header
/// line, a separator, its cards (or an "(empty)" line) and a blank line.
fn card_anchor(columns: &[Column], task_id: &str, width: usize) -> Option<Rect> {
    let card_width = width.min(60).saturating_sub(2) as i32;
    let mut line = 0i32;
    for column in columns {
        line += 2;
        if let Some(row) = column.tasks.iter().position(|t| t.id == task_id) {
            return Some(Rect::new(2, line + row as i32, card_width, 1));
        }
        line += column.tasks.len().max(1) as i32 + 1;
    }
    None
}

fn parse_value(action: QuickAction, raw: &str) -> Result<QuickActionValue> {
    let raw = raw.trim();
    let clear = raw.eq_ignore_ascii_case(CLEAR);
    Ok(match action {
        QuickAction::Assign => QuickActionValue::Assignee((!clear && !raw.is_empty()).then(|| raw.to_string())),
        QuickAction::DueDate => {
            let date = if clear || raw.is_empty() {
                None
            } else {
                Some(
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .with_context(|| format!("invalid due date '{raw}' (expected YYYY-MM-DD)"))?,
                )
            };
            QuickActionValue::DueDate(date)
        }
        QuickAction::Tags => {
            let tags: BTreeSet<String> = if clear {
                BTreeSet::new()
            } else {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            };
            QuickActionValue::Tags(tags)
        }
    })
}

/// Execute the `tack quick` command.
pub fn run(ctx: &RuntimeContext, args: &QuickArgs) -> Result<()> {
    let Some(action) = QuickAction::from_key(args.key) else {
        bail!("unknown shortcut key '{}' (use m, d or t)", args.key);
    };
    let value = parse_value(action, &args.value)?;

    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    board.hover_task(Some(&args.id))?;
    let (width, height) = terminal_size();
    let anchor = card_anchor(&board.columns(), &args.id, width)
        .with_context(|| format!("task {} is not on the board", args.id))?;
    let viewport = Viewport::new(width as i32, height as i32);
    let Some(position) = board.handle_key(args.key, &anchor, viewport) else {
        bail!("shortcut '{}' did nothing", args.key);
    };
    board.apply_quick_action(value)?;
    let task = board.task(&args.id)?.clone();

    if ctx.json {
        output_json(&serde_json::json!({
            "task": task,
            "action": action.to_string(),
            "overlay": {
                "left": position.left,
                "top": position.top,
                "placement": format!("{:?}", position.placement).to_lowercase(),
            },
        }));
    } else if !ctx.quiet {
        println!("Updated {} of {}", action, task.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_core::column::{ColumnModel, ColumnSpec};
    use tack_core::task::TaskBuilder;

    fn columns() -> Vec<Column> {
        let specs = vec![
            ColumnSpec::new("TODO", "To do", "#ffffff"),
            ColumnSpec::new("DOING", "Doing", "#ffffff"),
        ];
        let tasks = vec![
            TaskBuilder::new("T-1", "a").status("DOING").build(),
            TaskBuilder::new("T-2", "b").status("DOING").build(),
        ];
        ColumnModel::distribute(&specs, tasks).columns().to_vec()
    }

    #[test]
    fn anchor_follows_rendered_lines() {
        let cols = columns();
        // "To do" takes four lines before the DOING header and separator.
        assert_eq!(card_anchor(&cols, "T-1", 100), Some(Rect::new(2, 6, 58, 1)));
        assert_eq!(card_anchor(&cols, "T-2", 40), Some(Rect::new(2, 7, 38, 1)));
        assert_eq!(card_anchor(&cols, "T-9", 40), None);
    }

    #[test]
    fn none_clears_fields() {
        assert_eq!(
            parse_value(QuickAction::Assign, "None").unwrap(),
            QuickActionValue::Assignee(None)
        );
        assert_eq!(
            parse_value(QuickAction::DueDate, "none").unwrap(),
            QuickActionValue::DueDate(None)
        );
        assert_eq!(
            parse_value(QuickAction::Tags, "none").unwrap(),
            QuickActionValue::Tags(BTreeSet::new())
        );
    }

    #[test]
    fn values_are_parsed() {
        assert_eq!(
            parse_value(QuickAction::Assign, " bob ").unwrap(),
            QuickActionValue::Assignee(Some("bob".into()))
        );
        assert_eq!(
            parse_value(QuickAction::DueDate, "2024-06-12").unwrap(),
            QuickActionValue::DueDate(NaiveDate::from_ymd_opt(2024, 6, 12))
        );
        let QuickActionValue::Tags(tags) = parse_value(QuickAction::Tags, "ui, ,api").unwrap() else {
            panic!("expected tags");
        };
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["api", "ui"]);
        assert!(parse_value(QuickAction::DueDate, "12/06/2024").is_err());
    }
}
