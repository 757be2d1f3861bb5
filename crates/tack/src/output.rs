//! Output formatting helpers for the `tack` CLI.

use std::io::{self, Write};

use serde::Serialize;

use tack_board::{ChannelSink, DeliveryError};
use tack_core::task::Task;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a simple table with headers and rows.
///
/// Column widths are computed from the data (in characters) for alignment.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let print_row = |handle: &mut io::StdoutLock<'_>, cells: &[String]| {
        let line = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(&w) => format!("{cell:<w$}"),
                None => cell.clone(),
            })
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(handle, "{}", line.trim_end());
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    print_row(&mut handle, &header_cells);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&mut handle, &separator);
    for row in rows {
        print_row(&mut handle, row);
    }
}

/// A task as a row for [`output_table`].
pub fn format_task_row(task: &Task) -> Vec<String> {
    vec![
        task.id.clone(),
        task.priority.to_string(),
        task.task_type.to_string(),
        task.status.clone(),
        task.title.clone(),
        task.assignee_id.clone().unwrap_or_default(),
        task.due_date.map(|d| d.to_string()).unwrap_or_default(),
    ]
}

pub const TASK_HEADERS: &[&str] = &["ID", "PRIORITY", "TYPE", "STATUS", "TITLE", "ASSIGNEE", "DUE"];

/// Formats seconds as `H:MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Delivers tasks by printing them. Stands in for a chat integration.
pub struct StdoutSink {
    pub quiet: bool,
}

impl ChannelSink for StdoutSink {
    fn send(&self, channel: &str, tasks: &[Task]) -> Result<(), DeliveryError> {
        if channel.trim().is_empty() {
            return Err(DeliveryError {
                channel: channel.to_string(),
                reason: "channel name is empty".to_string(),
            });
        }
        if self.quiet {
            return Ok(());
        }
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for task in tasks {
            writeln!(handle, "[{channel}] {} {} ({})", task.id, task.title, task.status).map_err(|e| {
                DeliveryError {
                    channel: channel.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tack_core::task::TaskBuilder;

    #[test]
    fn row_format_columns() {
        let task = TaskBuilder::new("T-4", "Test").assignee("bob").build();
        let row = format_task_row(&task);
        assert_eq!(row.len(), TASK_HEADERS.len());
        assert_eq!(row[0], "T-4");
        assert_eq!(row[1], "MEDIUM");
        assert_eq!(row[5], "bob");
        assert_eq!(row[6], "");
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "0:00:00");
        assert_eq!(format_elapsed(3725), "1:02:05");
    }

    #[test]
    fn empty_channel_is_rejected() {
        let sink = StdoutSink { quiet: true };
        assert!(sink.send(" ", &[]).is_err());
        assert!(sink.send("#eng", &[]).is_ok());
    }
}
