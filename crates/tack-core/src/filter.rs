//! Filter pipeline: pure predicate composition over a task collection.
//!
//! Every set criterion must pass for a task to survive; unset criteria pass
//! trivially. Applying the same criteria twice yields the same result as
//! applying them once.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::enums::{DueBucket, Priority};
use crate::task::{ColumnId, Task};

/// The filter bar's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over title and description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ColumnId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(skip_serializing_if = "DueBucket::is_default")]
    pub due_bucket: DueBucket,

    /// Inclusive lower bound on the due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_from: Option<NaiveDate>,

    /// Inclusive upper bound on the due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Returns `true` when no criterion is set, i.e. the filter is the identity.
    pub fn is_empty(&self) -> bool {
        self.text_needle().is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assignee_id.is_none()
            && self.due_bucket.is_default()
            && self.due_from.is_none()
            && self.due_to.is_none()
    }

    /// Lower-cased search text, or `None` when the text is unset or blank.
    fn text_needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// Evaluates every criterion against one task.
    ///
    /// `today` is the current calendar day; `done_column` is the status that
    /// exempts a task from being overdue.
    pub fn matches(&self, task: &Task, today: NaiveDate, done_column: &str) -> bool {
        if let Some(needle) = self.text_needle() {
            if !task.matches_text(&needle) {
                return false;
            }
        }
        self.matches_fields(task) && self.matches_due(task, today, done_column)
    }

    fn matches_fields(&self, task: &Task) -> bool {
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(ref status) = self.status {
            if &task.status != status {
                return false;
            }
        }
        if let Some(ref assignee) = self.assignee_id {
            if task.assignee_id.as_ref() != Some(assignee) {
                return false;
            }
        }
        true
    }

    fn matches_due(&self, task: &Task, today: NaiveDate, done_column: &str) -> bool {
        let needs_date = !self.due_bucket.is_default()
            || self.due_from.is_some()
            || self.due_to.is_some();
        if !needs_date {
            return true;
        }
        let Some(due) = task.due_date else {
            return false;
        };

        let in_bucket = match self.due_bucket {
            DueBucket::None => true,
            DueBucket::Overdue => due < today && task.status != done_column,
            DueBucket::Today => due == today,
            DueBucket::Week | DueBucket::Month => {
                let days = self.due_bucket.window_days().unwrap_or(0) as u64;
                let end = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
                today <= due && due <= end
            }
        };
        if !in_bucket {
            return false;
        }

        if let Some(from) = self.due_from {
            if due < from {
                return false;
            }
        }
        if let Some(to) = self.due_to {
            if due > to {
                return false;
            }
        }
        true
    }
}

/// Applies `criteria` to `tasks`, truncating `now` to its calendar day.
///
/// Relative order is preserved.
pub fn apply<Tz: TimeZone>(
    tasks: &[Task],
    criteria: &FilterCriteria,
    now: &DateTime<Tz>,
    done_column: &str,
) -> Vec<Task> {
    apply_on(tasks, criteria, now.date_naive(), done_column)
}

/// Like [`apply`], for a caller that already holds the calendar day.
pub fn apply_on(
    tasks: &[Task],
    criteria: &FilterCriteria,
    today: NaiveDate,
    done_column: &str,
) -> Vec<Task> {
    if criteria.is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .filter(|task| criteria.matches(task, today, done_column))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskBuilder;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    const DONE: &str = "DONE";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn titled(titles: &[&str]) -> Vec<Task> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| TaskBuilder::new(format!("T{}", i + 1), *t).build())
            .collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            TaskBuilder::new("T1", "Fix bug in login")
                .priority(Priority::High)
                .assignee("alice")
                .due_date(day(2024, 6, 9))
                .build(),
            TaskBuilder::new("T2", "Add feature")
                .status("IN_PROGRESS")
                .due_date(day(2024, 6, 10))
                .build(),
            TaskBuilder::new("T3", "Write release notes")
                .status(DONE)
                .assignee("bob")
                .due_date(day(2024, 6, 1))
                .build(),
            TaskBuilder::new("T4", "Plan Q3")
                .priority(Priority::Low)
                .due_date(day(2024, 7, 5))
                .build(),
            TaskBuilder::new("T5", "Untriaged").build(),
        ]
    }

    #[test]
    fn empty_criteria_is_identity() {
        let tasks = sample();
        let out = apply_on(&tasks, &FilterCriteria::default(), day(2024, 6, 10), DONE);
        assert_eq!(out, tasks);
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn blank_text_counts_as_unset() {
        let criteria = FilterCriteria {
            text: Some("   ".into()),
            ..Default::default()
        };
        assert!(criteria.is_empty());
    }

    #[test]
    fn text_matches_case_insensitively() {
        let tasks = titled(&[
            "Fix bug in login",
            "Add feature",
            "bug in export",
            "Refactor",
            "Bugfix release",
        ]);
        let criteria = FilterCriteria {
            text: Some("bug".into()),
            ..Default::default()
        };
        let out = apply_on(&tasks, &criteria, day(2024, 6, 10), DONE);
        let titles: Vec<&str> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Fix bug in login", "bug in export", "Bugfix release"]);
    }

    #[test]
    fn text_matches_description() {
        let tasks = vec![
            TaskBuilder::new("T1", "Refactor")
                .description("The LOGIN form is slow")
                .build(),
        ];
        let criteria = FilterCriteria {
            text: Some("login".into()),
            ..Default::default()
        };
        assert_eq!(apply_on(&tasks, &criteria, day(2024, 1, 1), DONE).len(), 1);
    }

    #[test]
    fn overdue_relative_to_now_truncated_to_day() {
        let tasks = vec![
            TaskBuilder::new("A", "Yesterday").due_date(day(2024, 6, 9)).build(),
            TaskBuilder::new("B", "Tomorrow").due_date(day(2024, 6, 11)).build(),
        ];
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 23, 59, 0).unwrap();
        let criteria = FilterCriteria {
            due_bucket: DueBucket::Overdue,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&tasks, &criteria, &now, DONE)), vec!["A"]);
    }

    #[test]
    fn done_tasks_are_never_overdue() {
        let criteria = FilterCriteria {
            due_bucket: DueBucket::Overdue,
            ..Default::default()
        };
        let out = apply_on(&sample(), &criteria, day(2024, 6, 10), DONE);
        assert_eq!(ids(&out), vec!["T1"]);
    }

    #[test]
    fn today_week_and_month_windows_are_inclusive() {
        let today = day(2024, 6, 10);
        let tasks = vec![
            TaskBuilder::new("past", "p").due_date(day(2024, 6, 9)).build(),
            TaskBuilder::new("today", "t").due_date(today).build(),
            TaskBuilder::new("plus7", "w").due_date(day(2024, 6, 17)).build(),
            TaskBuilder::new("plus8", "w").due_date(day(2024, 6, 18)).build(),
            TaskBuilder::new("plus30", "m").due_date(day(2024, 7, 10)).build(),
            TaskBuilder::new("plus31", "m").due_date(day(2024, 7, 11)).build(),
        ];
        let bucket = |b| FilterCriteria {
            due_bucket: b,
            ..Default::default()
        };
        assert_eq!(ids(&apply_on(&tasks, &bucket(DueBucket::Today), today, DONE)), vec!["today"]);
        assert_eq!(
            ids(&apply_on(&tasks, &bucket(DueBucket::Week), today, DONE)),
            vec!["today", "plus7"]
        );
        assert_eq!(
            ids(&apply_on(&tasks, &bucket(DueBucket::Month), today, DONE)),
            vec!["today", "plus7", "plus8", "plus30"]
        );
    }

    #[test]
    fn due_range_combines_with_bucket() {
        let today = day(2024, 6, 10);
        let criteria = FilterCriteria {
            due_bucket: DueBucket::Month,
            due_from: Some(day(2024, 6, 11)),
            ..Default::default()
        };
        assert_eq!(ids(&apply_on(&sample(), &criteria, today, DONE)), vec!["T4"]);

        let range_only = FilterCriteria {
            due_from: Some(day(2024, 6, 1)),
            due_to: Some(day(2024, 6, 9)),
            ..Default::default()
        };
        assert_eq!(ids(&apply_on(&sample(), &range_only, today, DONE)), vec!["T1", "T3"]);
    }

    #[test]
    fn undated_tasks_fail_date_criteria() {
        let criteria = FilterCriteria {
            due_to: Some(day(2030, 1, 1)),
            ..Default::default()
        };
        let out = apply_on(&sample(), &criteria, day(2024, 6, 10), DONE);
        assert!(!ids(&out).contains(&"T5"));
    }

    #[test]
    fn exact_field_criteria_compose_with_and() {
        let criteria = FilterCriteria {
            priority: Some(Priority::High),
            assignee_id: Some("alice".into()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_on(&sample(), &criteria, day(2024, 6, 10), DONE)), vec!["T1"]);

        let status = FilterCriteria {
            status: Some("IN_PROGRESS".into()),
            assignee_id: Some("alice".into()),
            ..Default::default()
        };
        assert!(apply_on(&sample(), &status, day(2024, 6, 10), DONE).is_empty());
    }

    #[test]
    fn reapplying_is_idempotent() {
        let today = day(2024, 6, 10);
        let criteria = FilterCriteria {
            text: Some("e".into()),
            due_bucket: DueBucket::Month,
            ..Default::default()
        };
        let once = apply_on(&sample(), &criteria, today, DONE);
        let twice = apply_on(&once, &criteria, today, DONE);
        assert_eq!(once, twice);
    }

    #[test]
    fn criteria_roundtrip_skips_unset_fields() {
        let criteria = FilterCriteria {
            priority: Some(Priority::Urgent),
            due_bucket: DueBucket::Week,
            ..Default::default()
        };
        let json = serde_json::to_string(&criteria).unwrap();
        assert_eq!(json, r#"{"priority":"URGENT","due_bucket":"week"}"#);
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, criteria);
    }
}
