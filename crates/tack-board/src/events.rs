//! Notifications from the board to the surrounding application.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tack_core::column::Column;
use tack_core::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A short, non-fatal message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives board notifications. Every method defaults to a no-op.
pub trait BoardListener {
    /// The rendered columns changed.
    fn on_columns_changed(&mut self, _columns: &[Column]) {}

    fn on_selection_changed(&mut self, _selected: &BTreeSet<TaskId>) {}

    /// A card was opened for detail view.
    fn on_task_activated(&mut self, _task_id: &str) {}

    fn on_notice(&mut self, _notice: &Notice) {}
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    ColumnsChanged(Vec<Column>),
    SelectionChanged(BTreeSet<TaskId>),
    TaskActivated(TaskId),
    Notice(Notice),
}

/// A listener that records every notification. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<BoardEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BoardEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn columns_changed(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| matches!(e, BoardEvent::ColumnsChanged(_)))
            .count()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                BoardEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent selection reported.
    pub fn last_selection(&self) -> Option<BTreeSet<TaskId>> {
        self.0.borrow().iter().rev().find_map(|e| match e {
            BoardEvent::SelectionChanged(s) => Some(s.clone()),
            _ => None,
        })
    }
}

impl BoardListener for EventLog {
    fn on_columns_changed(&mut self, columns: &[Column]) {
        self.0.borrow_mut().push(BoardEvent::ColumnsChanged(columns.to_vec()));
    }

    fn on_selection_changed(&mut self, selected: &BTreeSet<TaskId>) {
        self.0.borrow_mut().push(BoardEvent::SelectionChanged(selected.clone()));
    }

    fn on_task_activated(&mut self, task_id: &str) {
        self.0.borrow_mut().push(BoardEvent::TaskActivated(task_id.to_string()));
    }

    fn on_notice(&mut self, notice: &Notice) {
        self.0.borrow_mut().push(BoardEvent::Notice(notice.clone()));
    }
}
