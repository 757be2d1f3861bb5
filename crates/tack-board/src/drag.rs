//! Drag-and-drop reconciliation.
//!
//! Task drags and column drags are two finite-state machines written as pure
//! reducers: `(state, event) -> (state, outcome)`. The toolkit layer turns
//! its raw pointer input into [`TaskDragEvent`]s and [`ColumnDragEvent`]s.
//! [`DragController`] holds both machines and guarantees that at most one
//! drag is active at a time.
//!
//! Every terminal transition (drop, cancel, end) returns the machine to
//! idle, which also clears the hover highlight.

use std::fmt;

use tracing::debug;

use tack_core::task::{ColumnId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Task,
    Column,
}

impl fmt::Display for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => f.write_str("task"),
            Self::Column => f.write_str("column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("a {0} drag is already in progress")]
    AlreadyDragging(DragKind),
}

/// Why a drag ended without a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Dropped on the column it came from.
    SameColumn,
    /// Dropped with no target column.
    NoTarget,
    /// The dragged task is no longer on the board.
    TaskGone,
    /// Cancelled by the user (e.g. Escape).
    Cancelled,
    /// The gesture ended without a drop.
    Ended,
}

/// A validated request to move a task, for `ColumnModel::move_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub task_id: TaskId,
    pub from: ColumnId,
    pub to: ColumnId,
    /// Insertion index in the target column as rendered (post-filter).
    pub index: usize,
}

/// Result of feeding one event to a drag machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The drag continues.
    Pending,
    /// The event does not apply to the current state.
    Ignored,
    Move(MoveRequest),
    Reorder { dragged: ColumnId, target: ColumnId },
    Cancelled(CancelReason),
}

/// What a drop did to the board, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { task_id: TaskId, column_id: ColumnId },
    Reordered { column_id: ColumnId },
    Cancelled(CancelReason),
    Ignored,
}

// ---------------------------------------------------------------------------
// Task drag FSM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskDragState {
    #[default]
    Idle,
    Dragging {
        task_id: TaskId,
        source_column_id: ColumnId,
    },
    Hovering {
        task_id: TaskId,
        source_column_id: ColumnId,
        target_column_id: ColumnId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDragEvent {
    Start {
        task_id: TaskId,
        source_column_id: ColumnId,
    },
    Hover(ColumnId),
    Leave,
    /// `target: None` drops on the hovered column.
    Drop {
        target: Option<ColumnId>,
        index: usize,
    },
    Cancel,
    End,
}

pub fn reduce_task_drag(state: TaskDragState, event: TaskDragEvent) -> (TaskDragState, DragOutcome) {
    use TaskDragEvent as E;
    use TaskDragState as S;

    match (state, event) {
        (S::Idle, E::Start { task_id, source_column_id }) => {
            (S::Dragging { task_id, source_column_id }, DragOutcome::Pending)
        }
        (S::Idle, _) => (S::Idle, DragOutcome::Ignored),

        (active, E::Start { .. }) => (active, DragOutcome::Ignored),

        (
            S::Dragging { task_id, source_column_id }
            | S::Hovering { task_id, source_column_id, .. },
            E::Hover(target_column_id),
        ) => (
            S::Hovering {
                task_id,
                source_column_id,
                target_column_id,
            },
            DragOutcome::Pending,
        ),

        (S::Hovering { task_id, source_column_id, .. }, E::Leave) => {
            (S::Dragging { task_id, source_column_id }, DragOutcome::Pending)
        }
        (dragging @ S::Dragging { .. }, E::Leave) => (dragging, DragOutcome::Ignored),

        (S::Dragging { task_id, source_column_id }, E::Drop { target, index }) => {
            (S::Idle, resolve_drop(task_id, source_column_id, target, index))
        }
        (
            S::Hovering {
                task_id,
                source_column_id,
                target_column_id,
            },
            E::Drop { target, index },
        ) => {
            let target = target.or(Some(target_column_id));
            (S::Idle, resolve_drop(task_id, source_column_id, target, index))
        }

        (_, E::Cancel) => (S::Idle, DragOutcome::Cancelled(CancelReason::Cancelled)),
        (_, E::End) => (S::Idle, DragOutcome::Cancelled(CancelReason::Ended)),
    }
}

fn resolve_drop(task_id: TaskId, from: ColumnId, target: Option<ColumnId>, index: usize) -> DragOutcome {
    match target {
        None => DragOutcome::Cancelled(CancelReason::NoTarget),
        Some(to) if to == from => DragOutcome::Cancelled(CancelReason::SameColumn),
        Some(to) => DragOutcome::Move(MoveRequest {
            task_id,
            from,
            to,
            index,
        }),
    }
}

// ---------------------------------------------------------------------------
// Column drag FSM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnDragState {
    #[default]
    Idle,
    Dragging { source_column_id: ColumnId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDragEvent {
    Start(ColumnId),
    Drop(ColumnId),
    Cancel,
    End,
}

pub fn reduce_column_drag(state: ColumnDragState, event: ColumnDragEvent) -> (ColumnDragState, DragOutcome) {
    use ColumnDragEvent as E;
    use ColumnDragState as S;

    match (state, event) {
        (S::Idle, E::Start(source_column_id)) => {
            (S::Dragging { source_column_id }, DragOutcome::Pending)
        }
        (S::Idle, _) => (S::Idle, DragOutcome::Ignored),
        (active @ S::Dragging { .. }, E::Start(_)) => (active, DragOutcome::Ignored),
        (S::Dragging { source_column_id }, E::Drop(target)) => {
            if source_column_id == target {
                (S::Idle, DragOutcome::Cancelled(CancelReason::SameColumn))
            } else {
                (
                    S::Idle,
                    DragOutcome::Reorder {
                        dragged: source_column_id,
                        target,
                    },
                )
            }
        }
        (S::Dragging { .. }, E::Cancel) => (S::Idle, DragOutcome::Cancelled(CancelReason::Cancelled)),
        (S::Dragging { .. }, E::End) => (S::Idle, DragOutcome::Cancelled(CancelReason::Ended)),
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Snapshot of the active drag, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub kind: DragKind,
    pub source_id: String,
    pub source_column_id: Option<ColumnId>,
    pub hover_column_id: Option<ColumnId>,
}

/// Owns both drag machines and enforces a single active drag.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    task: TaskDragState,
    column: ColumnDragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_kind(&self) -> Option<DragKind> {
        if self.task != TaskDragState::Idle {
            Some(DragKind::Task)
        } else if self.column != ColumnDragState::Idle {
            Some(DragKind::Column)
        } else {
            None
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active_kind().is_none()
    }

    pub fn task_state(&self) -> &TaskDragState {
        &self.task
    }

    pub fn column_state(&self) -> &ColumnDragState {
        &self.column
    }

    /// The column currently highlighted as a drop target.
    pub fn hover_column(&self) -> Option<&ColumnId> {
        match &self.task {
            TaskDragState::Hovering { target_column_id, .. } => Some(target_column_id),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<DragSession> {
        match (&self.task, &self.column) {
            (TaskDragState::Dragging { task_id, source_column_id }, _) => Some(DragSession {
                kind: DragKind::Task,
                source_id: task_id.clone(),
                source_column_id: Some(source_column_id.clone()),
                hover_column_id: None,
            }),
            (
                TaskDragState::Hovering {
                    task_id,
                    source_column_id,
                    target_column_id,
                },
                _,
            ) => Some(DragSession {
                kind: DragKind::Task,
                source_id: task_id.clone(),
                source_column_id: Some(source_column_id.clone()),
                hover_column_id: Some(target_column_id.clone()),
            }),
            (TaskDragState::Idle, ColumnDragState::Dragging { source_column_id }) => Some(DragSession {
                kind: DragKind::Column,
                source_id: source_column_id.clone(),
                source_column_id: None,
                hover_column_id: None,
            }),
            (TaskDragState::Idle, ColumnDragState::Idle) => None,
        }
    }

    /// Feeds an event to the task machine.
    ///
    /// A `Start` while any drag is active is rejected and leaves the active
    /// drag untouched.
    pub fn task_event(&mut self, event: TaskDragEvent) -> Result<DragOutcome, DragError> {
        if matches!(event, TaskDragEvent::Start { .. }) {
            if let Some(kind) = self.active_kind() {
                debug!(active = %kind, "rejecting task drag start");
                return Err(DragError::AlreadyDragging(kind));
            }
        }
        let state = std::mem::take(&mut self.task);
        let label = format!("{event:?}");
        let (next, outcome) = reduce_task_drag(state, event);
        if outcome == DragOutcome::Ignored {
            debug!(event = %label, "task drag event ignored");
        } else {
            debug!(event = %label, state = ?next, "task drag transition");
        }
        self.task = next;
        Ok(outcome)
    }

    /// Feeds an event to the column machine. Same rules as [`task_event`](Self::task_event).
    pub fn column_event(&mut self, event: ColumnDragEvent) -> Result<DragOutcome, DragError> {
        if matches!(event, ColumnDragEvent::Start(_)) {
            if let Some(kind) = self.active_kind() {
                debug!(active = %kind, "rejecting column drag start");
                return Err(DragError::AlreadyDragging(kind));
            }
        }
        let state = std::mem::take(&mut self.column);
        let label = format!("{event:?}");
        let (next, outcome) = reduce_column_drag(state, event);
        if outcome == DragOutcome::Ignored {
            debug!(event = %label, "column drag event ignored");
        } else {
            debug!(event = %label, state = ?next, "column drag transition");
        }
        self.column = next;
        Ok(outcome)
    }

    /// Drops any active drag.
    pub fn reset(&mut self) {
        self.task = TaskDragState::Idle;
        self.column = ColumnDragState::Idle;
    }
}
