//! Board error types.

use tack_config::ConfigError;
use tack_core::column::ColumnError;
use tack_core::task::TaskId;
use tack_core::validation::ValidationError;
use tack_storage::StorageError;

use crate::channel::DeliveryError;
use crate::drag::DragError;
use crate::overlay::QuickAction;

/// Errors surfaced by [`Board`](crate::Board) operations.
///
/// None of them is fatal: after any error the board is consistent and
/// accepts further gestures.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Input rejected before any mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced task or column is not on the board.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The adapter failed; the optimistic change was rolled back.
    #[error("could not save changes: {0}")]
    Persistence(#[from] StorageError),

    /// A bulk action failed as a whole; nothing was applied.
    #[error("{action} failed for {attempted} task(s): {source}")]
    BulkFailed {
        action: &'static str,
        attempted: usize,
        source: Box<BoardError>,
    },

    /// A drop target resolves to no column; the drag was cancelled.
    #[error("drop target is not a column on this board: {0}")]
    DragReconciliation(String),

    #[error(transparent)]
    Drag(#[from] DragError),

    /// The adapter returned two tasks with the same id.
    #[error("duplicate task id from adapter: {0}")]
    DuplicateTaskId(TaskId),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("preferences: {0}")]
    Preferences(#[from] ConfigError),

    /// A column metadata change was rejected.
    #[error(transparent)]
    Column(ColumnError),

    #[error("no quick-action overlay is open")]
    OverlayNotOpen,

    #[error("overlay is open for {expected}, got a {got} value")]
    OverlayMismatch { expected: QuickAction, got: QuickAction },
}

/// Convenience alias used throughout the board crate.
pub type Result<T> = std::result::Result<T, BoardError>;

impl BoardError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<ColumnError> for BoardError {
    fn from(err: ColumnError) -> Self {
        match err {
            ColumnError::ColumnNotFound(id) => Self::not_found("column", id),
            ColumnError::TaskNotFound { task_id, .. } => Self::not_found("task", task_id),
            other => Self::Column(other),
        }
    }
}
