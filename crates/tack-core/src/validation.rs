//! Task validation rules.
//!
//! Validation runs before any mutation: a rejected draft or update never
//! reaches the column model or the persistence adapter.

use crate::task::{Task, TaskDraft, TaskUpdates};

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 500;

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    TitleRequired,

    #[error("title must be 500 characters or less (got {0})")]
    TitleTooLong(usize),

    #[error("task id is required")]
    IdRequired,

    #[error("status is required")]
    StatusRequired,

    #[error("tags cannot be empty strings")]
    EmptyTag,
}

/// Validates a title: non-blank and at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong(len));
    }
    Ok(())
}

fn validate_tags<'a>(mut tags: impl Iterator<Item = &'a String>) -> Result<(), ValidationError> {
    if tags.any(|t| t.trim().is_empty()) {
        return Err(ValidationError::EmptyTag);
    }
    Ok(())
}

/// Validates a draft before it is handed to the persistence adapter.
pub fn validate_draft(draft: &TaskDraft) -> Result<(), ValidationError> {
    validate_title(&draft.title)?;
    if draft.status.trim().is_empty() {
        return Err(ValidationError::StatusRequired);
    }
    validate_tags(draft.tags.iter())
}

/// Validates a fully-formed task (e.g. one loaded from an adapter).
pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    if task.id.trim().is_empty() {
        return Err(ValidationError::IdRequired);
    }
    validate_title(&task.title)?;
    if task.status.trim().is_empty() {
        return Err(ValidationError::StatusRequired);
    }
    validate_tags(task.tags.iter())
}

/// Validates the fields a partial update would set.
pub fn validate_updates(updates: &TaskUpdates) -> Result<(), ValidationError> {
    if let Some(ref title) = updates.title {
        validate_title(title)?;
    }
    if let Some(ref status) = updates.status {
        if status.trim().is_empty() {
            return Err(ValidationError::StatusRequired);
        }
    }
    if let Some(ref tags) = updates.tags {
        validate_tags(tags.iter())?;
    }
    Ok(())
}
