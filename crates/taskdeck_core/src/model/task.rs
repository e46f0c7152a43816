//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, the create draft and the update patch.
//! - Own title validation applied before any persistence write.
//!
//! # Invariants
//! - `task_uuid` is stable and never reused for another task.
//! - A task and the list it references always share the same owner.
//! - After save-time normalization a task references a list; the reference is
//!   only absent between a list deletion and the task's next write.

use crate::model::task_list::ListId;
use crate::model::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Stable external identifier.
    pub task_uuid: TaskId,
    /// Short description. Non-empty.
    pub title: String,
    /// Completion flag, `false` on creation by default.
    pub completed: bool,
    /// Optional due time in epoch milliseconds.
    pub due_date: Option<i64>,
    /// Referenced list. `None` only after the list was deleted and before the
    /// task's next write re-attaches the owner's inbox.
    pub task_list: Option<ListId>,
    /// Owning user.
    pub created_by: UserId,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Input for task creation.
///
/// `list` is an already-authorized target; `None` defers to save-time inbox
/// attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub completed: bool,
    pub due_date: Option<i64>,
    pub list: Option<ListId>,
}

impl TaskDraft {
    /// Creates a draft with defaults matching a bare `POST /tasks` body.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
            due_date: None,
            list: None,
        }
    }
}

/// Field set for task updates. `None` means "field not supplied"; supplied
/// fields are written, everything else is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<i64>,
    pub list: Option<ListId>,
}

impl TaskPatch {
    /// Returns whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
            && self.list.is_none()
    }
}

/// Validation error for task writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Full update is missing the required `title` field.
    MissingTitle,
    /// Full update is missing the required `completed` field.
    MissingCompleted,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::MissingTitle => write!(f, "full update requires a title"),
            Self::MissingCompleted => write!(f, "full update requires a completed flag"),
        }
    }
}

impl Error for TaskValidationError {}

impl TaskValidationError {
    /// Name of the request field the error applies to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::MissingTitle => "title",
            Self::MissingCompleted => "completed",
        }
    }
}

/// Normalizes a user-supplied task title for persistence.
pub fn normalize_title(title: &str) -> Result<String, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, TaskPatch, TaskValidationError};

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title(" write tests ").unwrap(), "write tests");
        assert_eq!(normalize_title("  "), Err(TaskValidationError::EmptyTitle));
    }

    #[test]
    fn empty_patch_reports_itself() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            completed: Some(true),
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
