//! Task-list domain model.
//!
//! # Responsibility
//! - Define the task-list record and its naming rules.
//! - Reserve the per-owner `inbox` name used for lazy default attachment.
//!
//! # Invariants
//! - `list_uuid` is stable and never reused for another list.
//! - At most one list per owner bears the reserved name `inbox`.
//! - Names are non-empty after trimming; the reserved name compares
//!   case-insensitively.

use crate::model::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Reserved name of the per-owner default list.
pub const INBOX_NAME: &str = "inbox";

/// Stable identifier for a task list.
pub type ListId = Uuid;

/// Canonical task-list record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListRecord {
    /// Stable external identifier.
    pub list_uuid: ListId,
    /// Display name. Non-empty; `inbox` is reserved.
    pub name: String,
    /// Owning user.
    pub created_by: UserId,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl TaskListRecord {
    /// Returns whether this list is the owner's reserved inbox.
    pub fn is_inbox(&self) -> bool {
        self.name == INBOX_NAME
    }
}

/// Validation error for task-list writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValidationError {
    /// Name is empty after trimming.
    EmptyName,
}

impl Display for ListValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "list name must not be empty"),
        }
    }
}

impl Error for ListValidationError {}

/// Normalizes a user-supplied list name for persistence.
///
/// # Contract
/// - Surrounding whitespace is trimmed.
/// - Empty input is rejected.
/// - The reserved name is stored lowercase so the store-level inbox
///   uniqueness guard matches every spelling.
pub fn normalize_list_name(name: &str) -> Result<String, ListValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ListValidationError::EmptyName);
    }
    if trimmed.eq_ignore_ascii_case(INBOX_NAME) {
        return Ok(INBOX_NAME.to_string());
    }
    Ok(trimmed.to_string())
}
