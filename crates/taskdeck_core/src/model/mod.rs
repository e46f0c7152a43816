//! Domain model for owner-scoped task management.
//!
//! # Responsibility
//! - Define the canonical task and task-list records used by core logic.
//! - Own field-level validation rules applied before any persistence write.
//!
//! # Invariants
//! - Every record is identified by a stable UUID distinct from storage row ids.
//! - Every record carries exactly one owner (`UserId`).

use uuid::Uuid;

pub mod task;
pub mod task_list;

/// Stable identifier of an authenticated owner.
///
/// Issued and verified by the external authentication collaborator; core code
/// treats it as an opaque scoping key.
pub type UserId = Uuid;
