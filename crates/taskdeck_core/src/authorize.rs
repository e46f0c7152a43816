//! Ownership authorization gate.
//!
//! # Responsibility
//! - Convert a resolved list target into a concrete, owner-authorized task
//!   scope.
//! - Trigger lazy inbox creation when the reserved target is referenced.
//!
//! # Invariants
//! - A list that exists under another owner fails exactly like a missing
//!   list (`ListNotFound`); ownership is never revealed as a distinct signal.
//! - Resolution order is fixed: parse happened upstream, authorization here,
//!   reads/mutations downstream observe only the authorized scope.
//!
//! Task-level authorization needs no separate gate: every task repository
//! path filters by `(task_uuid, created_by)` and reports `TaskNotFound` for
//! foreign rows.

use crate::model::task_list::{ListId, TaskListRecord};
use crate::model::UserId;
use crate::repo::list_repo::ListRepository;
use crate::repo::task_repo::TaskScope;
use crate::repo::{RepoError, RepoResult};
use crate::resolve::ResolvedTarget;

/// Authorizes `target` for `owner` and returns the task scope to query.
///
/// `Inbox` is the only target with a side effect: the reserved list is
/// created on first reference.
pub fn resolve_task_scope<L: ListRepository>(
    lists: &L,
    owner: UserId,
    target: ResolvedTarget,
) -> RepoResult<TaskScope> {
    match target {
        ResolvedTarget::NoFilter => Ok(TaskScope::All),
        ResolvedTarget::Upcoming => Ok(TaskScope::DueOnly),
        ResolvedTarget::Inbox => {
            let inbox = lists.get_or_create_inbox(owner)?;
            Ok(TaskScope::InList(inbox.list_uuid))
        }
        ResolvedTarget::ById(id) => {
            let list = authorize_list(lists, owner, id)?;
            Ok(TaskScope::InList(list.list_uuid))
        }
    }
}

/// Looks up one list, converting absence and foreign ownership into the same
/// `ListNotFound` signal.
pub fn authorize_list<L: ListRepository>(
    lists: &L,
    owner: UserId,
    id: ListId,
) -> RepoResult<TaskListRecord> {
    lists
        .get_list(owner, id)?
        .ok_or(RepoError::ListNotFound(id))
}
