//! Task-list use-case service.
//!
//! # Responsibility
//! - Provide create/list/get/rename/delete entry points over the list
//!   repository.
//! - Enforce the reserved-name policy for the inbox.
//!
//! # Invariants
//! - Referencing `inbox` always yields a list, creating it on first use.
//! - The inbox is never deleted and never renamed away from its reserved
//!   name; no other list may take that name.

use crate::authorize::authorize_list;
use crate::model::task_list::{ListId, ListValidationError, TaskListRecord, INBOX_NAME};
use crate::model::UserId;
use crate::repo::list_repo::ListRepository;
use crate::repo::RepoError;
use crate::resolve::ResolvedTarget;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task-list use-cases.
#[derive(Debug)]
pub enum ListServiceError {
    /// List input failed validation.
    InvalidList(ListValidationError),
    /// Target list absent, owned by somebody else, or not a list target.
    NotFound,
    /// Operation would break the reserved inbox invariant.
    ReservedName,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ListServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidList(err) => write!(f, "{err}"),
            Self::NotFound => write!(f, "list not found"),
            Self::ReservedName => {
                write!(f, "`{INBOX_NAME}` is reserved and cannot be renamed or deleted")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidList(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ListServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ListNotFound(_) => Self::NotFound,
            RepoError::InvalidList(err) => Self::InvalidList(err),
            other => Self::Repo(other),
        }
    }
}

/// List service facade over the repository.
pub struct ListService<L: ListRepository> {
    lists: L,
}

impl<L: ListRepository> ListService<L> {
    /// Creates a service using the provided repository implementation.
    pub fn new(lists: L) -> Self {
        Self { lists }
    }

    /// Creates a list for the owner. Creating under the reserved name is
    /// folded into inbox get-or-create.
    pub fn create_list(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<TaskListRecord, ListServiceError> {
        Ok(self.lists.create_list(owner, name)?)
    }

    /// Lists the owner's lists in creation order.
    pub fn list_lists(&self, owner: UserId) -> Result<Vec<TaskListRecord>, ListServiceError> {
        Ok(self.lists.list_lists(owner)?)
    }

    /// Gets one list by resolved target. `Inbox` is created on first
    /// reference; filter-only targets never name a list.
    pub fn get_list(
        &self,
        owner: UserId,
        target: ResolvedTarget,
    ) -> Result<TaskListRecord, ListServiceError> {
        match target {
            ResolvedTarget::Inbox => Ok(self.lists.get_or_create_inbox(owner)?),
            ResolvedTarget::ById(id) => Ok(authorize_list(&self.lists, owner, id)?),
            ResolvedTarget::NoFilter | ResolvedTarget::Upcoming => {
                Err(ListServiceError::NotFound)
            }
        }
    }

    /// Renames one list, holding the reserved-name invariant in both
    /// directions.
    pub fn rename_list(
        &self,
        owner: UserId,
        target: ResolvedTarget,
        name: &str,
    ) -> Result<TaskListRecord, ListServiceError> {
        let record = self.get_list(owner, target)?;
        let normalized = crate::model::task_list::normalize_list_name(name)
            .map_err(ListServiceError::InvalidList)?;

        let takes_reserved_name = normalized == INBOX_NAME;
        if record.is_inbox() != takes_reserved_name {
            return Err(ListServiceError::ReservedName);
        }

        self.lists.rename_list(owner, record.list_uuid, &normalized)?;
        Ok(authorize_list(&self.lists, owner, record.list_uuid)?)
    }

    /// Deletes one list. The inbox is protected; tasks of a deleted list
    /// keep their rows and are re-attached to the inbox on their next write.
    pub fn delete_list(&self, owner: UserId, id: ListId) -> Result<(), ListServiceError> {
        let record = authorize_list(&self.lists, owner, id)?;
        if record.is_inbox() {
            return Err(ListServiceError::ReservedName);
        }
        Ok(self.lists.delete_list(owner, id)?)
    }
}
