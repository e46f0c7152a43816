//! Task use-case service and aggregation engine.
//!
//! # Responsibility
//! - Provide list/create/get/update/delete entry points over the task
//!   repository, with list targets authorized through the gate.
//! - Compute count aggregates and the upcoming-due projection.
//!
//! # Invariants
//! - Full updates require `title` and `completed`; unsupplied optional fields
//!   are left untouched, never nulled.
//! - `upcoming` is defined as "has a due date"; ordering is due date
//!   ascending.
//! - Counts always satisfy `total == completed + uncompleted`.

use crate::authorize::{authorize_list, resolve_task_scope};
use crate::model::task::{TaskDraft, TaskId, TaskPatch, TaskRecord, TaskValidationError};
use crate::model::task_list::ListId;
use crate::model::UserId;
use crate::repo::list_repo::ListRepository;
use crate::repo::task_repo::{TaskCounts, TaskRepository, TaskScope};
use crate::repo::RepoError;
use crate::resolve::ResolvedTarget;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Task input failed validation.
    InvalidTask(TaskValidationError),
    /// Target task absent or owned by somebody else.
    TaskNotFound(TaskId),
    /// Referenced list absent, owned by somebody else, or not a list target.
    ListNotFound,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTask(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ListNotFound => write!(f, "referenced list not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::ListNotFound(_) => Self::ListNotFound,
            RepoError::InvalidTask(err) => Self::InvalidTask(err),
            other => Self::Repo(other),
        }
    }
}

/// Input for task creation at the use-case level. The list target comes
/// straight from the resolver; authorization happens inside the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub due_date: Option<i64>,
    pub list: ResolvedTarget,
}

/// Field set for task updates at the use-case level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<i64>,
    pub list: Option<ResolvedTarget>,
}

/// Task service facade over the repositories.
pub struct TaskService<T: TaskRepository, L: ListRepository> {
    tasks: T,
    lists: L,
}

impl<T: TaskRepository, L: ListRepository> TaskService<T, L> {
    /// Creates a service using the provided repository implementations.
    pub fn new(tasks: T, lists: L) -> Self {
        Self { tasks, lists }
    }

    /// Lists the owner's tasks within the resolved target.
    pub fn list_tasks(
        &self,
        owner: UserId,
        target: ResolvedTarget,
    ) -> Result<Vec<TaskRecord>, TaskServiceError> {
        let scope = resolve_task_scope(&self.lists, owner, target)?;
        Ok(self.tasks.list_tasks(owner, scope)?)
    }

    /// Creates a task for the owner. With no list target the save-time
    /// normalization attaches the owner's inbox.
    pub fn create_task(&self, owner: UserId, input: NewTask) -> Result<TaskRecord, TaskServiceError> {
        let list = self.authorize_attachment(owner, input.list)?;
        let draft = TaskDraft {
            title: input.title,
            completed: input.completed,
            due_date: input.due_date,
            list,
        };
        Ok(self.tasks.create_task(owner, &draft)?)
    }

    /// Gets one task by id.
    pub fn get_task(&self, owner: UserId, id: TaskId) -> Result<TaskRecord, TaskServiceError> {
        self.tasks
            .get_task(owner, id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Updates one task. `partial = false` enforces the full-update contract:
    /// `title` and `completed` must be supplied; optional fields that are not
    /// supplied stay untouched either way.
    pub fn update_task(
        &self,
        owner: UserId,
        id: TaskId,
        update: TaskUpdate,
        partial: bool,
    ) -> Result<TaskRecord, TaskServiceError> {
        if !partial {
            if update.title.is_none() {
                return Err(TaskServiceError::InvalidTask(
                    TaskValidationError::MissingTitle,
                ));
            }
            if update.completed.is_none() {
                return Err(TaskServiceError::InvalidTask(
                    TaskValidationError::MissingCompleted,
                ));
            }
        }

        let list = match update.list {
            Some(target) => self.authorize_attachment(owner, target)?,
            None => None,
        };
        let patch = TaskPatch {
            title: update.title,
            completed: update.completed,
            due_date: update.due_date,
            list,
        };
        Ok(self.tasks.update_task(owner, id, &patch)?)
    }

    /// Deletes one task.
    pub fn delete_task(&self, owner: UserId, id: TaskId) -> Result<(), TaskServiceError> {
        Ok(self.tasks.delete_task(owner, id)?)
    }

    /// Counts the owner's tasks within the resolved target.
    ///
    /// `uncompleted` is derived from `total - completed` in the store query,
    /// so the invariant cannot drift.
    pub fn count_tasks(
        &self,
        owner: UserId,
        target: ResolvedTarget,
    ) -> Result<TaskCounts, TaskServiceError> {
        let scope = resolve_task_scope(&self.lists, owner, target)?;
        Ok(self.tasks.count_tasks(owner, scope)?)
    }

    /// Lists the owner's due-dated tasks, ascending by due date.
    pub fn upcoming_tasks(&self, owner: UserId) -> Result<Vec<TaskRecord>, TaskServiceError> {
        Ok(self.tasks.list_tasks(owner, TaskScope::DueOnly)?)
    }

    /// Authorizes a list target used as a task attachment.
    ///
    /// `NoFilter` defers to save-time inbox attachment; an explicit `Inbox`
    /// resolves (and lazily creates) the reserved list; `Upcoming` is a
    /// projection keyword and never a valid attachment.
    fn authorize_attachment(
        &self,
        owner: UserId,
        target: ResolvedTarget,
    ) -> Result<Option<ListId>, TaskServiceError> {
        match target {
            ResolvedTarget::NoFilter => Ok(None),
            ResolvedTarget::Inbox => {
                let inbox = self.lists.get_or_create_inbox(owner)?;
                Ok(Some(inbox.list_uuid))
            }
            ResolvedTarget::Upcoming => Err(TaskServiceError::ListNotFound),
            ResolvedTarget::ById(id) => {
                let list = authorize_list(&self.lists, owner, id)?;
                Ok(Some(list.list_uuid))
            }
        }
    }
}
