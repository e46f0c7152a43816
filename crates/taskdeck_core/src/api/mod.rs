//! Transport-shaped API surface.
//!
//! # Responsibility
//! - Translate HTTP-shaped requests into core calls, one explicit handler
//!   per operation.
//! - Map core errors to transport status codes and human-readable `message`
//!   bodies.
//!
//! # Invariants
//! - Unauthenticated calls are rejected before any core logic runs.
//! - Every not-found response carries a message; a malformed reference is
//!   deliberately indistinguishable from an absent one.
//! - Handlers are compile-time request kinds; there is no dynamic dispatch
//!   on an operation name.

use crate::model::task::{TaskId, TaskRecord, TaskValidationError};
use crate::model::task_list::TaskListRecord;
use crate::model::UserId;
use crate::repo::list_repo::SqliteListRepository;
use crate::repo::task_repo::{SqliteTaskRepository, TaskCounts};
use crate::repo::RepoResult;
use crate::resolve::{resolve_list_reference, ResolvedTarget};
use crate::service::list_service::{ListService, ListServiceError};
use crate::service::task_service::{NewTask, TaskService, TaskServiceError, TaskUpdate};
use log::error;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL: u16 = 500;

const MSG_UNAUTHENTICATED: &str = "Authentication credentials were not provided.";
const MSG_TASK_NOT_FOUND: &str = "Task was not found.";
const MSG_LIST_TASKS: &str = "Task list was not found. We cannot list tasks.";
const MSG_COUNT_TASKS: &str = "List was not found. We cannot count tasks.";
const MSG_TASK_LIST: &str = "Task list was not found.";
const MSG_LIST_DETAIL: &str = "List Not found.";
const MSG_RESERVED: &str = "The inbox list is reserved and cannot be renamed or deleted.";
const MSG_INTERNAL: &str = "Internal server error.";

pub type ApiResult<T> = Result<ApiSuccess<T>, ApiError>;

/// Success envelope carrying the transport status and the body payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSuccess<T> {
    pub status: u16,
    pub body: T,
}

/// Failure envelope. `status` maps to the transport layer; the remaining
/// fields serialize as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ApiError {
    fn unauthenticated() -> Self {
        Self {
            status: STATUS_UNAUTHORIZED,
            message: MSG_UNAUTHENTICATED.to_string(),
            field: None,
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            message: message.to_string(),
            field: None,
        }
    }

    fn validation(err: &TaskValidationError) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: err.to_string(),
            field: Some(err.field()),
        }
    }

    fn reserved_name() -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: MSG_RESERVED.to_string(),
            field: Some("name"),
        }
    }

    fn internal(err: &dyn std::fmt::Display) -> Self {
        error!("event=api_error module=api status=error error={err}");
        Self {
            status: STATUS_INTERNAL,
            message: MSG_INTERNAL.to_string(),
            field: None,
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub task_list: Option<String>,
}

/// Body of `PATCH|PUT /tasks/{uuid}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub task_list: Option<String>,
}

/// Body of `POST /lists` and `PATCH /lists/{uuid|inbox}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListNameRequest {
    pub name: String,
}

/// Per-operation handlers over one store connection.
///
/// One instance serves one logical request; the verified identity arrives as
/// `Option<UserId>` from the external authentication collaborator.
pub struct Api<'conn> {
    tasks: TaskService<SqliteTaskRepository<'conn>, SqliteListRepository<'conn>>,
    lists: ListService<SqliteListRepository<'conn>>,
}

impl<'conn> Api<'conn> {
    /// Builds the handler set over a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            tasks: TaskService::new(
                SqliteTaskRepository::try_new(conn)?,
                SqliteListRepository::try_new(conn)?,
            ),
            lists: ListService::new(SqliteListRepository::try_new(conn)?),
        })
    }

    /// `GET /tasks?list=<ref>`
    pub fn list_tasks(
        &self,
        auth: Option<UserId>,
        list: Option<&str>,
    ) -> ApiResult<Vec<TaskRecord>> {
        let owner = require_user(auth)?;
        let target = resolve_or_not_found(list, MSG_LIST_TASKS)?;
        let tasks = self
            .tasks
            .list_tasks(owner, target)
            .map_err(|err| map_task_error(err, MSG_LIST_TASKS))?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: tasks,
        })
    }

    /// `POST /tasks`
    pub fn create_task(
        &self,
        auth: Option<UserId>,
        request: &CreateTaskRequest,
    ) -> ApiResult<TaskRecord> {
        let owner = require_user(auth)?;
        let target = resolve_or_not_found(request.task_list.as_deref(), MSG_TASK_LIST)?;
        let task = self
            .tasks
            .create_task(
                owner,
                NewTask {
                    title: request.title.clone(),
                    completed: request.completed,
                    due_date: request.due_date,
                    list: target,
                },
            )
            .map_err(|err| map_task_error(err, MSG_TASK_LIST))?;
        Ok(ApiSuccess {
            status: STATUS_CREATED,
            body: task,
        })
    }

    /// `GET /tasks/{uuid}`
    pub fn task_detail(&self, auth: Option<UserId>, task_uuid: &str) -> ApiResult<TaskRecord> {
        let owner = require_user(auth)?;
        let id = parse_task_uuid(task_uuid)?;
        let task = self
            .tasks
            .get_task(owner, id)
            .map_err(|err| map_task_error(err, MSG_TASK_LIST))?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: task,
        })
    }

    /// `PATCH|PUT /tasks/{uuid}`; `partial` distinguishes the two verbs.
    pub fn update_task(
        &self,
        auth: Option<UserId>,
        task_uuid: &str,
        request: &UpdateTaskRequest,
        partial: bool,
    ) -> ApiResult<TaskRecord> {
        let owner = require_user(auth)?;
        let id = parse_task_uuid(task_uuid)?;
        let list = match request.task_list.as_deref() {
            Some(raw) => Some(resolve_or_not_found(Some(raw), MSG_TASK_LIST)?),
            None => None,
        };
        let task = self
            .tasks
            .update_task(
                owner,
                id,
                TaskUpdate {
                    title: request.title.clone(),
                    completed: request.completed,
                    due_date: request.due_date,
                    list,
                },
                partial,
            )
            .map_err(|err| map_task_error(err, MSG_TASK_LIST))?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: task,
        })
    }

    /// `DELETE /tasks/{uuid}`
    pub fn delete_task(&self, auth: Option<UserId>, task_uuid: &str) -> ApiResult<()> {
        let owner = require_user(auth)?;
        let id = parse_task_uuid(task_uuid)?;
        self.tasks
            .delete_task(owner, id)
            .map_err(|err| map_task_error(err, MSG_TASK_LIST))?;
        Ok(ApiSuccess {
            status: STATUS_NO_CONTENT,
            body: (),
        })
    }

    /// `GET /tasks/count?list=<ref>`
    pub fn count_tasks(&self, auth: Option<UserId>, list: Option<&str>) -> ApiResult<TaskCounts> {
        let owner = require_user(auth)?;
        let target = resolve_or_not_found(list, MSG_COUNT_TASKS)?;
        let counts = self
            .tasks
            .count_tasks(owner, target)
            .map_err(|err| map_task_error(err, MSG_COUNT_TASKS))?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: counts,
        })
    }

    /// `GET /tasks/upcoming`
    pub fn upcoming_tasks(&self, auth: Option<UserId>) -> ApiResult<Vec<TaskRecord>> {
        let owner = require_user(auth)?;
        let tasks = self
            .tasks
            .upcoming_tasks(owner)
            .map_err(|err| map_task_error(err, MSG_TASK_LIST))?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: tasks,
        })
    }

    /// `GET /lists`
    pub fn list_lists(&self, auth: Option<UserId>) -> ApiResult<Vec<TaskListRecord>> {
        let owner = require_user(auth)?;
        let lists = self.lists.list_lists(owner).map_err(map_list_error)?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: lists,
        })
    }

    /// `POST /lists`
    pub fn create_list(
        &self,
        auth: Option<UserId>,
        request: &ListNameRequest,
    ) -> ApiResult<TaskListRecord> {
        let owner = require_user(auth)?;
        let list = self
            .lists
            .create_list(owner, &request.name)
            .map_err(map_list_error)?;
        Ok(ApiSuccess {
            status: STATUS_CREATED,
            body: list,
        })
    }

    /// `GET /lists/{uuid|inbox}` -- referencing `inbox` creates it if absent.
    pub fn list_detail(&self, auth: Option<UserId>, reference: &str) -> ApiResult<TaskListRecord> {
        let owner = require_user(auth)?;
        let target = resolve_or_not_found(Some(reference), MSG_LIST_DETAIL)?;
        let list = self
            .lists
            .get_list(owner, target)
            .map_err(map_list_error)?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: list,
        })
    }

    /// `PATCH /lists/{uuid|inbox}`
    pub fn rename_list(
        &self,
        auth: Option<UserId>,
        reference: &str,
        request: &ListNameRequest,
    ) -> ApiResult<TaskListRecord> {
        let owner = require_user(auth)?;
        let target = resolve_or_not_found(Some(reference), MSG_LIST_DETAIL)?;
        let list = self
            .lists
            .rename_list(owner, target, &request.name)
            .map_err(map_list_error)?;
        Ok(ApiSuccess {
            status: STATUS_OK,
            body: list,
        })
    }

    /// `DELETE /lists/{uuid|inbox}`
    pub fn delete_list(&self, auth: Option<UserId>, reference: &str) -> ApiResult<()> {
        let owner = require_user(auth)?;
        let target = resolve_or_not_found(Some(reference), MSG_LIST_DETAIL)?;
        match target {
            ResolvedTarget::ById(id) => {
                self.lists.delete_list(owner, id).map_err(map_list_error)?;
            }
            ResolvedTarget::Inbox => return Err(ApiError::reserved_name()),
            ResolvedTarget::NoFilter | ResolvedTarget::Upcoming => {
                return Err(ApiError::not_found(MSG_LIST_DETAIL));
            }
        }
        Ok(ApiSuccess {
            status: STATUS_NO_CONTENT,
            body: (),
        })
    }
}

fn require_user(auth: Option<UserId>) -> Result<UserId, ApiError> {
    auth.ok_or_else(ApiError::unauthenticated)
}

fn resolve_or_not_found(
    raw: Option<&str>,
    message: &str,
) -> Result<ResolvedTarget, ApiError> {
    resolve_list_reference(raw).map_err(|_| ApiError::not_found(message))
}

fn parse_task_uuid(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(MSG_TASK_NOT_FOUND))
}

fn map_task_error(err: TaskServiceError, list_message: &str) -> ApiError {
    match err {
        TaskServiceError::TaskNotFound(_) => ApiError::not_found(MSG_TASK_NOT_FOUND),
        TaskServiceError::ListNotFound => ApiError::not_found(list_message),
        TaskServiceError::InvalidTask(validation) => ApiError::validation(&validation),
        TaskServiceError::Repo(repo) => ApiError::internal(&repo),
    }
}

fn map_list_error(err: ListServiceError) -> ApiError {
    match err {
        ListServiceError::NotFound => ApiError::not_found(MSG_LIST_DETAIL),
        ListServiceError::ReservedName => ApiError::reserved_name(),
        ListServiceError::InvalidList(validation) => ApiError {
            status: STATUS_BAD_REQUEST,
            message: validation.to_string(),
            field: Some("name"),
        },
        ListServiceError::Repo(repo) => ApiError::internal(&repo),
    }
}
