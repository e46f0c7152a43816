//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for ownership and aggregation
//! invariants; transport and authentication layers stay outside.

pub mod api;
pub mod authorize;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod resolve;
pub mod service;

pub use api::{
    Api, ApiError, ApiResult, ApiSuccess, CreateTaskRequest, ListNameRequest, UpdateTaskRequest,
};
pub use authorize::{authorize_list, resolve_task_scope};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{TaskDraft, TaskId, TaskPatch, TaskRecord, TaskValidationError};
pub use model::task_list::{
    ListId, ListValidationError, TaskListRecord, INBOX_NAME,
};
pub use model::UserId;
pub use repo::list_repo::{ListRepository, SqliteListRepository};
pub use repo::task_repo::{
    SqliteTaskRepository, TaskCounts, TaskRepository, TaskScope,
};
pub use repo::{RepoError, RepoResult};
pub use resolve::{resolve_list_reference, ReferenceError, ResolvedTarget};
pub use service::list_service::{ListService, ListServiceError};
pub use service::task_service::{NewTask, TaskService, TaskServiceError, TaskUpdate};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
