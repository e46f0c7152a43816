//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `tasks` storage.
//! - Apply save-time normalization: a task persisted without a list is
//!   attached to its owner's inbox.
//! - Compute scope-filtered listings and count aggregates in the store.
//!
//! # Invariants
//! - Every statement filters by `created_by`.
//! - `uncompleted` is always derived as `total - completed`, never queried
//!   separately.
//! - The list join never yields duplicate task rows.

use crate::model::task::{normalize_title, TaskDraft, TaskId, TaskPatch, TaskRecord};
use crate::model::task_list::ListId;
use crate::model::UserId;
use crate::repo::list_repo::{get_or_create_inbox_row, parse_uuid};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT DISTINCT
    tasks.task_uuid,
    tasks.title,
    tasks.completed,
    tasks.due_date,
    lists.list_uuid AS task_list,
    tasks.created_by,
    tasks.created_at
FROM tasks
LEFT JOIN task_lists lists ON lists.id = tasks.task_list_id";

const LIST_LINK_COLUMNS: &[&str] = &["id", "list_uuid", "name", "created_by"];

const TASK_COLUMNS: &[&str] = &[
    "id",
    "task_uuid",
    "title",
    "completed",
    "due_date",
    "task_list_id",
    "created_by",
    "created_at",
];

/// Filter applied to an owner's task set after target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// The owner's whole task set.
    All,
    /// Tasks attached to one already-authorized list.
    InList(ListId),
    /// Tasks carrying a due date, ordered by it.
    DueOnly,
}

/// Count aggregate over a resolved, owner-scoped task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: u32,
    pub completed: u32,
    pub uncompleted: u32,
}

/// Repository interface for task operations, scoped to one owner per call.
pub trait TaskRepository {
    /// Persists a new task. A draft without a list target is attached to the
    /// owner's inbox, creating the inbox if absent.
    fn create_task(&self, owner: UserId, draft: &TaskDraft) -> RepoResult<TaskRecord>;
    /// Gets one task by id. `None` covers both absence and foreign ownership.
    fn get_task(&self, owner: UserId, id: TaskId) -> RepoResult<Option<TaskRecord>>;
    /// Lists tasks within `scope`. `DueOnly` orders by due date ascending,
    /// everything else by creation time ascending.
    fn list_tasks(&self, owner: UserId, scope: TaskScope) -> RepoResult<Vec<TaskRecord>>;
    /// Applies the supplied patch fields, leaving all others untouched, and
    /// returns the updated record. Re-attaches the inbox if the task lost its
    /// list to a deletion.
    fn update_task(&self, owner: UserId, id: TaskId, patch: &TaskPatch) -> RepoResult<TaskRecord>;
    /// Deletes one task.
    fn delete_task(&self, owner: UserId, id: TaskId) -> RepoResult<()>;
    /// Counts tasks within `scope`.
    fn count_tasks(&self, owner: UserId, scope: TaskScope) -> RepoResult<TaskCounts>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[("tasks", TASK_COLUMNS), ("task_lists", LIST_LINK_COLUMNS)],
        )?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, owner: UserId, draft: &TaskDraft) -> RepoResult<TaskRecord> {
        let title = normalize_title(&draft.title)?;

        let list_uuid = match draft.list {
            Some(list) => list,
            None => get_or_create_inbox_row(self.conn, owner)?.list_uuid,
        };
        let list_row_id =
            list_row_id(self.conn, owner, list_uuid)?.ok_or(RepoError::ListNotFound(list_uuid))?;

        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (task_uuid, title, completed, due_date, task_list_id, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                uuid.to_string(),
                title,
                bool_to_int(draft.completed),
                draft.due_date,
                list_row_id,
                owner.to_string(),
            ],
        )?;

        self.get_task(owner, uuid)?.ok_or_else(|| {
            RepoError::InvalidData("created task not found in read-back".to_string())
        })
    }

    fn get_task(&self, owner: UserId, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE tasks.task_uuid = ?1
               AND tasks.created_by = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, owner: UserId, scope: TaskScope) -> RepoResult<Vec<TaskRecord>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE tasks.created_by = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(owner.to_string())];

        match scope {
            TaskScope::All => {}
            TaskScope::InList(list) => {
                sql.push_str(" AND lists.list_uuid = ?");
                bind_values.push(Value::Text(list.to_string()));
            }
            TaskScope::DueOnly => sql.push_str(" AND tasks.due_date IS NOT NULL"),
        }

        if scope == TaskScope::DueOnly {
            sql.push_str(" ORDER BY tasks.due_date ASC, tasks.id ASC");
        } else {
            sql.push_str(" ORDER BY tasks.created_at ASC, tasks.id ASC");
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update_task(&self, owner: UserId, id: TaskId, patch: &TaskPatch) -> RepoResult<TaskRecord> {
        let current = task_link_state(self.conn, owner, id)?.ok_or(RepoError::TaskNotFound(id))?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title.as_deref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(normalize_title(title)?));
        }
        if let Some(completed) = patch.completed {
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(due_date) = patch.due_date {
            assignments.push("due_date = ?");
            bind_values.push(Value::Integer(due_date));
        }
        if let Some(list) = patch.list {
            let row_id =
                list_row_id(self.conn, owner, list)?.ok_or(RepoError::ListNotFound(list))?;
            assignments.push("task_list_id = ?");
            bind_values.push(Value::Integer(row_id));
        } else if current.list_row_id.is_none() {
            // The task lost its list to a deletion; any write re-attaches the
            // owner's inbox.
            let inbox = get_or_create_inbox_row(self.conn, owner)?;
            let row_id = list_row_id(self.conn, owner, inbox.list_uuid)?
                .ok_or(RepoError::ListNotFound(inbox.list_uuid))?;
            assignments.push("task_list_id = ?");
            bind_values.push(Value::Integer(row_id));
        }

        if !assignments.is_empty() {
            let sql = format!(
                "UPDATE tasks SET {} WHERE id = ?;",
                assignments.join(", ")
            );
            bind_values.push(Value::Integer(current.task_row_id));
            self.conn.execute(&sql, params_from_iter(bind_values))?;
        }

        self.get_task(owner, id)?.ok_or_else(|| {
            RepoError::InvalidData("updated task not found in read-back".to_string())
        })
    }

    fn delete_task(&self, owner: UserId, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks
             WHERE task_uuid = ?1
               AND created_by = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }

    fn count_tasks(&self, owner: UserId, scope: TaskScope) -> RepoResult<TaskCounts> {
        let mut sql = String::from(
            "SELECT
                COUNT(DISTINCT tasks.id),
                COUNT(DISTINCT CASE WHEN tasks.completed = 1 THEN tasks.id END)
             FROM tasks
             LEFT JOIN task_lists lists ON lists.id = tasks.task_list_id
             WHERE tasks.created_by = ?",
        );
        let mut bind_values: Vec<Value> = vec![Value::Text(owner.to_string())];

        match scope {
            TaskScope::All => {}
            TaskScope::InList(list) => {
                sql.push_str(" AND lists.list_uuid = ?");
                bind_values.push(Value::Text(list.to_string()));
            }
            TaskScope::DueOnly => sql.push_str(" AND tasks.due_date IS NOT NULL"),
        }
        sql.push(';');

        let (total, completed) = self.conn.query_row(
            &sql,
            params_from_iter(bind_values),
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)),
        )?;

        Ok(TaskCounts {
            total,
            completed,
            uncompleted: total - completed,
        })
    }
}

struct TaskLinkState {
    task_row_id: i64,
    list_row_id: Option<i64>,
}

fn task_link_state(
    conn: &Connection,
    owner: UserId,
    id: TaskId,
) -> RepoResult<Option<TaskLinkState>> {
    let mut stmt = conn.prepare(
        "SELECT id, task_list_id
         FROM tasks
         WHERE task_uuid = ?1
           AND created_by = ?2;",
    )?;

    let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(TaskLinkState {
            task_row_id: row.get(0)?,
            list_row_id: row.get(1)?,
        }));
    }
    Ok(None)
}

fn list_row_id(conn: &Connection, owner: UserId, list: ListId) -> RepoResult<Option<i64>> {
    let mut stmt = conn.prepare(
        "SELECT id
         FROM task_lists
         WHERE list_uuid = ?1
           AND created_by = ?2;",
    )?;

    let mut rows = stmt.query(params![list.to_string(), owner.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskRecord> {
    let uuid_text: String = row.get("task_uuid")?;
    let task_uuid = parse_uuid(&uuid_text, "tasks.task_uuid")?;

    let owner_text: String = row.get("created_by")?;
    let created_by = parse_uuid(&owner_text, "tasks.created_by")?;

    let task_list = match row.get::<_, Option<String>>("task_list")? {
        Some(value) => Some(parse_uuid(&value, "task_lists.list_uuid")?),
        None => None,
    };

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(TaskRecord {
        task_uuid,
        title: row.get("title")?,
        completed,
        due_date: row.get("due_date")?,
        task_list,
        created_by,
        created_at: row.get("created_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
