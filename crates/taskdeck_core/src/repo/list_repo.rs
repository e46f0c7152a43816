//! Task-list repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `task_lists` storage.
//! - Own the lazy get-or-create path for the reserved inbox list.
//!
//! # Invariants
//! - Every statement filters by `created_by`; rows of other owners are never
//!   observable through this API.
//! - Inbox uniqueness is enforced by the store (`task_lists_inbox_guard`);
//!   a racing creator recovers by re-reading the winner's row.

use crate::model::task_list::{ListId, TaskListRecord, INBOX_NAME};
use crate::model::UserId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const LIST_SELECT_SQL: &str = "SELECT
    list_uuid,
    name,
    created_by,
    created_at
FROM task_lists";

const LIST_COLUMNS: &[&str] = &["id", "list_uuid", "name", "created_by", "created_at"];

/// Repository interface for task-list operations, scoped to one owner per
/// call.
pub trait ListRepository {
    /// Persists a new list for `owner` and returns the stored record.
    fn create_list(&self, owner: UserId, name: &str) -> RepoResult<TaskListRecord>;
    /// Gets one list by id. `None` covers both absence and foreign ownership.
    fn get_list(&self, owner: UserId, id: ListId) -> RepoResult<Option<TaskListRecord>>;
    /// Lists the owner's lists in creation order.
    fn list_lists(&self, owner: UserId) -> RepoResult<Vec<TaskListRecord>>;
    /// Renames one list. The caller is responsible for reserved-name policy.
    fn rename_list(&self, owner: UserId, id: ListId, name: &str) -> RepoResult<()>;
    /// Deletes one list. Tasks referencing it keep their rows and lose the
    /// reference (`ON DELETE SET NULL`).
    fn delete_list(&self, owner: UserId, id: ListId) -> RepoResult<()>;
    /// Returns the owner's inbox, creating it if absent.
    fn get_or_create_inbox(&self, owner: UserId) -> RepoResult<TaskListRecord>;
}

/// SQLite-backed task-list repository.
pub struct SqliteListRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteListRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("task_lists", LIST_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl ListRepository for SqliteListRepository<'_> {
    fn create_list(&self, owner: UserId, name: &str) -> RepoResult<TaskListRecord> {
        let normalized = crate::model::task_list::normalize_list_name(name)?;
        if normalized == INBOX_NAME {
            return get_or_create_inbox_row(self.conn, owner);
        }

        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO task_lists (list_uuid, name, created_by)
             VALUES (?1, ?2, ?3);",
            params![uuid.to_string(), normalized, owner.to_string()],
        )?;

        self.get_list(owner, uuid)?.ok_or_else(|| {
            RepoError::InvalidData("created list not found in read-back".to_string())
        })
    }

    fn get_list(&self, owner: UserId, id: ListId) -> RepoResult<Option<TaskListRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL}
             WHERE list_uuid = ?1
               AND created_by = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_list_row(row)?));
        }
        Ok(None)
    }

    fn list_lists(&self, owner: UserId) -> RepoResult<Vec<TaskListRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LIST_SELECT_SQL}
             WHERE created_by = ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut lists = Vec::new();
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row)?);
        }
        Ok(lists)
    }

    fn rename_list(&self, owner: UserId, id: ListId, name: &str) -> RepoResult<()> {
        let normalized = crate::model::task_list::normalize_list_name(name)?;
        let changed = self.conn.execute(
            "UPDATE task_lists
             SET name = ?1
             WHERE list_uuid = ?2
               AND created_by = ?3;",
            params![normalized, id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        Ok(())
    }

    fn delete_list(&self, owner: UserId, id: ListId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM task_lists
             WHERE list_uuid = ?1
               AND created_by = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        info!("event=list_delete module=repo status=ok list={id}");
        Ok(())
    }

    fn get_or_create_inbox(&self, owner: UserId) -> RepoResult<TaskListRecord> {
        get_or_create_inbox_row(self.conn, owner)
    }
}

/// Returns the owner's inbox row, creating it when absent.
///
/// Shared by the list repository and the task save-time normalization path.
/// The read-then-create race is settled by the store's partial unique index:
/// a losing writer inserts nothing and recovers by re-reading.
pub(crate) fn get_or_create_inbox_row(
    conn: &Connection,
    owner: UserId,
) -> RepoResult<TaskListRecord> {
    if let Some(record) = find_inbox(conn, owner)? {
        return Ok(record);
    }

    let uuid = Uuid::new_v4();
    let inserted = conn.execute(
        "INSERT INTO task_lists (list_uuid, name, created_by)
         VALUES (?1, ?2, ?3)
         ON CONFLICT DO NOTHING;",
        params![uuid.to_string(), INBOX_NAME, owner.to_string()],
    )?;

    if inserted == 1 {
        info!("event=inbox_create module=repo status=ok");
    } else {
        // Lost the creation race; the winner's row is read back below.
        info!("event=inbox_create module=repo status=conflict_recovered");
    }

    find_inbox(conn, owner)?.ok_or_else(|| {
        RepoError::InvalidData("inbox row missing after get-or-create".to_string())
    })
}

fn find_inbox(conn: &Connection, owner: UserId) -> RepoResult<Option<TaskListRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{LIST_SELECT_SQL}
         WHERE created_by = ?1
           AND name = ?2;"
    ))?;

    let mut rows = stmt.query(params![owner.to_string(), INBOX_NAME])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_list_row(row)?));
    }
    Ok(None)
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<TaskListRecord> {
    let uuid_text: String = row.get("list_uuid")?;
    let list_uuid = parse_uuid(&uuid_text, "task_lists.list_uuid")?;

    let owner_text: String = row.get("created_by")?;
    let created_by = parse_uuid(&owner_text, "task_lists.created_by")?;

    Ok(TaskListRecord {
        list_uuid,
        name: row.get("name")?,
        created_by,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
