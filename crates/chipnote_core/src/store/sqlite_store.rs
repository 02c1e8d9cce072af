//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist tasks as ordered typed items (`task_items`) under one `tasks` row.
//! - Rebuild category partitions on read.
//! - Publish the full task list on the feed after every create.
//!   When the re-read fails, the new task is prepended to the last list.
//!
//! # Invariants
//! - A task row and its items are written in one transaction.
//! - Once that transaction commits, `create_task` reports success.
//! - Read paths reject unknown item kinds instead of masking them.
//! - Tasks are listed newest first (`created_at DESC, rowid DESC`).

use crate::db::{open_db, open_db_in_memory};
use crate::model::category::Category;
use crate::model::task::{CategorizedTokens, Task, TaskItem};
use crate::store::task_store::{now_epoch_ms, StoreError, StoreResult, TaskFeed, TaskStore};
use async_trait::async_trait;
use log::{error, info, warn};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
    feed: watch::Sender<Vec<Task>>,
}

impl SqliteTaskStore {
    /// Wraps a migrated connection and seeds the feed with stored tasks.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let tasks = load_tasks(&conn)?;
        let (feed, _) = watch::channel(tasks);
        Ok(Self {
            conn: Mutex::new(conn),
            feed,
        })
    }

    /// Opens (and migrates) a task database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("task connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create_task(&self, tokens: &CategorizedTokens) -> StoreResult<Task> {
        if tokens.is_empty() {
            return Err(StoreError::EmptyTask);
        }

        let task = Task::new(tokens.clone(), now_epoch_ms());
        let snapshot = {
            let mut conn = self.lock()?;
            if let Err(err) = insert_task(&mut conn, &task) {
                error!(
                    "event=task_create module=store status=error backend=sqlite error={}",
                    err
                );
                return Err(err);
            }
            load_tasks(&conn)
        };

        info!(
            "event=task_create module=store status=ok backend=sqlite item_count={}",
            tokens.len()
        );
        // The row is committed; a failed re-read must not turn into a create error.
        match snapshot {
            Ok(tasks) => {
                self.feed.send_replace(tasks);
            }
            Err(err) => {
                warn!(
                    "event=task_feed module=store status=error backend=sqlite error={}",
                    err
                );
                let created = task.clone();
                self.feed.send_modify(|tasks| tasks.insert(0, created));
            }
        }
        Ok(task)
    }

    async fn list_tasks(&self) -> StoreResult<TaskFeed> {
        Ok(TaskFeed::new(self.feed.subscribe()))
    }
}

fn insert_task(conn: &mut Connection, task: &Task) -> StoreResult<()> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO tasks (uuid, created_at) VALUES (?1, ?2);",
        params![task.id.to_string(), task.created_at],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO task_items (task_uuid, position, kind, value)
             VALUES (?1, ?2, ?3, ?4);",
        )?;
        for (position, item) in task.items().iter().enumerate() {
            stmt.execute(params![
                task.id.to_string(),
                i64::try_from(position).unwrap_or(i64::MAX),
                item.kind.as_str(),
                item.value.as_str(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn load_tasks(conn: &Connection) -> StoreResult<Vec<Task>> {
    let mut stmt =
        conn.prepare("SELECT uuid, created_at FROM tasks ORDER BY created_at DESC, rowid DESC;")?;
    let mut rows = stmt.query([])?;
    let mut tasks = Vec::new();

    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        let id = Uuid::parse_str(&uuid_text).map_err(|_| {
            StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
        })?;
        let items = load_items(conn, &uuid_text)?;
        tasks.push(Task::with_id(
            id,
            CategorizedTokens::from_items(items),
            row.get("created_at")?,
        ));
    }

    Ok(tasks)
}

fn load_items(conn: &Connection, task_uuid: &str) -> StoreResult<Vec<TaskItem>> {
    let mut stmt = conn.prepare(
        "SELECT kind, value
         FROM task_items
         WHERE task_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([task_uuid])?;
    let mut items = Vec::new();

    while let Some(row) = rows.next()? {
        let kind_text: String = row.get("kind")?;
        let kind = kind_text.parse::<Category>().map_err(|err| {
            StoreError::InvalidData(format!("{err} in task_items.kind for task {task_uuid}"))
        })?;
        items.push(TaskItem {
            kind,
            value: row.get("value")?,
        });
    }

    Ok(items)
}
