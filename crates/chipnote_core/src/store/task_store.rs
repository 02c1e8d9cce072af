//! Task store contract, errors and push-based task feed.

use crate::db::DbError;
use crate::model::task::{CategorizedTokens, Task};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for task persistence and listing.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Caller tried to persist a partition without tokens.
    EmptyTask,
    InvalidData(String),
    /// Backend cannot serve requests (closed feed, poisoned lock, remote down).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyTask => write!(f, "cannot create task: item list empty"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::Unavailable(message) => write!(f, "task store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator used by `ChipInputController::submit`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists one task built from `tokens` and returns the stored record.
    async fn create_task(&self, tokens: &CategorizedTokens) -> StoreResult<Task>;

    /// Opens a feed over the current task list.
    async fn list_tasks(&self) -> StoreResult<TaskFeed>;
}

/// Push-based view over the persisted task list.
///
/// Every emission replaces the whole list; there are no incremental diffs.
#[derive(Debug, Clone)]
pub struct TaskFeed {
    rx: watch::Receiver<Vec<Task>>,
}

impl TaskFeed {
    pub fn new(rx: watch::Receiver<Vec<Task>>) -> Self {
        Self { rx }
    }

    /// Returns the latest list and marks it as seen.
    pub fn current(&mut self) -> Vec<Task> {
        self.rx.borrow_and_update().clone()
    }

    /// Waits for the next replacement list.
    ///
    /// # Errors
    /// - `StoreError::Unavailable` once the producing store is dropped.
    pub async fn changed(&mut self) -> StoreResult<Vec<Task>> {
        self.rx
            .changed()
            .await
            .map_err(|_| StoreError::Unavailable("task feed closed".to_string()))?;
        Ok(self.current())
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
