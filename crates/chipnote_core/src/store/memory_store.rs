//! In-process task store.
//!
//! Keeps tasks newest first in the feed channel itself; nothing survives the
//! process.

use crate::model::task::{CategorizedTokens, Task};
use crate::store::task_store::{now_epoch_ms, StoreError, StoreResult, TaskFeed, TaskStore};
use async_trait::async_trait;
use log::info;
use tokio::sync::watch;

pub struct MemoryTaskStore {
    feed: watch::Sender<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self { feed }
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.feed.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create_task(&self, tokens: &CategorizedTokens) -> StoreResult<Task> {
        if tokens.is_empty() {
            return Err(StoreError::EmptyTask);
        }

        let task = Task::new(tokens.clone(), now_epoch_ms());
        self.feed.send_modify(|tasks| tasks.insert(0, task.clone()));
        info!(
            "event=task_create module=store status=ok backend=memory item_count={}",
            tokens.len()
        );
        Ok(task)
    }

    async fn list_tasks(&self) -> StoreResult<TaskFeed> {
        Ok(TaskFeed::new(self.feed.subscribe()))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTaskStore;
    use crate::model::category::Category;
    use crate::model::task::CategorizedTokens;
    use crate::store::task_store::{StoreError, TaskStore};

    #[tokio::test]
    async fn create_prepends_and_rejects_empty() {
        let store = MemoryTaskStore::new();
        let err = store
            .create_task(&CategorizedTokens::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyTask));

        let mut first = CategorizedTokens::default();
        first.push(Category::PlainText, "first");
        let mut second = CategorizedTokens::default();
        second.push(Category::Tag, "#second");
        store.create_task(&first).await.unwrap();
        let created = store.create_task(&second).await.unwrap();

        let mut feed = store.list_tasks().await.unwrap();
        let tasks = feed.current();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, created.id);
        assert_eq!(store.len(), 2);
    }
}
