//! Task domain model.
//!
//! # Responsibility
//! - Define the five-way token partition produced on submit.
//! - Define the persisted task record and its flat typed-item view.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - Category sequences preserve the order tokens were entered in.
//! - A persisted task always holds at least one token.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a persisted task.
pub type TaskId = Uuid;

/// Tokens grouped by category, ready to be persisted as one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTokens {
    pub email: Vec<String>,
    pub contacts: Vec<String>,
    pub text: Vec<String>,
    pub tags: Vec<String>,
    pub links: Vec<String>,
}

impl CategorizedTokens {
    /// Appends one token to the sequence owned by `category`.
    pub fn push(&mut self, category: Category, token: impl Into<String>) {
        self.bucket_mut(category).push(token.into());
    }

    /// Returns the sequence owned by `category`.
    pub fn bucket(&self, category: Category) -> &[String] {
        match category {
            Category::Email => &self.email,
            Category::Contact => &self.contacts,
            Category::PlainText => &self.text,
            Category::Tag => &self.tags,
            Category::Link => &self.links,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Email => &mut self.email,
            Category::Contact => &mut self.contacts,
            Category::PlainText => &mut self.text,
            Category::Tag => &mut self.tags,
            Category::Link => &mut self.links,
        }
    }

    /// Total number of tokens across all categories.
    pub fn len(&self) -> usize {
        Category::PRECEDENCE
            .iter()
            .map(|category| self.bucket(*category).len())
            .sum()
    }

    /// True when no category holds a token.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the partition into typed items, grouped in precedence order.
    pub fn items(&self) -> Vec<TaskItem> {
        Category::PRECEDENCE
            .iter()
            .flat_map(|category| {
                self.bucket(*category).iter().map(move |value| TaskItem {
                    kind: *category,
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Rebuilds a partition from flat typed items, keeping item order.
    pub fn from_items(items: impl IntoIterator<Item = TaskItem>) -> Self {
        let mut tokens = Self::default();
        for item in items {
            tokens.push(item.kind, item.value);
        }
        tokens
    }
}

/// One typed value of a task, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    #[serde(rename = "type")]
    pub kind: Category,
    pub value: String,
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(flatten)]
    pub tokens: CategorizedTokens,
}

impl Task {
    /// Creates a task with a generated stable ID.
    pub fn new(tokens: CategorizedTokens, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), tokens, created_at)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by stores when rebuilding persisted rows.
    pub fn with_id(id: TaskId, tokens: CategorizedTokens, created_at: i64) -> Self {
        Self {
            id,
            created_at,
            tokens,
        }
    }

    /// Flat typed-item view of this task.
    pub fn items(&self) -> Vec<TaskItem> {
        self.tokens.items()
    }
}

#[cfg(test)]
mod tests {
    use super::{CategorizedTokens, TaskItem};
    use crate::model::category::Category;

    #[test]
    fn push_routes_tokens_to_their_bucket() {
        let mut tokens = CategorizedTokens::default();
        tokens.push(Category::Tag, "#a");
        tokens.push(Category::PlainText, "note");
        tokens.push(Category::Tag, "#b");

        assert_eq!(tokens.tags, vec!["#a".to_string(), "#b".to_string()]);
        assert_eq!(tokens.text, vec!["note".to_string()]);
        assert_eq!(tokens.len(), 3);
        assert!(!tokens.is_empty());
    }

    #[test]
    fn items_rebuild_the_same_partition() {
        let mut tokens = CategorizedTokens::default();
        tokens.push(Category::Link, "https://a.dev");
        tokens.push(Category::Email, "me@a.dev");
        tokens.push(Category::Link, "http://b.dev");

        let items = tokens.items();
        assert_eq!(
            items[0],
            TaskItem {
                kind: Category::Email,
                value: "me@a.dev".to_string()
            }
        );
        assert_eq!(CategorizedTokens::from_items(items), tokens);
    }
}
