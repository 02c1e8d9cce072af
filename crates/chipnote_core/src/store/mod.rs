//! Task persistence collaborators.
//!
//! # Responsibility
//! - Define the async `TaskStore` contract consumed by the chip controller.
//! - Provide SQLite-backed and in-process implementations.
//!
//! # Invariants
//! - Stores reject empty partitions with `StoreError::EmptyTask`.
//! - Every successful create publishes a fresh snapshot on the task feed.

pub mod memory_store;
pub mod sqlite_store;
pub mod task_store;
