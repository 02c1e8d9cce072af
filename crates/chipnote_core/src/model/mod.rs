//! Domain model for chip tokens and persisted tasks.
//!
//! # Responsibility
//! - Define the closed chip category set and its presentation palette.
//! - Define the categorized task shape shared by controller and stores.
//!
//! # Invariants
//! - Every classified token belongs to exactly one category sequence.
//! - A task with zero tokens is never persisted.

pub mod category;
pub mod task;
