//! Core logic for chipnote: chip classification, chip-input state and
//! task persistence.

pub mod bus;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod store;

pub use bus::{AlertBanner, MessageBus};
pub use classifier::{
    classify, is_contact, is_email, is_link, is_plain_text, is_tag, is_valid_email_format,
    partition, starts_with_lowercase, starts_with_uppercase,
};
pub use config::{ConfigError, ControllerConfig};
pub use controller::chip_input::{ChipInputController, ChipView, SubmitOutcome, EMPTY_ITEMS_MESSAGE};
pub use controller::input::{ItemActivation, Key, KeyOutcome, RecognizedRegions, TaskForm};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, ChipColor, UnknownCategory};
pub use model::task::{CategorizedTokens, Task, TaskId, TaskItem};
pub use store::memory_store::MemoryTaskStore;
pub use store::sqlite_store::SqliteTaskStore;
pub use store::task_store::{StoreError, StoreResult, TaskFeed, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
