//! Chip-input interaction layer.
//!
//! # Responsibility
//! - Translate widget events into token-batch and panel state changes.
//! - Keep the layer UI-framework agnostic: callers report keys, widths and
//!   region membership; the controller never touches a rendering tree.

pub mod chip_input;
pub mod input;
