//! Domain model for reorderable task lists.
//!
//! # Responsibility
//! - Define the task/section records supplied by the caller on every gesture.
//! - Model draggable entries as a tagged variant with explicit kind conversions.
//!
//! # Invariants
//! - Every record is identified by a stable `Uuid`-based id.
//! - Subtasks are a single level deep; a subtask never owns subtasks.
//! - The core never persists these values; collections are owned by the caller.

pub mod entry;
pub mod section;
pub mod task;
