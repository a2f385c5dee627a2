//! Long-press drag gesture handling.
//!
//! # Responsibility
//! - Classify pointer sequences as tap or drag (`controller`).
//! - Own the per-drag session and expose immutable frame snapshots (`session`).
//! - Hold caller-tunable gesture configuration (`config`).
//!
//! # Invariants
//! - One controller tracks at most one gesture at a time.
//! - The task collection is only produced at resolution, never mid-drag.

pub mod config;
pub mod controller;
pub mod session;
