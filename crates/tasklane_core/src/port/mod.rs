//! Ports to the environment of the drag core.
//!
//! # Responsibility
//! - Describe what the core consumes from the UI layer: row geometry, haptic
//!   impulses and viewport scroll control.
//! - Keep the core free of layout, device and rendering details.
//!
//! # Invariants
//! - Port failures never interrupt the gesture state machine.

pub mod geometry;
pub mod haptic;
pub mod scroll;
