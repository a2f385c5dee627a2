//! Pure drag engines.
//!
//! # Responsibility
//! - Map a dragged row position onto a drop target (`hit_test`).
//! - Turn a resolved drop target into the next task collection (`reorder`).
//!
//! # Invariants
//! - Engines are stateless and never touch caller-owned collections in place.
//! - Every mutation conserves the number of entries.

pub mod hit_test;
pub mod reorder;
pub mod target;
