//! Touch-driven reorder core for Tasklane.
//! Turns long-press drags over task lists into order-preserving collection updates.

pub mod engine;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod port;
pub mod replay;

pub use engine::hit_test::{
    indicator_y, resolve_drop_target, HitTestInput, HitTestMode, SECTION_ESCAPE_DISTANCE_PX,
    SUBTASK_ZONE_SPAN, SUBTASK_ZONE_START,
};
pub use engine::reorder::{apply_drop, KindConversion, ReorderError, Reordered};
pub use engine::target::{DropPosition, DropTarget, TargetKey};
pub use gesture::config::{ConfigError, GestureConfig};
pub use gesture::controller::{
    DragOutcome, DragSurface, GestureError, NoOpReason, ReorderController,
};
pub use gesture::session::{DragFrame, DragPhase, PointerEvent};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    draggable_surface, entry_for, locate_entry, DraggableEntry, EntryKind, EntryLocation,
};
pub use model::section::{Section, SectionId};
pub use model::task::{check_tree_invariants, entry_count, Task, TaskId, TreeInvariantError};
pub use port::geometry::{GeometryMap, GeometryProvider, Rect};
pub use port::haptic::{HapticError, HapticIntensity, HapticPort, NoHaptics};
pub use port::scroll::{NoScrollLock, ScrollLock};
pub use replay::{replay_script, DragScript, ReplayError, ReplayReport, ResolvedDrop, ScriptStep};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
