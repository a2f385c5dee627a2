//! Drag session state and per-frame snapshots.
//!
//! # Responsibility
//! - Hold everything a drag needs between arm time and resolution.
//! - Hand the rendering layer an immutable `DragFrame` per processed move.
//!
//! # Invariants
//! - Sessions live only inside the controller; the renderer sees copies.
//! - At most one pending pointer move is kept; a newer one supersedes it.

use crate::engine::target::{DropTarget, TargetKey};
use crate::model::entry::DraggableEntry;
use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Coarse lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Armed,
    Dragging,
}

/// Render data for one processed pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragFrame {
    pub entry_id: TaskId,
    /// Vertical offset to apply to the dragged row.
    pub translate_y: f64,
    /// Provisional top edge of the dragged row.
    pub dragged_top: f64,
    pub drop_target: Option<DropTarget>,
    /// Where to draw the drop indicator, if any target is resolved.
    pub indicator_y: Option<f64>,
    /// Whether this frame resolved a different target than the previous one.
    pub target_changed: bool,
}

/// Pressed row waiting for the long-press timer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArmedGesture {
    pub entry: DraggableEntry,
    pub origin: PointerEvent,
    pub origin_top: f64,
    pub deadline: Instant,
}

impl ArmedGesture {
    /// Whether `event` moved past `tolerance` on either axis.
    pub fn exceeds_tolerance(&self, event: &PointerEvent, tolerance: f64) -> bool {
        (event.x - self.origin.x).abs() > tolerance || (event.y - self.origin.y).abs() > tolerance
    }
}

/// Active drag.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    pub entry: DraggableEntry,
    pub start_y: f64,
    pub current_y: f64,
    pub origin_top: f64,
    pub drop_target: Option<DropTarget>,
    pub indicator_y: Option<f64>,
    pub last_haptic_key: Option<TargetKey>,
    pub pending_move: Option<PointerEvent>,
    pub started_at: Instant,
}

impl DragSession {
    pub fn start(armed: &ArmedGesture, now: Instant) -> Self {
        Self {
            entry: armed.entry,
            start_y: armed.origin.y,
            current_y: armed.origin.y,
            origin_top: armed.origin_top,
            drop_target: None,
            indicator_y: None,
            last_haptic_key: None,
            pending_move: None,
            started_at: now,
        }
    }

    pub fn translate_y(&self) -> f64 {
        self.current_y - self.start_y
    }

    pub fn dragged_top(&self) -> f64 {
        self.origin_top + self.translate_y()
    }

    /// Records `event` as the newest move; returns `true` if no frame was pending.
    pub fn supersede_pending(&mut self, event: PointerEvent) -> bool {
        self.pending_move.replace(event).is_none()
    }

    pub fn snapshot(&self, target_changed: bool) -> DragFrame {
        DragFrame {
            entry_id: self.entry.id(),
            translate_y: self.translate_y(),
            dragged_top: self.dragged_top(),
            drop_target: self.drop_target,
            indicator_y: self.indicator_y,
            target_changed,
        }
    }
}
