//! Drag-script replay.
//!
//! # Responsibility
//! - Parse recorded pointer sequences with their list state from JSON.
//! - Drive a `ReorderController` through them and report what it produced.
//!
//! # Invariants
//! - Step timestamps are offsets from one shared base instant.
//! - A committed drop replaces the working collection for later gestures.

use crate::engine::target::DropTarget;
use crate::gesture::config::GestureConfig;
use crate::gesture::controller::{DragOutcome, DragSurface, GestureError, ReorderController};
use crate::gesture::session::{DragFrame, PointerEvent};
use crate::model::entry::entry_for;
use crate::model::section::Section;
use crate::model::task::{Task, TaskId};
use crate::port::geometry::GeometryMap;
use crate::port::haptic::{HapticError, HapticIntensity, HapticPort};
use crate::port::scroll::NoScrollLock;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    Down {
        at_ms: u64,
        entry_id: TaskId,
        x: f64,
        y: f64,
    },
    Move {
        at_ms: u64,
        x: f64,
        y: f64,
    },
    Tick {
        at_ms: u64,
    },
    Up {
        at_ms: u64,
    },
    Cancel {
        at_ms: u64,
    },
}

impl ScriptStep {
    fn at_ms(&self) -> u64 {
        match self {
            Self::Down { at_ms, .. }
            | Self::Move { at_ms, .. }
            | Self::Tick { at_ms }
            | Self::Up { at_ms }
            | Self::Cancel { at_ms } => *at_ms,
        }
    }
}

/// List state plus the pointer steps to replay against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragScript {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub geometry: GeometryMap,
    #[serde(default)]
    pub config: GestureConfig,
    pub steps: Vec<ScriptStep>,
}

impl DragScript {
    pub fn from_json(source: &str) -> Result<Self, ReplayError> {
        serde_json::from_str(source).map_err(ReplayError::Parse)
    }
}

/// Resolution of one pointer-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDrop {
    pub at_ms: u64,
    pub committed: bool,
    pub target: Option<DropTarget>,
    /// `committed` or the no-op reason.
    pub reason: String,
}

/// Everything the replay produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub tasks: Vec<Task>,
    pub drops: Vec<ResolvedDrop>,
    pub frames: Vec<DragFrame>,
    pub haptics: Vec<HapticIntensity>,
}

/// Replay failures.
#[derive(Debug)]
pub enum ReplayError {
    Parse(serde_json::Error),
    /// A `down` step names an entry absent from the working collection.
    UnknownEntry(TaskId),
    /// Steps must be ordered by `at_ms`.
    OutOfOrder { previous_ms: u64, at_ms: u64 },
    Gesture(GestureError),
}

impl Display for ReplayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid drag script: {err}"),
            Self::UnknownEntry(id) => write!(f, "script presses unknown entry {id}"),
            Self::OutOfOrder { previous_ms, at_ms } => write!(
                f,
                "script step at {at_ms}ms follows a step at {previous_ms}ms"
            ),
            Self::Gesture(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Gesture(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GestureError> for ReplayError {
    fn from(value: GestureError) -> Self {
        Self::Gesture(value)
    }
}

#[derive(Default)]
struct RecordingHaptics {
    impulses: RefCell<Vec<HapticIntensity>>,
}

impl HapticPort for RecordingHaptics {
    fn impulse(&self, intensity: HapticIntensity) -> Result<(), HapticError> {
        self.impulses.borrow_mut().push(intensity);
        Ok(())
    }
}

/// Runs every step of `script` through a fresh controller.
///
/// # Errors
/// - Steps out of time order.
/// - `down` on an unknown entry or while a gesture is still tracked.
pub fn replay_script(script: &DragScript) -> Result<ReplayReport, ReplayError> {
    let haptics = RecordingHaptics::default();
    let mut controller = ReorderController::with_config(script.config, &haptics, NoScrollLock)?;
    let base = Instant::now();

    let mut tasks = script.tasks.clone();
    let mut drops = Vec::new();
    let mut frames = Vec::new();
    let mut previous_ms = 0;

    for step in &script.steps {
        let at_ms = step.at_ms();
        if at_ms < previous_ms {
            return Err(ReplayError::OutOfOrder { previous_ms, at_ms });
        }
        previous_ms = at_ms;
        let now = base + Duration::from_millis(at_ms);
        let surface = DragSurface::new(&tasks, &script.sections, &script.geometry);

        match *step {
            ScriptStep::Down { entry_id, x, y, .. } => {
                let entry =
                    entry_for(&tasks, entry_id).ok_or(ReplayError::UnknownEntry(entry_id))?;
                controller.begin_gesture_tracking(
                    entry,
                    PointerEvent::new(x, y),
                    script.config,
                    &script.geometry,
                    now,
                )?;
            }
            ScriptStep::Move { x, y, .. } => {
                let event = PointerEvent::new(x, y);
                if let Some(frame) = controller.on_pointer_move(event, &surface, now) {
                    frames.push(frame);
                }
            }
            ScriptStep::Tick { .. } => {
                controller.tick(now);
            }
            ScriptStep::Up { .. } => {
                let target = controller.current_frame().and_then(|frame| frame.drop_target);
                let outcome = controller.on_pointer_end(&surface, now);
                let (committed, reason, target) = match &outcome {
                    DragOutcome::Committed { target, .. } => {
                        (true, "committed".to_string(), Some(*target))
                    }
                    DragOutcome::Unchanged(reason) => (false, reason.as_str().to_string(), target),
                };
                drops.push(ResolvedDrop {
                    at_ms,
                    committed,
                    target,
                    reason,
                });
                tasks = outcome.into_tasks(&tasks);
            }
            ScriptStep::Cancel { .. } => controller.on_pointer_cancel(),
        }
    }

    drop(controller);
    Ok(ReplayReport {
        tasks,
        drops,
        frames,
        haptics: haptics.impulses.into_inner(),
    })
}
