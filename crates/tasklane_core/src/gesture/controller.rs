//! Long-press reorder controller.
//!
//! # Responsibility
//! - Drive the `Idle -> Armed -> Dragging -> Idle` gesture lifecycle from
//!   pointer events and caller-supplied timestamps.
//! - Run hit-testing per processed move and reorder once at resolution.
//! - Request haptic impulses and viewport scroll locking through ports.
//!
//! # Invariants
//! - One controller tracks at most one gesture; one controller per list view.
//! - Movement beyond the tolerance while armed always disarms.
//! - A target-change impulse fires at most once per distinct target.
//! - Haptic failures are swallowed and never change gesture state.
//! - Scrolling is re-enabled on every exit path, including controller drop.
//! - Any failure at resolution collapses into `DragOutcome::Unchanged`.

use crate::engine::hit_test::{indicator_y, resolve_drop_target, HitTestInput, HitTestMode};
use crate::engine::reorder::{apply_drop, KindConversion, ReorderError};
use crate::engine::target::DropTarget;
use crate::gesture::config::{ConfigError, GestureConfig};
use crate::gesture::session::{ArmedGesture, DragFrame, DragPhase, DragSession, PointerEvent};
use crate::model::entry::DraggableEntry;
use crate::model::section::Section;
use crate::model::task::{Task, TaskId};
use crate::port::geometry::GeometryProvider;
use crate::port::haptic::{HapticIntensity, HapticPort};
use crate::port::scroll::ScrollLock;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors raised when a gesture cannot start.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureError {
    /// Another gesture is still armed or dragging.
    AlreadyTracking(TaskId),
    /// The pressed row has no registered geometry.
    EntryGeometryMissing(TaskId),
    InvalidConfig(ConfigError),
}

impl Display for GestureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyTracking(id) => write!(f, "gesture already tracking entry {id}"),
            Self::EntryGeometryMissing(id) => write!(f, "no geometry registered for entry {id}"),
            Self::InvalidConfig(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GestureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for GestureError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

/// Live data the controller reads while hit-testing.
pub struct DragSurface<'a, G: GeometryProvider + ?Sized> {
    pub tasks: &'a [Task],
    pub sections: &'a [Section],
    pub geometry: &'a G,
}

impl<'a, G: GeometryProvider + ?Sized> DragSurface<'a, G> {
    pub fn new(tasks: &'a [Task], sections: &'a [Section], geometry: &'a G) -> Self {
        Self {
            tasks,
            sections,
            geometry,
        }
    }
}

impl<G: GeometryProvider + ?Sized> Clone for DragSurface<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: GeometryProvider + ?Sized> Copy for DragSurface<'_, G> {}

/// Why a resolved gesture left the collection untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoOpReason {
    /// No gesture was being tracked.
    NotTracking,
    /// Released before the arm delay elapsed.
    Tap,
    /// Released over empty space.
    NoTarget,
    /// Reorder engine refused the drop.
    Rejected(ReorderError),
}

impl NoOpReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotTracking => "not_tracking",
            Self::Tap => "tap",
            Self::NoTarget => "no_target",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Result of `on_pointer_end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Committed {
        tasks: Vec<Task>,
        target: DropTarget,
        moved: DraggableEntry,
        conversion: Option<KindConversion>,
    },
    Unchanged(NoOpReason),
}

impl DragOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Collection to render next: the committed one, or a copy of `original`.
    pub fn into_tasks(self, original: &[Task]) -> Vec<Task> {
        match self {
            Self::Committed { tasks, .. } => tasks,
            Self::Unchanged(_) => original.to_vec(),
        }
    }
}

enum GestureState {
    Idle,
    Armed(ArmedGesture),
    Dragging(DragSession),
}

/// Per-list gesture controller.
pub struct ReorderController<H: HapticPort, S: ScrollLock> {
    config: GestureConfig,
    haptics: H,
    scroll: S,
    state: GestureState,
    scroll_locked: bool,
}

impl<H: HapticPort, S: ScrollLock> ReorderController<H, S> {
    /// Creates an idle controller with the nested-list configuration.
    pub fn new(haptics: H, scroll: S) -> Self {
        Self {
            config: GestureConfig::default(),
            haptics,
            scroll,
            state: GestureState::Idle,
            scroll_locked: false,
        }
    }

    /// Creates an idle controller with a validated configuration.
    pub fn with_config(config: GestureConfig, haptics: H, scroll: S) -> Result<Self, GestureError> {
        config.validate()?;
        let mut controller = Self::new(haptics, scroll);
        controller.config = config;
        Ok(controller)
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            GestureState::Idle => DragPhase::Idle,
            GestureState::Armed(_) => DragPhase::Armed,
            GestureState::Dragging(_) => DragPhase::Dragging,
        }
    }

    /// Entry currently armed or dragged.
    pub fn tracked_entry(&self) -> Option<DraggableEntry> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Armed(armed) => Some(armed.entry),
            GestureState::Dragging(session) => Some(session.entry),
        }
    }

    /// When the pending long-press timer fires, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            GestureState::Armed(armed) => Some(armed.deadline),
            _ => None,
        }
    }

    /// Latest render snapshot of the active drag.
    pub fn current_frame(&self) -> Option<DragFrame> {
        match &self.state {
            GestureState::Dragging(session) => Some(session.snapshot(false)),
            _ => None,
        }
    }

    /// Pointer-down on `entry`: arms the long-press timer.
    ///
    /// # Errors
    /// - `AlreadyTracking` while another gesture is armed or dragging.
    /// - `EntryGeometryMissing` when the row has no rectangle.
    /// - `InvalidConfig` when `config` fails validation.
    pub fn begin_gesture_tracking<G>(
        &mut self,
        entry: DraggableEntry,
        event: PointerEvent,
        config: GestureConfig,
        geometry: &G,
        now: Instant,
    ) -> Result<(), GestureError>
    where
        G: GeometryProvider + ?Sized,
    {
        if let Some(active) = self.tracked_entry() {
            return Err(GestureError::AlreadyTracking(active.id()));
        }
        config.validate()?;
        let origin_top = geometry
            .entry_rect(entry.id())
            .ok_or(GestureError::EntryGeometryMissing(entry.id()))?
            .top();

        self.config = config;
        self.state = GestureState::Armed(ArmedGesture {
            entry,
            origin: event,
            origin_top,
            deadline: now + config.arm_delay(),
        });
        info!(
            "event=drag_arm module=gesture status=ok entry_kind={} delay_ms={}",
            entry.kind().as_str(),
            config.arm_delay_ms
        );
        Ok(())
    }

    /// Fires the long-press timer if it is due. Returns `true` when a drag starts.
    pub fn tick(&mut self, now: Instant) -> bool {
        let GestureState::Armed(armed) = &self.state else {
            return false;
        };
        if now < armed.deadline {
            return false;
        }

        let session = DragSession::start(armed, now);
        info!(
            "event=drag_start module=gesture status=ok entry_kind={}",
            session.entry.kind().as_str()
        );
        self.state = GestureState::Dragging(session);
        impulse(&self.haptics, HapticIntensity::Medium);
        self.lock_scroll();
        true
    }

    /// Records a pointer move without hit-testing it yet.
    ///
    /// Returns `true` when the caller must request an animation frame; a move
    /// arriving while a frame is already pending supersedes the pending one.
    pub fn queue_pointer_move(&mut self, event: PointerEvent, now: Instant) -> bool {
        self.tick(now);
        match &mut self.state {
            GestureState::Idle => false,
            GestureState::Armed(armed) => {
                if armed.exceeds_tolerance(&event, self.config.move_tolerance_cancel_px) {
                    let kind = armed.entry.kind();
                    self.state = GestureState::Idle;
                    info!(
                        "event=drag_disarm module=gesture status=noop reason=moved entry_kind={}",
                        kind.as_str()
                    );
                }
                false
            }
            GestureState::Dragging(session) => session.supersede_pending(event),
        }
    }

    /// Processes the newest queued move, once per animation frame.
    pub fn on_animation_frame<G>(&mut self, surface: &DragSurface<'_, G>) -> Option<DragFrame>
    where
        G: GeometryProvider + ?Sized,
    {
        let GestureState::Dragging(session) = &mut self.state else {
            return None;
        };
        let event = session.pending_move.take()?;
        let changed = advance(
            session,
            event,
            surface,
            self.config.hit_test_mode,
            &self.haptics,
        );
        Some(session.snapshot(changed))
    }

    /// Uncoalesced pointer move: queue and process immediately.
    pub fn on_pointer_move<G>(
        &mut self,
        event: PointerEvent,
        surface: &DragSurface<'_, G>,
        now: Instant,
    ) -> Option<DragFrame>
    where
        G: GeometryProvider + ?Sized,
    {
        self.queue_pointer_move(event, now);
        self.on_animation_frame(surface)
    }

    /// Pointer-up: commits the drop or reports why nothing changed.
    ///
    /// `surface` holds the collection and sections as they are now; a dragged
    /// entry, anchor task or section that disappeared since the last frame
    /// resolves to `Unchanged`.
    pub fn on_pointer_end<G>(&mut self, surface: &DragSurface<'_, G>, now: Instant) -> DragOutcome
    where
        G: GeometryProvider + ?Sized,
    {
        self.tick(now);
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let outcome = match state {
            GestureState::Idle => DragOutcome::Unchanged(NoOpReason::NotTracking),
            GestureState::Armed(armed) => {
                info!(
                    "event=drag_disarm module=gesture status=noop reason=tap entry_kind={}",
                    armed.entry.kind().as_str()
                );
                DragOutcome::Unchanged(NoOpReason::Tap)
            }
            GestureState::Dragging(mut session) => {
                if let Some(event) = session.pending_move.take() {
                    advance(
                        &mut session,
                        event,
                        surface,
                        self.config.hit_test_mode,
                        &self.haptics,
                    );
                }
                impulse(&self.haptics, HapticIntensity::Heavy);
                resolve(&session, surface.tasks, surface.sections, now)
            }
        };
        self.unlock_scroll();
        outcome
    }

    /// Pointer-cancel: drops any armed or active gesture without mutation.
    pub fn on_pointer_cancel(&mut self) {
        let previous = std::mem::replace(&mut self.state, GestureState::Idle);
        if let Some(phase) = match previous {
            GestureState::Idle => None,
            GestureState::Armed(_) => Some("armed"),
            GestureState::Dragging(_) => Some("dragging"),
        } {
            info!("event=drag_cancel module=gesture status=noop phase={phase}");
        }
        self.unlock_scroll();
    }

    fn lock_scroll(&mut self) {
        if !self.scroll_locked {
            self.scroll.set_scroll_enabled(false);
            self.scroll_locked = true;
            debug!("event=scroll_lock module=gesture status=ok enabled=false");
        }
    }

    fn unlock_scroll(&mut self) {
        if self.scroll_locked {
            self.scroll.set_scroll_enabled(true);
            self.scroll_locked = false;
            debug!("event=scroll_lock module=gesture status=ok enabled=true");
        }
    }
}

impl<H: HapticPort, S: ScrollLock> Drop for ReorderController<H, S> {
    fn drop(&mut self) {
        self.unlock_scroll();
    }
}

/// Applies one pointer move to the session. Returns whether the target changed.
fn advance<G, H>(
    session: &mut DragSession,
    event: PointerEvent,
    surface: &DragSurface<'_, G>,
    mode: HitTestMode,
    haptics: &H,
) -> bool
where
    G: GeometryProvider + ?Sized,
    H: HapticPort,
{
    session.current_y = event.y;
    let target = resolve_drop_target(
        &HitTestInput {
            dragged: &session.entry,
            dragged_top: session.dragged_top(),
            tasks: surface.tasks,
            sections: surface.sections,
            mode,
        },
        surface.geometry,
    );

    let key = target.map(|target| target.key());
    let changed = key != session.drop_target.map(|previous| previous.key());
    session.indicator_y = target.and_then(|target| indicator_y(&target, surface.geometry));
    session.drop_target = target;

    if key.is_some() && key != session.last_haptic_key {
        impulse(haptics, HapticIntensity::Light);
    }
    session.last_haptic_key = key;

    if changed {
        debug!(
            "event=drop_target module=gesture status=ok target={}",
            target.map_or("none", |target| target.label())
        );
    }
    changed
}

fn resolve(
    session: &DragSession,
    tasks: &[Task],
    sections: &[Section],
    now: Instant,
) -> DragOutcome {
    let duration_ms = now.saturating_duration_since(session.started_at).as_millis();
    let Some(target) = session.drop_target else {
        info!(
            "event=drag_noop module=gesture status=noop reason=no_target duration_ms={duration_ms}"
        );
        return DragOutcome::Unchanged(NoOpReason::NoTarget);
    };

    match apply_drop(tasks, sections, &session.entry, &target) {
        Ok(reordered) => {
            info!(
                "event=drag_commit module=gesture status=ok target={} conversion={} duration_ms={}",
                target.label(),
                reordered.conversion.as_ref().map_or("none", KindConversion::as_str),
                duration_ms
            );
            DragOutcome::Committed {
                tasks: reordered.tasks,
                target,
                moved: reordered.moved,
                conversion: reordered.conversion,
            }
        }
        Err(err) => {
            info!(
                "event=drag_noop module=gesture status=noop reason=rejected target={} error={}",
                target.label(),
                err
            );
            DragOutcome::Unchanged(NoOpReason::Rejected(err))
        }
    }
}

/// Requests one impulse, swallowing port failures.
fn impulse<H: HapticPort>(haptics: &H, intensity: HapticIntensity) {
    if let Err(err) = haptics.impulse(intensity) {
        debug!(
            "event=haptic_failed module=gesture status=error intensity={} error={}",
            intensity.as_str(),
            err
        );
    }
}
