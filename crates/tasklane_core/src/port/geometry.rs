//! Geometry provider contract and in-memory implementation.
//!
//! # Responsibility
//! - Expose the current on-screen rectangles of rows and sections.
//! - Preserve registration order, which is the hit-test tie-break order.
//!
//! # Invariants
//! - The core never computes layout; rectangles come from the rendering layer.
//! - Re-registering an id updates its rectangle in place and keeps its slot.

use crate::model::section::SectionId;
use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-width row starting at `top`.
    pub fn row(top: f64, height: f64) -> Self {
        Self::new(0.0, top, 0.0, height)
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Inclusive vertical containment.
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top() && y <= self.bottom()
    }
}

/// Lookup from entry/section id to its current bounding rectangle.
pub trait GeometryProvider {
    /// Row rectangles (tasks and subtasks) in registration order.
    fn entry_rects(&self) -> Vec<(TaskId, Rect)>;
    /// Section rectangles in registration order.
    fn section_rects(&self) -> Vec<(SectionId, Rect)>;

    /// Rectangle of one row.
    fn entry_rect(&self, id: TaskId) -> Option<Rect> {
        self.entry_rects()
            .into_iter()
            .find_map(|(entry_id, rect)| (entry_id == id).then_some(rect))
    }

    /// Rectangle of one section.
    fn section_rect(&self, id: SectionId) -> Option<Rect> {
        self.section_rects()
            .into_iter()
            .find_map(|(section_id, rect)| (section_id == id).then_some(rect))
    }
}

impl<T: GeometryProvider + ?Sized> GeometryProvider for &T {
    fn entry_rects(&self) -> Vec<(TaskId, Rect)> {
        (**self).entry_rects()
    }

    fn section_rects(&self) -> Vec<(SectionId, Rect)> {
        (**self).section_rects()
    }

    fn entry_rect(&self, id: TaskId) -> Option<Rect> {
        (**self).entry_rect(id)
    }

    fn section_rect(&self, id: SectionId) -> Option<Rect> {
        (**self).section_rect(id)
    }
}

/// Registration-ordered geometry snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryMap {
    #[serde(default)]
    entries: Vec<(TaskId, Rect)>,
    #[serde(default)]
    sections: Vec<(SectionId, Rect)>,
}

impl GeometryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or updates one row rectangle.
    pub fn register_entry(&mut self, id: TaskId, rect: Rect) {
        upsert(&mut self.entries, id, rect);
    }

    /// Registers or updates one section rectangle.
    pub fn register_section(&mut self, id: SectionId, rect: Rect) {
        upsert(&mut self.sections, id, rect);
    }

    /// Removes one row, e.g. when it is unmounted.
    pub fn unregister_entry(&mut self, id: TaskId) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GeometryProvider for GeometryMap {
    fn entry_rects(&self) -> Vec<(TaskId, Rect)> {
        self.entries.clone()
    }

    fn section_rects(&self) -> Vec<(SectionId, Rect)> {
        self.sections.clone()
    }

    fn entry_rect(&self, id: TaskId) -> Option<Rect> {
        self.entries
            .iter()
            .find_map(|(entry_id, rect)| (*entry_id == id).then_some(*rect))
    }

    fn section_rect(&self, id: SectionId) -> Option<Rect> {
        self.sections
            .iter()
            .find_map(|(section_id, rect)| (*section_id == id).then_some(*rect))
    }
}

fn upsert(slots: &mut Vec<(uuid::Uuid, Rect)>, id: uuid::Uuid, rect: Rect) {
    match slots.iter_mut().find(|(slot_id, _)| *slot_id == id) {
        Some(slot) => slot.1 = rect,
        None => slots.push((id, rect)),
    }
}
