//! Draggable entry variant and lookup helpers.
//!
//! # Responsibility
//! - Encode "task vs. subtask-of(task)" as one tagged variant.
//! - Provide the only legal kind conversions (`nest_under`, `promote_to`).
//! - Locate an entry inside a caller-supplied collection.
//!
//! # Invariants
//! - `Subtask` always names its owning top-level task.
//! - Only top-level entries carry a section id.

use crate::model::section::{sections_in_display_order, Section, SectionId};
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind tag of a draggable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Task,
    Subtask,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Subtask => "subtask",
        }
    }
}

/// Row that can be picked up by a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraggableEntry {
    /// Top-level task row.
    Task {
        id: TaskId,
        #[serde(default)]
        section_id: Option<SectionId>,
    },
    /// Subtask row owned by `parent_id`.
    Subtask { id: TaskId, parent_id: TaskId },
}

impl DraggableEntry {
    pub fn id(&self) -> TaskId {
        match self {
            Self::Task { id, .. } | Self::Subtask { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Task { .. } => EntryKind::Task,
            Self::Subtask { .. } => EntryKind::Subtask,
        }
    }

    /// Owning task for subtasks, `None` for top-level tasks.
    pub fn parent_id(&self) -> Option<TaskId> {
        match self {
            Self::Task { .. } => None,
            Self::Subtask { parent_id, .. } => Some(*parent_id),
        }
    }

    pub fn section_id(&self) -> Option<SectionId> {
        match self {
            Self::Task { section_id, .. } => *section_id,
            Self::Subtask { .. } => None,
        }
    }

    /// Converts into a subtask of `parent_id`, dropping any section.
    pub fn nest_under(self, parent_id: TaskId) -> Self {
        Self::Subtask {
            id: self.id(),
            parent_id,
        }
    }

    /// Converts into a top-level task placed in `section_id`.
    pub fn promote_to(self, section_id: Option<SectionId>) -> Self {
        Self::Task {
            id: self.id(),
            section_id,
        }
    }
}

/// Current position of an entry inside a task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLocation {
    TopLevel { index: usize },
    Nested { parent_index: usize, index: usize },
}

impl EntryLocation {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::TopLevel { .. } => EntryKind::Task,
            Self::Nested { .. } => EntryKind::Subtask,
        }
    }
}

/// Finds an entry by id among top-level tasks and their subtasks.
pub fn locate_entry(tasks: &[Task], id: TaskId) -> Option<EntryLocation> {
    for (parent_index, task) in tasks.iter().enumerate() {
        if task.id == id {
            return Some(EntryLocation::TopLevel {
                index: parent_index,
            });
        }
        if let Some(index) = task.subtask_index(id) {
            return Some(EntryLocation::Nested {
                parent_index,
                index,
            });
        }
    }
    None
}

/// Builds the draggable entry for the row with `id`, if it exists.
pub fn entry_for(tasks: &[Task], id: TaskId) -> Option<DraggableEntry> {
    match locate_entry(tasks, id)? {
        EntryLocation::TopLevel { index } => Some(DraggableEntry::Task {
            id,
            section_id: tasks[index].section_id,
        }),
        EntryLocation::Nested { parent_index, .. } => Some(DraggableEntry::Subtask {
            id,
            parent_id: tasks[parent_index].id,
        }),
    }
}

/// Lists every entry allowed to start a drag, in display order.
///
/// Sections are walked by ascending `order`; tasks in collapsed sections and
/// completed entries are skipped. Tasks without a known section come last.
pub fn draggable_surface(tasks: &[Task], sections: &[Section]) -> Vec<DraggableEntry> {
    let mut surface = Vec::new();
    let known: HashSet<SectionId> = sections.iter().map(|section| section.id).collect();

    for section in sections_in_display_order(sections) {
        if !section.accepts_drops() {
            continue;
        }
        let members = tasks
            .iter()
            .filter(|task| task.section_id == Some(section.id));
        push_visible(&mut surface, members);
    }

    let orphans = tasks.iter().filter(|task| match task.section_id {
        Some(section_id) => !known.contains(&section_id),
        None => true,
    });
    push_visible(&mut surface, orphans);
    surface
}

fn push_visible<'a>(surface: &mut Vec<DraggableEntry>, tasks: impl Iterator<Item = &'a Task>) {
    for task in tasks.filter(|task| !task.completed) {
        surface.push(DraggableEntry::Task {
            id: task.id,
            section_id: task.section_id,
        });
        surface.extend(
            task.subtasks
                .iter()
                .filter(|subtask| !subtask.completed)
                .map(|subtask| DraggableEntry::Subtask {
                    id: subtask.id,
                    parent_id: task.id,
                }),
        );
    }
}
