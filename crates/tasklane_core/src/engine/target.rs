//! Transient drop target values.

use crate::model::section::SectionId;
use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};

/// Side of a sibling row a task is dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    Before,
    After,
}

/// Destination resolved for a drag in progress. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropTarget {
    /// Append to the top level of a section.
    Section { section_id: SectionId },
    /// Place next to a sibling task.
    BeforeAfterTask {
        task_id: TaskId,
        position: DropPosition,
        /// Insertion slot in the collection as it was hit-tested.
        insert_index: usize,
    },
    /// Nest inside a task as its last subtask.
    SubtaskArea { task_id: TaskId },
}

/// Identity of a drop target, ignoring derived fields like `insert_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Section(SectionId),
    Adjacent(TaskId, DropPosition),
    Subtasks(TaskId),
}

impl DropTarget {
    pub fn key(&self) -> TargetKey {
        match self {
            Self::Section { section_id } => TargetKey::Section(*section_id),
            Self::BeforeAfterTask {
                task_id, position, ..
            } => TargetKey::Adjacent(*task_id, *position),
            Self::SubtaskArea { task_id } => TargetKey::Subtasks(*task_id),
        }
    }

    /// Task row this target is anchored to, if any.
    pub fn anchor_task(&self) -> Option<TaskId> {
        match self {
            Self::Section { .. } => None,
            Self::BeforeAfterTask { task_id, .. } | Self::SubtaskArea { task_id } => Some(*task_id),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Section { .. } => "section",
            Self::BeforeAfterTask {
                position: DropPosition::Before,
                ..
            } => "before_task",
            Self::BeforeAfterTask {
                position: DropPosition::After,
                ..
            } => "after_task",
            Self::SubtaskArea { .. } => "subtask_area",
        }
    }
}
