//! Reorder engine: drop target to next task collection.
//!
//! # Responsibility
//! - Move or reparent exactly one entry per resolved drop.
//! - Perform task <-> subtask kind conversions.
//!
//! # Invariants
//! - Input collections are never mutated; a new collection is returned.
//! - Entry count is conserved and tree invariants hold on every `Ok` result.
//! - Only position, `section_id` and nesting of the moved entry change; every
//!   other field is carried verbatim.
//! - A task placed next to a sibling takes that sibling's `section_id`.

use crate::engine::target::{DropPosition, DropTarget};
use crate::model::entry::{locate_entry, DraggableEntry, EntryKind, EntryLocation};
use crate::model::section::{Section, SectionId};
use crate::model::task::{
    check_tree_invariants, entry_count, top_level_index, Task, TaskId, TreeInvariantError,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Kind change applied by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindConversion {
    TaskToSubtask,
    SubtaskToTask,
}

impl KindConversion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskToSubtask => "task_to_subtask",
            Self::SubtaskToTask => "subtask_to_task",
        }
    }
}

/// Successful reorder result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reordered {
    pub tasks: Vec<Task>,
    /// The moved entry in its new shape.
    pub moved: DraggableEntry,
    pub conversion: Option<KindConversion>,
}

/// Reasons a drop leaves the collection unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Dragged entry is no longer in the collection.
    DraggedNotFound(TaskId),
    /// Dragged entry exists but its kind or parent changed since drag start.
    StaleEntry(TaskId),
    /// Anchor task of the target is no longer a top-level task.
    TargetNotFound(TaskId),
    /// Target section was removed or collapsed since it was hit-tested.
    SectionNotFound(SectionId),
    /// Target is anchored to the dragged entry itself.
    TargetIsDragged(TaskId),
    /// Subtask dropped onto the subtask area of its current parent.
    SameContainer { parent_id: TaskId },
    /// Task owning subtasks cannot itself become a subtask.
    NestingForbidden(TaskId),
    /// Mutation produced a structurally invalid collection.
    Invariant(TreeInvariantError),
    /// Mutation changed the number of entries.
    CountMismatch { before: usize, after: usize },
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DraggedNotFound(id) => write!(f, "dragged entry not found: {id}"),
            Self::StaleEntry(id) => write!(f, "dragged entry changed shape: {id}"),
            Self::TargetNotFound(id) => write!(f, "drop target task not found: {id}"),
            Self::SectionNotFound(id) => write!(f, "drop target section not open: {id}"),
            Self::TargetIsDragged(id) => write!(f, "entry cannot be dropped on itself: {id}"),
            Self::SameContainer { parent_id } => {
                write!(f, "subtask already belongs to {parent_id}")
            }
            Self::NestingForbidden(id) => {
                write!(f, "task with subtasks cannot be nested: {id}")
            }
            Self::Invariant(err) => write!(f, "{err}"),
            Self::CountMismatch { before, after } => {
                write!(f, "entry count changed from {before} to {after}")
            }
        }
    }
}

impl Error for ReorderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invariant(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeInvariantError> for ReorderError {
    fn from(value: TreeInvariantError) -> Self {
        Self::Invariant(value)
    }
}

/// Applies one drop of `dragged` onto `target`.
///
/// `sections` is the current section list; a `Section` target must still be
/// present and expanded.
///
/// # Errors
/// - Stale dragged/target references, including removed or collapsed sections.
/// - Drops that resolve to the entry's current container.
/// - Drops that would break single-level nesting.
pub fn apply_drop(
    tasks: &[Task],
    sections: &[Section],
    dragged: &DraggableEntry,
    target: &DropTarget,
) -> Result<Reordered, ReorderError> {
    let dragged_id = dragged.id();
    let location =
        locate_entry(tasks, dragged_id).ok_or(ReorderError::DraggedNotFound(dragged_id))?;
    ensure_matches(tasks, dragged, location)?;

    if let DropTarget::Section { section_id } = target {
        let open = sections
            .iter()
            .any(|section| section.id == *section_id && section.accepts_drops());
        if !open {
            return Err(ReorderError::SectionNotFound(*section_id));
        }
    }

    if let Some(anchor) = target.anchor_task() {
        if anchor == dragged_id {
            return Err(ReorderError::TargetIsDragged(anchor));
        }
        if top_level_index(tasks, anchor).is_none() {
            return Err(ReorderError::TargetNotFound(anchor));
        }
    }

    if let DropTarget::SubtaskArea { task_id } = target {
        match location {
            EntryLocation::Nested { parent_index, .. } if tasks[parent_index].id == *task_id => {
                return Err(ReorderError::SameContainer {
                    parent_id: *task_id,
                });
            }
            EntryLocation::TopLevel { index } if !tasks[index].subtasks.is_empty() => {
                return Err(ReorderError::NestingForbidden(dragged_id));
            }
            _ => {}
        }
    }

    let mut next = tasks.to_vec();
    let moving = detach(&mut next, location);
    let moved = place(&mut next, moving, target)?;

    check_tree_invariants(&next)?;
    let (before, after) = (entry_count(tasks), entry_count(&next));
    if before != after {
        return Err(ReorderError::CountMismatch { before, after });
    }

    let conversion = match (dragged.kind(), moved.kind()) {
        (EntryKind::Task, EntryKind::Subtask) => Some(KindConversion::TaskToSubtask),
        (EntryKind::Subtask, EntryKind::Task) => Some(KindConversion::SubtaskToTask),
        _ => None,
    };

    Ok(Reordered {
        tasks: next,
        moved,
        conversion,
    })
}

fn ensure_matches(
    tasks: &[Task],
    dragged: &DraggableEntry,
    location: EntryLocation,
) -> Result<(), ReorderError> {
    let consistent = match (dragged, location) {
        (DraggableEntry::Task { .. }, EntryLocation::TopLevel { .. }) => true,
        (DraggableEntry::Subtask { parent_id, .. }, EntryLocation::Nested { parent_index, .. }) => {
            tasks[parent_index].id == *parent_id
        }
        _ => false,
    };
    if consistent {
        Ok(())
    } else {
        Err(ReorderError::StaleEntry(dragged.id()))
    }
}

fn detach(tasks: &mut Vec<Task>, location: EntryLocation) -> Task {
    match location {
        EntryLocation::TopLevel { index } => tasks.remove(index),
        EntryLocation::Nested {
            parent_index,
            index,
        } => tasks[parent_index].subtasks.remove(index),
    }
}

fn place(
    tasks: &mut Vec<Task>,
    mut moving: Task,
    target: &DropTarget,
) -> Result<DraggableEntry, ReorderError> {
    let entry = DraggableEntry::Task {
        id: moving.id,
        section_id: None,
    };

    match *target {
        DropTarget::Section { section_id } => {
            moving.section_id = Some(section_id);
            tasks.push(moving);
            Ok(entry.promote_to(Some(section_id)))
        }
        DropTarget::BeforeAfterTask {
            task_id, position, ..
        } => {
            let anchor = top_level_index(tasks, task_id)
                .ok_or(ReorderError::TargetNotFound(task_id))?;
            let insert_at = match position {
                DropPosition::Before => anchor,
                DropPosition::After => anchor + 1,
            };
            let section_id = tasks[anchor].section_id;
            moving.section_id = section_id;
            tasks.insert(insert_at, moving);
            Ok(entry.promote_to(section_id))
        }
        DropTarget::SubtaskArea { task_id } => {
            let parent = top_level_index(tasks, task_id)
                .ok_or(ReorderError::TargetNotFound(task_id))?;
            moving.section_id = None;
            tasks[parent].subtasks.push(moving);
            Ok(entry.nest_under(task_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_drop, KindConversion, ReorderError};
    use crate::engine::target::{DropPosition, DropTarget};
    use crate::model::entry::DraggableEntry;
    use crate::model::section::Section;
    use crate::model::task::Task;
    use uuid::Uuid;

    #[test]
    fn task_moves_before_sibling_and_keeps_fields() {
        let section = Uuid::new_v4();
        let mut first = Task::new("first").in_section(section);
        first.subtasks.push(Task::new("first.child"));
        let second = Task::new("second").in_section(section);
        let tasks = vec![first.clone(), second.clone()];

        let result = apply_drop(
            &tasks,
            &[],
            &DraggableEntry::Task {
                id: second.id,
                section_id: Some(section),
            },
            &DropTarget::BeforeAfterTask {
                task_id: first.id,
                position: DropPosition::Before,
                insert_index: 0,
            },
        )
        .unwrap();

        assert_eq!(result.tasks, vec![second, first]);
        assert_eq!(result.conversion, None);
    }

    #[test]
    fn nesting_a_parent_task_is_rejected() {
        let parent = Task::new("parent").with_subtask(Task::new("child"));
        let other = Task::new("other");
        let tasks = vec![parent.clone(), other.clone()];

        let err = apply_drop(
            &tasks,
            &[],
            &DraggableEntry::Task {
                id: parent.id,
                section_id: None,
            },
            &DropTarget::SubtaskArea { task_id: other.id },
        )
        .unwrap_err();
        assert_eq!(err, ReorderError::NestingForbidden(parent.id));
    }

    #[test]
    fn subtask_moves_between_parents() {
        let child = Task::new("child");
        let old_parent = Task::new("old").with_subtask(child.clone());
        let new_parent = Task::new("new").with_subtask(Task::new("existing"));
        let tasks = vec![old_parent.clone(), new_parent.clone()];

        let result = apply_drop(
            &tasks,
            &[],
            &DraggableEntry::Subtask {
                id: child.id,
                parent_id: old_parent.id,
            },
            &DropTarget::SubtaskArea {
                task_id: new_parent.id,
            },
        )
        .unwrap();

        assert!(result.tasks[0].subtasks.is_empty());
        assert_eq!(result.tasks[1].subtasks.len(), 2);
        assert_eq!(result.tasks[1].subtasks[1], child);
        assert_eq!(result.conversion, None::<KindConversion>);
    }

    #[test]
    fn target_anchored_on_dragged_entry_is_rejected() {
        let task = Task::new("solo");
        let err = apply_drop(
            std::slice::from_ref(&task),
            &[],
            &DraggableEntry::Task {
                id: task.id,
                section_id: None,
            },
            &DropTarget::BeforeAfterTask {
                task_id: task.id,
                position: DropPosition::After,
                insert_index: 1,
            },
        )
        .unwrap_err();
        assert_eq!(err, ReorderError::TargetIsDragged(task.id));
    }

    #[test]
    fn removed_or_collapsed_section_is_rejected() {
        let task = Task::new("solo");
        let entry = DraggableEntry::Task {
            id: task.id,
            section_id: None,
        };
        let mut folded = Section::new("Later", "blue", 1);
        folded.is_collapsed = true;
        let tasks = vec![task];

        let gone = Uuid::new_v4();
        assert_eq!(
            apply_drop(&tasks, &[], &entry, &DropTarget::Section { section_id: gone })
                .unwrap_err(),
            ReorderError::SectionNotFound(gone)
        );
        assert_eq!(
            apply_drop(
                &tasks,
                std::slice::from_ref(&folded),
                &entry,
                &DropTarget::Section {
                    section_id: folded.id
                },
            )
            .unwrap_err(),
            ReorderError::SectionNotFound(folded.id)
        );
    }
}
