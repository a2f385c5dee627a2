//! Task model and collection-level invariants.
//!
//! # Responsibility
//! - Define the task record shared by top-level rows and nested subtasks.
//! - Provide structural checks used after every reorder mutation.
//!
//! # Invariants
//! - `id` is stable across reorders and unique within one collection.
//! - `subtasks` is owned by its parent; a subtask has no `section_id`.
//! - Nesting is single level: a subtask's own `subtasks` is always empty.

use crate::model::section::SectionId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier. Subtasks use the same id space.
pub type TaskId = Uuid;

/// Task row, either top-level or embedded as a subtask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Meaningful only for top-level tasks.
    #[serde(default)]
    pub section_id: Option<SectionId>,
    /// Ordered, owned children.
    #[serde(default)]
    pub subtasks: Vec<Task>,
}

impl Task {
    /// Creates an open, unsectioned task with a generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates an open, unsectioned task with a caller-provided id.
    pub fn with_id(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            section_id: None,
            subtasks: Vec::new(),
        }
    }

    /// Builder-style section assignment.
    pub fn in_section(mut self, section_id: SectionId) -> Self {
        self.section_id = Some(section_id);
        self
    }

    /// Builder-style subtask append.
    pub fn with_subtask(mut self, mut subtask: Task) -> Self {
        subtask.section_id = None;
        self.subtasks.push(subtask);
        self
    }

    /// Position of a direct subtask by id.
    pub fn subtask_index(&self, id: TaskId) -> Option<usize> {
        self.subtasks.iter().position(|subtask| subtask.id == id)
    }
}

/// Structural violations in a task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeInvariantError {
    /// A subtask owns subtasks of its own.
    NestedTooDeep { subtask_id: TaskId },
    /// A task appears inside its own subtask list.
    SelfNesting(TaskId),
    /// Two entries share one id.
    DuplicateId(TaskId),
}

impl Display for TreeInvariantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NestedTooDeep { subtask_id } => {
                write!(f, "subtask {subtask_id} must not own subtasks")
            }
            Self::SelfNesting(id) => write!(f, "task {id} is nested inside itself"),
            Self::DuplicateId(id) => write!(f, "duplicate entry id: {id}"),
        }
    }
}

impl Error for TreeInvariantError {}

/// Returns the number of top-level tasks plus all of their subtasks.
pub fn entry_count(tasks: &[Task]) -> usize {
    tasks.iter().map(|task| 1 + task.subtasks.len()).sum()
}

/// Verifies single-level nesting, no self nesting and unique ids.
pub fn check_tree_invariants(tasks: &[Task]) -> Result<(), TreeInvariantError> {
    let mut seen = HashSet::with_capacity(entry_count(tasks));
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(TreeInvariantError::DuplicateId(task.id));
        }
        for subtask in &task.subtasks {
            if subtask.id == task.id {
                return Err(TreeInvariantError::SelfNesting(task.id));
            }
            if !subtask.subtasks.is_empty() {
                return Err(TreeInvariantError::NestedTooDeep {
                    subtask_id: subtask.id,
                });
            }
            if !seen.insert(subtask.id) {
                return Err(TreeInvariantError::DuplicateId(subtask.id));
            }
        }
    }
    Ok(())
}

/// Index of a top-level task by id.
pub fn top_level_index(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|task| task.id == id)
}

#[cfg(test)]
mod tests {
    use super::{check_tree_invariants, entry_count, Task, TreeInvariantError};

    #[test]
    fn entry_count_includes_subtasks() {
        let tasks = vec![
            Task::new("a").with_subtask(Task::new("a.1")).with_subtask(Task::new("a.2")),
            Task::new("b"),
        ];
        assert_eq!(entry_count(&tasks), 4);
    }

    #[test]
    fn invariants_reject_two_level_nesting() {
        let grandchild = Task::new("deep");
        let mut child = Task::new("child");
        child.subtasks.push(grandchild);
        let child_id = child.id;
        let mut parent = Task::new("parent");
        parent.subtasks.push(child);

        let err = check_tree_invariants(&[parent]).unwrap_err();
        assert_eq!(
            err,
            TreeInvariantError::NestedTooDeep {
                subtask_id: child_id
            }
        );
    }

    #[test]
    fn invariants_reject_self_nesting_and_duplicates() {
        let parent = Task::new("parent");
        let mut looped = parent.clone();
        looped.subtasks.push(Task::with_id(parent.id, "copy"));
        assert_eq!(
            check_tree_invariants(&[looped]).unwrap_err(),
            TreeInvariantError::SelfNesting(parent.id)
        );

        let twin = Task::with_id(parent.id, "twin");
        assert_eq!(
            check_tree_invariants(&[parent.clone(), twin]).unwrap_err(),
            TreeInvariantError::DuplicateId(parent.id)
        );
    }

    #[test]
    fn with_subtask_clears_section() {
        let section = uuid::Uuid::new_v4();
        let parent = Task::new("parent").with_subtask(Task::new("child").in_section(section));
        assert_eq!(parent.subtasks[0].section_id, None);
    }
}
