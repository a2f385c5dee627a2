//! Hit-test engine: dragged row position to drop target.
//!
//! # Responsibility
//! - Scan live row/section geometry and pick the nearest drop target.
//! - Report where the drop indicator should be drawn for a target.
//!
//! # Invariants
//! - The subtask band is checked before the before/after split of the same row.
//! - Task-level candidates farther than `SECTION_ESCAPE_DISTANCE_PX` lose to
//!   section containment.
//! - Equal distances resolve to the first row in geometry registration order.
//! - The dragged row, completed rows, subtasks and rows in collapsed sections
//!   are never candidates.

use crate::engine::target::{DropPosition, DropTarget};
use crate::model::entry::DraggableEntry;
use crate::model::section::{Section, SectionId};
use crate::model::task::{Task, TaskId};
use crate::port::geometry::{GeometryProvider, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Start of the subtask band as a fraction of row height.
pub const SUBTASK_ZONE_START: f64 = 0.3;
/// Height of the subtask band as a fraction of row height.
pub const SUBTASK_ZONE_SPAN: f64 = 0.4;
/// Task candidates beyond this distance fall through to section containment.
pub const SECTION_ESCAPE_DISTANCE_PX: f64 = 60.0;

/// Which target kinds a list offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTestMode {
    /// Sections, before/after and subtask nesting.
    #[default]
    Nested,
    /// Sections and before/after only.
    Flat,
}

/// Inputs for one hit-test pass.
#[derive(Debug, Clone, Copy)]
pub struct HitTestInput<'a> {
    pub dragged: &'a DraggableEntry,
    /// Provisional top edge of the dragged row.
    pub dragged_top: f64,
    pub tasks: &'a [Task],
    pub sections: &'a [Section],
    pub mode: HitTestMode,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    target: DropTarget,
    distance: f64,
}

/// Returns the best drop target for the dragged row, or `None` over empty space.
pub fn resolve_drop_target<G>(input: &HitTestInput<'_>, geometry: &G) -> Option<DropTarget>
where
    G: GeometryProvider + ?Sized,
{
    let rows = candidate_rows(input);
    let nestable = can_nest(input);

    let mut best: Option<Candidate> = None;
    for (task_id, rect) in geometry.entry_rects() {
        let Some(&index) = rows.get(&task_id) else {
            continue;
        };
        let candidate = classify_row(task_id, index, rect, input.dragged_top, nestable);
        // Strict comparison keeps the first-registered row on ties.
        if best.map_or(true, |current| candidate.distance < current.distance) {
            best = Some(candidate);
        }
    }

    if let Some(candidate) = best {
        if candidate.distance <= SECTION_ESCAPE_DISTANCE_PX {
            return Some(candidate.target);
        }
    }

    section_containing(input, geometry)
}

/// Vertical coordinate of the drop indicator for `target`.
pub fn indicator_y<G>(target: &DropTarget, geometry: &G) -> Option<f64>
where
    G: GeometryProvider + ?Sized,
{
    match target {
        DropTarget::Section { section_id } => {
            geometry.section_rect(*section_id).map(|rect| rect.bottom())
        }
        DropTarget::BeforeAfterTask {
            task_id,
            position: DropPosition::Before,
            ..
        } => geometry.entry_rect(*task_id).map(|rect| rect.top()),
        DropTarget::BeforeAfterTask { task_id, .. } | DropTarget::SubtaskArea { task_id } => {
            geometry.entry_rect(*task_id).map(|rect| rect.bottom())
        }
    }
}

/// Vertical band of a row that reads as "nest inside".
pub fn subtask_zone(rect: &Rect) -> (f64, f64) {
    let start = rect.top() + SUBTASK_ZONE_START * rect.height;
    (start, start + SUBTASK_ZONE_SPAN * rect.height)
}

fn classify_row(
    task_id: TaskId,
    index: usize,
    rect: Rect,
    dragged_top: f64,
    nestable: bool,
) -> Candidate {
    let (zone_start, zone_end) = subtask_zone(&rect);
    if nestable && dragged_top >= zone_start && dragged_top <= zone_end {
        return Candidate {
            target: DropTarget::SubtaskArea { task_id },
            distance: (dragged_top - rect.center_y()).abs(),
        };
    }

    if dragged_top < rect.center_y() {
        Candidate {
            target: DropTarget::BeforeAfterTask {
                task_id,
                position: DropPosition::Before,
                insert_index: index,
            },
            distance: (dragged_top - rect.top()).abs(),
        }
    } else {
        Candidate {
            target: DropTarget::BeforeAfterTask {
                task_id,
                position: DropPosition::After,
                insert_index: index + 1,
            },
            distance: (dragged_top - rect.bottom()).abs(),
        }
    }
}

/// Top-level rows that may receive a drop, keyed to their collection index.
fn candidate_rows(input: &HitTestInput<'_>) -> HashMap<TaskId, usize> {
    let dragged_id = input.dragged.id();
    input
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.id != dragged_id && !task.completed)
        .filter(|(_, task)| section_is_open(input.sections, task.section_id))
        .map(|(index, task)| (task.id, index))
        .collect()
}

/// Only childless top-level tasks may become subtasks.
fn can_nest(input: &HitTestInput<'_>) -> bool {
    if input.mode != HitTestMode::Nested {
        return false;
    }
    match input.dragged {
        DraggableEntry::Subtask { .. } => false,
        DraggableEntry::Task { id, .. } => input
            .tasks
            .iter()
            .find(|task| task.id == *id)
            .map_or(true, |task| task.subtasks.is_empty()),
    }
}

fn section_is_open(sections: &[Section], section_id: Option<SectionId>) -> bool {
    match section_id {
        None => true,
        Some(section_id) => sections
            .iter()
            .find(|section| section.id == section_id)
            .map_or(true, Section::accepts_drops),
    }
}

fn section_containing<G>(input: &HitTestInput<'_>, geometry: &G) -> Option<DropTarget>
where
    G: GeometryProvider + ?Sized,
{
    geometry
        .section_rects()
        .into_iter()
        .filter(|(section_id, _)| {
            input
                .sections
                .iter()
                .any(|section| section.id == *section_id && section.accepts_drops())
        })
        .find(|(_, rect)| rect.contains_y(input.dragged_top))
        .map(|(section_id, _)| DropTarget::Section { section_id })
}

#[cfg(test)]
mod tests {
    use super::{resolve_drop_target, subtask_zone, HitTestInput, HitTestMode};
    use crate::engine::target::{DropPosition, DropTarget};
    use crate::model::entry::DraggableEntry;
    use crate::model::section::Section;
    use crate::model::task::Task;
    use crate::port::geometry::{GeometryMap, Rect};

    fn layout(tasks: &[Task]) -> GeometryMap {
        let mut geometry = GeometryMap::new();
        for (index, task) in tasks.iter().enumerate() {
            geometry.register_entry(task.id, Rect::row(index as f64 * 100.0, 100.0));
        }
        geometry
    }

    fn dragged(task: &Task) -> DraggableEntry {
        DraggableEntry::Task {
            id: task.id,
            section_id: task.section_id,
        }
    }

    #[test]
    fn subtask_zone_is_middle_forty_percent() {
        let (start, end) = subtask_zone(&Rect::row(100.0, 50.0));
        assert_eq!(start, 115.0);
        assert_eq!(end, 135.0);
    }

    #[test]
    fn middle_band_nests_and_edges_split_before_after() {
        let tasks = vec![Task::new("drag me"), Task::new("target")];
        let geometry = layout(&tasks);
        let entry = dragged(&tasks[0]);
        let at = |dragged_top: f64| {
            resolve_drop_target(
                &HitTestInput {
                    dragged: &entry,
                    dragged_top,
                    tasks: &tasks,
                    sections: &[],
                    mode: HitTestMode::Nested,
                },
                &geometry,
            )
        };

        assert_eq!(
            at(150.0),
            Some(DropTarget::SubtaskArea {
                task_id: tasks[1].id
            })
        );
        assert_eq!(
            at(110.0),
            Some(DropTarget::BeforeAfterTask {
                task_id: tasks[1].id,
                position: DropPosition::Before,
                insert_index: 1,
            })
        );
        assert_eq!(
            at(185.0),
            Some(DropTarget::BeforeAfterTask {
                task_id: tasks[1].id,
                position: DropPosition::After,
                insert_index: 2,
            })
        );
    }

    #[test]
    fn flat_mode_never_nests() {
        let tasks = vec![Task::new("drag me"), Task::new("target")];
        let geometry = layout(&tasks);
        let entry = dragged(&tasks[0]);
        let target = resolve_drop_target(
            &HitTestInput {
                dragged: &entry,
                dragged_top: 145.0,
                tasks: &tasks,
                sections: &[],
                mode: HitTestMode::Flat,
            },
            &geometry,
        );
        assert!(matches!(
            target,
            Some(DropTarget::BeforeAfterTask {
                position: DropPosition::Before,
                ..
            })
        ));
    }

    #[test]
    fn far_rows_escape_to_containing_section() {
        let section = Section::new("Later", "blue", 0);
        let tasks = vec![
            Task::new("drag me").in_section(section.id),
            Task::new("short row").in_section(section.id),
        ];
        let mut geometry = GeometryMap::new();
        geometry.register_entry(tasks[1].id, Rect::row(0.0, 20.0));
        geometry.register_section(section.id, Rect::row(0.0, 400.0));
        let entry = dragged(&tasks[0]);

        let target = resolve_drop_target(
            &HitTestInput {
                dragged: &entry,
                dragged_top: 300.0,
                tasks: &tasks,
                sections: std::slice::from_ref(&section),
                mode: HitTestMode::Nested,
            },
            &geometry,
        );
        assert_eq!(
            target,
            Some(DropTarget::Section {
                section_id: section.id
            })
        );
    }
}
