//! Section model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable section identifier.
pub type SectionId = Uuid;

/// Display group for top-level tasks.
///
/// The reorder engine never creates or destroys sections. It only reads
/// `order` for sequencing and `is_collapsed` to exclude hidden sections from
/// hit-testing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    /// UI color token, carried verbatim.
    pub color: String,
    /// Unique display sequence key.
    pub order: i64,
    #[serde(default)]
    pub is_collapsed: bool,
}

impl Section {
    /// Creates an expanded section with a generated id.
    pub fn new(name: impl Into<String>, color: impl Into<String>, order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            order,
            is_collapsed: false,
        }
    }

    /// Whether rows of this section take part in hit-testing.
    pub fn accepts_drops(&self) -> bool {
        !self.is_collapsed
    }
}

/// Returns sections sorted by display order.
pub fn sections_in_display_order(sections: &[Section]) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|section| section.order);
    ordered
}
