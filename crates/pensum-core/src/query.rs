//! # Query Layer
//!
//! Pure read-side derivations over the board state. Nothing here mutates;
//! every function is deterministic for a given board and is recomputed per
//! call rather than incrementally maintained.

use crate::board::CurriculumBoard;
use crate::limits::ALWAYS_VISIBLE_SEMESTERS;
use crate::types::{Axis, AxisColor, Subject};
use serde::{Deserialize, Serialize};

// =============================================================================
// RELATION CLASSIFICATION
// =============================================================================

/// How a subject relates to the currently focused subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    /// The focused subject itself.
    Active,
    /// A prerequisite of the focused subject.
    Prereq,
    /// A corequisite of the focused subject.
    Coreq,
    /// A subject that lists the focused one as a requisite.
    Dependent,
    /// No relation.
    None,
}

/// Classify `subject_id` relative to the focused subject `active_id`.
///
/// The priority order is a contract: self, then prerequisite-of-active,
/// then corequisite-of-active, then dependent-on-active, then none. First
/// match wins: in a malformed board a subject could satisfy several
/// conditions at once, and this order decides which one shows.
#[must_use]
pub fn classify_highlight(board: &CurriculumBoard, active_id: &str, subject_id: &str) -> Highlight {
    if active_id == subject_id {
        return Highlight::Active;
    }

    let Some(active) = board.subject_by_id(active_id) else {
        return Highlight::None;
    };

    if active.prerequisites.iter().any(|p| p == subject_id) {
        return Highlight::Prereq;
    }
    if active.corequisites.iter().any(|c| c == subject_id) {
        return Highlight::Coreq;
    }

    if let Some(subject) = board.subject_by_id(subject_id) {
        if subject.references(active_id) {
            return Highlight::Dependent;
        }
    }

    Highlight::None
}

// =============================================================================
// AXIS RESOLUTION
// =============================================================================

/// Resolve a subject's axis reference to a displayable axis.
///
/// Trimmed-name lookup; a dangling reference falls back to a synthetic
/// placeholder so display never fails on it.
#[must_use]
pub fn resolve_axis(board: &CurriculumBoard, axis_name: &str) -> Axis {
    board
        .axis_by_name(axis_name)
        .cloned()
        .unwrap_or_else(|| Axis {
            id: "unresolved".to_string(),
            name: axis_name.to_string(),
            label: "???".to_string(),
            color: AxisColor::Slate,
        })
}

// =============================================================================
// SEMESTER GROUPING
// =============================================================================

/// One semester column with the subjects that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterGroup {
    pub number: u32,
    pub subjects: Vec<Subject>,
}

/// Group subjects by semester, filtered by a search query.
///
/// The query matches case-insensitively against subject name or id; an
/// empty query matches everything. A semester group is emitted when it has
/// matching subjects, when `show_empty` is set, or when its number is at
/// or below [`ALWAYS_VISIBLE_SEMESTERS`]. Groups are ascending by semester
/// number and subjects keep store order within a group.
#[must_use]
pub fn group_by_semester(
    subjects: &[Subject],
    total_semesters: u32,
    search: &str,
    show_empty: bool,
) -> Vec<SemesterGroup> {
    let query = search.trim().to_lowercase();
    let matches = |s: &Subject| {
        query.is_empty()
            || s.name.to_lowercase().contains(&query)
            || s.id.to_lowercase().contains(&query)
    };

    let mut groups = Vec::new();
    for number in 1..=total_semesters {
        let selected: Vec<Subject> = subjects
            .iter()
            .filter(|s| s.semester == number && matches(s))
            .cloned()
            .collect();

        if !selected.is_empty() || show_empty || number <= ALWAYS_VISIBLE_SEMESTERS {
            groups.push(SemesterGroup {
                number,
                subjects: selected,
            });
        }
    }
    groups
}

// =============================================================================
// TESTS
// =============================================================================
