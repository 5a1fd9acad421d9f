//! # Curriculum Board
//!
//! The entity store for the Pensum core: the authoritative in-memory
//! collections of subjects and axes plus the scalar program metadata.
//!
//! The store itself performs no cross-entity validation. Mutating commands
//! go through [`crate::mutation::BoardEditor`], which computes a valid next
//! state and applies it here with the unconditional `replace_*` swaps.
//! Insertion order of both collections is preserved; nothing semantic
//! depends on it, but display order stays stable.

use crate::types::{Axis, ProgramInfo, Subject};

/// The authoritative board state: subjects, axes, program metadata, and the
/// semester count.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumBoard {
    /// Subjects in insertion order.
    subjects: Vec<Subject>,

    /// Axes in insertion order.
    axes: Vec<Axis>,

    /// Scalar program metadata.
    program: ProgramInfo,

    /// Number of semester columns, never below 1.
    total_semesters: u32,
}

impl Default for CurriculumBoard {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            axes: Vec::new(),
            program: ProgramInfo::default(),
            total_semesters: 1,
        }
    }
}

impl CurriculumBoard {
    /// Create a new empty board with a single semester.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a board from complete parts (seeding, snapshot import).
    #[must_use]
    pub fn with_parts(
        subjects: Vec<Subject>,
        axes: Vec<Axis>,
        program: ProgramInfo,
        total_semesters: u32,
    ) -> Self {
        Self {
            subjects,
            axes,
            program,
            total_semesters: total_semesters.max(1),
        }
    }

    // =========================================================================
    // READ SIDE
    // =========================================================================

    /// All subjects in insertion order.
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// All axes in insertion order.
    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Scalar program metadata.
    #[must_use]
    pub fn program(&self) -> &ProgramInfo {
        &self.program
    }

    /// Number of semester columns.
    #[must_use]
    pub fn total_semesters(&self) -> u32 {
        self.total_semesters
    }

    /// Number of subjects in the store.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Number of axes in the store.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Lookup a subject by id.
    #[must_use]
    pub fn subject_by_id(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Whether a subject with this id exists.
    #[must_use]
    pub fn contains_subject(&self, id: &str) -> bool {
        self.subject_by_id(id).is_some()
    }

    /// Lookup an axis by its stable id.
    #[must_use]
    pub fn axis_by_id(&self, id: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.id == id)
    }

    /// Lookup an axis by name under trimmed comparison.
    ///
    /// Trimming here tolerates whitespace drift in data imported from
    /// older files; writes through the integrity engine are already
    /// normalized.
    #[must_use]
    pub fn axis_by_name(&self, name: &str) -> Option<&Axis> {
        let wanted = name.trim();
        self.axes.iter().find(|a| a.name.trim() == wanted)
    }

    /// Subjects assigned to the given semester, in store order.
    pub fn subjects_in_semester(&self, semester: u32) -> impl Iterator<Item = &Subject> {
        self.subjects.iter().filter(move |s| s.semester == semester)
    }

    // =========================================================================
    // REPLACE SIDE (unconditional swaps, validity guaranteed by the caller)
    // =========================================================================

    /// Swap the entire subject collection.
    pub fn replace_subjects(&mut self, next: Vec<Subject>) {
        self.subjects = next;
    }

    /// Swap the entire axis collection.
    pub fn replace_axes(&mut self, next: Vec<Axis>) {
        self.axes = next;
    }

    /// Replace the program metadata.
    pub fn set_program(&mut self, program: ProgramInfo) {
        self.program = program;
    }

    /// Set the semester count (floor 1).
    pub fn set_total_semesters(&mut self, total: u32) {
        self.total_semesters = total.max(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AxisColor;

    fn subject(id: &str, semester: u32) -> Subject {
        Subject {
            id: id.to_string(),
            name: format!("Subject {id}"),
            semester,
            axis_name: String::new(),
            prerequisites: vec![],
            corequisites: vec![],
            details: None,
        }
    }

    #[test]
    fn new_board_has_one_semester() {
        let board = CurriculumBoard::new();
        assert_eq!(board.total_semesters(), 1);
        assert_eq!(board.subject_count(), 0);
    }

    #[test]
    fn replace_preserves_insertion_order() {
        let mut board = CurriculumBoard::new();
        board.replace_subjects(vec![subject("B", 1), subject("A", 1)]);

        let ids: Vec<&str> = board.subjects().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn axis_by_name_trims_both_sides() {
        let mut board = CurriculumBoard::new();
        board.replace_axes(vec![Axis {
            id: "ax-1".to_string(),
            name: " Básico ".to_string(),
            label: "BAS".to_string(),
            color: AxisColor::Indigo,
        }]);

        assert!(board.axis_by_name("Básico").is_some());
        assert!(board.axis_by_name("  Básico  ").is_some());
        assert!(board.axis_by_name("Humanidades").is_none());
    }

    #[test]
    fn total_semesters_floors_at_one() {
        let mut board = CurriculumBoard::new();
        board.set_total_semesters(0);
        assert_eq!(board.total_semesters(), 1);
    }

    #[test]
    fn subjects_in_semester_filters() {
        let mut board = CurriculumBoard::new();
        board.replace_subjects(vec![subject("A", 1), subject("B", 2), subject("C", 1)]);

        let ids: Vec<&str> = board
            .subjects_in_semester(1)
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }
}
