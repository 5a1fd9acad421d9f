//! # Mutation Engine
//!
//! The referential-integrity engine for the curriculum board. Every
//! mutating command passes through here.
//!
//! All operations are validate-then-commit: checks run against the current
//! state first, and the board is only touched once the whole mutation is
//! known to succeed. A returned error therefore guarantees an unchanged
//! board.
//!
//! Normalization happens on write: ids, names, and axis references are
//! trimmed before any comparison or commit, so runtime joins never depend
//! on whitespace.

use crate::board::CurriculumBoard;
use crate::types::{Axis, BoardError, Subject, SubjectDetails};
use serde::Serialize;

// =============================================================================
// REFERENCE AUDIT
// =============================================================================

/// Which requisite list a dangling entry was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequisiteKind {
    Prerequisite,
    Corequisite,
}

/// A requisite entry pointing at a subject id that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRequisite {
    pub subject_id: String,
    pub kind: RequisiteKind,
    pub missing_id: String,
}

/// A subject bound to an axis name with no matching axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedAxis {
    pub subject_id: String,
    pub axis_name: String,
}

/// Result of a referential-integrity pass over the board.
///
/// Dangling references are tolerated at runtime (display resolves them to
/// a placeholder); this report makes them observable after imports and
/// manual requisite edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceAudit {
    pub dangling: Vec<DanglingRequisite>,
    pub unresolved_axes: Vec<UnresolvedAxis>,
}

impl ReferenceAudit {
    /// True when the board has no dangling references at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.unresolved_axes.is_empty()
    }
}

// =============================================================================
// BOARD EDITOR
// =============================================================================

/// The BoardEditor consolidates all integrity-checked board mutations.
pub struct BoardEditor;

impl BoardEditor {
    // =========================================================================
    // SUBJECTS
    // =========================================================================

    /// Produce a staged new subject for the given semester.
    ///
    /// The draft is NOT committed to the board; it becomes real only when
    /// passed to [`Self::save_subject`]. The id is a fresh `NEW-n` that
    /// collides with nothing currently stored, and the axis defaults to
    /// the first existing axis's name (empty if none exist).
    #[must_use]
    pub fn draft_subject(board: &CurriculumBoard, semester: u32) -> Subject {
        let mut n = 1usize;
        let id = loop {
            let candidate = format!("NEW-{n}");
            if !board.contains_subject(&candidate) {
                break candidate;
            }
            n += 1;
        };

        Subject {
            id,
            name: "Nueva Asignatura".to_string(),
            semester: semester.max(1),
            axis_name: board
                .axes()
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
            details: Some(SubjectDetails::default()),
        }
    }

    /// Save a subject, either replacing an existing one or appending a new
    /// one.
    ///
    /// When `original_id` names a stored subject, that record is replaced
    /// wholesale. If the id changed in the process, the rename cascades:
    /// every requisite entry equal to the old id is rewritten to the new
    /// one, and a rename that would collide with another stored id is
    /// rejected. When `original_id` is absent or unknown, the candidate is
    /// appended after an id-collision check.
    pub fn save_subject(
        board: &mut CurriculumBoard,
        candidate: Subject,
        original_id: Option<&str>,
    ) -> Result<(), BoardError> {
        let mut candidate = candidate;
        candidate.normalize();

        if candidate.id.is_empty() {
            return Err(BoardError::EmptySubjectId);
        }
        if candidate.semester == 0 {
            return Err(BoardError::InvalidSemester);
        }

        let existing = original_id
            .and_then(|oid| board.subjects().iter().position(|s| s.id == oid));

        let Some(index) = existing else {
            // New subject: reject on collision, else append.
            if board.contains_subject(&candidate.id) {
                return Err(BoardError::DuplicateSubjectId(candidate.id));
            }
            let mut next = board.subjects().to_vec();
            next.push(candidate);
            board.replace_subjects(next);
            return Ok(());
        };

        let old_id = board.subjects()[index].id.clone();
        let renamed = candidate.id != old_id;

        if renamed
            && board
                .subjects()
                .iter()
                .enumerate()
                .any(|(i, s)| i != index && s.id == candidate.id)
        {
            return Err(BoardError::DuplicateSubjectId(candidate.id));
        }

        let new_id = candidate.id.clone();
        let mut next = board.subjects().to_vec();
        next[index] = candidate;

        if renamed {
            // Cascade: keep referential continuity across the id rename.
            for subject in &mut next {
                for list in [&mut subject.prerequisites, &mut subject.corequisites] {
                    for entry in list.iter_mut() {
                        if *entry == old_id {
                            entry.clone_from(&new_id);
                        }
                    }
                }
            }
        }

        board.replace_subjects(next);
        Ok(())
    }

    /// Delete a subject by id.
    ///
    /// An unknown id is a no-op cancel (`Ok(false)`); this is the path a
    /// discarded in-progress creation takes. A subject listed in any other
    /// subject's requisites is protected by a hard guard carrying the
    /// referencing subjects' names.
    pub fn delete_subject(board: &mut CurriculumBoard, id: &str) -> Result<bool, BoardError> {
        let id = id.trim();
        let Some(target) = board.subject_by_id(id) else {
            return Ok(false);
        };
        let name = target.name.clone();

        let blocking: Vec<String> = board
            .subjects()
            .iter()
            .filter(|s| s.references(id))
            .map(|s| s.name.clone())
            .collect();
        if !blocking.is_empty() {
            return Err(BoardError::SubjectInUse { name, blocking });
        }

        let next = board
            .subjects()
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();
        board.replace_subjects(next);
        Ok(true)
    }

    /// Reassign a subject's semester.
    ///
    /// This is the drag-and-drop relocation primitive: any positive target
    /// is accepted, including a no-op move onto the current semester. An
    /// unknown id is a no-op (`Ok(false)`).
    pub fn move_subject(
        board: &mut CurriculumBoard,
        id: &str,
        target_semester: u32,
    ) -> Result<bool, BoardError> {
        if target_semester == 0 {
            return Err(BoardError::InvalidSemester);
        }
        let id = id.trim();
        if !board.contains_subject(id) {
            return Ok(false);
        }

        let next = board
            .subjects()
            .iter()
            .map(|s| {
                if s.id == id {
                    let mut moved = s.clone();
                    moved.semester = target_semester;
                    moved
                } else {
                    s.clone()
                }
            })
            .collect();
        board.replace_subjects(next);
        Ok(true)
    }

    // =========================================================================
    // AXES
    // =========================================================================

    /// Create a new axis.
    ///
    /// Axis identity must stay unique under the comparison the board joins
    /// with, so both the id and the trimmed name are checked here.
    pub fn create_axis(
        board: &mut CurriculumBoard,
        axis: Axis,
    ) -> Result<(), BoardError> {
        let mut axis = axis;
        axis.normalize();

        if board.axis_by_id(&axis.id).is_some() {
            return Err(BoardError::DuplicateAxisId(axis.id));
        }
        if board.axis_by_name(&axis.name).is_some() {
            return Err(BoardError::DuplicateAxisName(axis.name));
        }

        let mut next = board.axes().to_vec();
        next.push(axis);
        board.replace_axes(next);
        Ok(())
    }

    /// Update an axis record by id.
    ///
    /// When `old_name` is provided and differs (raw comparison) from the
    /// new name, every subject bound to the old name (trimmed comparison)
    /// is rewritten to the new one, keeping the denormalized subject→axis
    /// binding alive across the rename.
    pub fn update_axis(
        board: &mut CurriculumBoard,
        updated: Axis,
        old_name: Option<&str>,
    ) -> Result<(), BoardError> {
        let mut updated = updated;
        updated.normalize();

        let Some(index) = board.axes().iter().position(|a| a.id == updated.id) else {
            return Err(BoardError::AxisNotFound(updated.id));
        };
        if board
            .axes()
            .iter()
            .enumerate()
            .any(|(i, a)| i != index && a.name.trim() == updated.name)
        {
            return Err(BoardError::DuplicateAxisName(updated.name));
        }

        let new_name = updated.name.clone();
        let mut next = board.axes().to_vec();
        next[index] = updated;
        board.replace_axes(next);

        if let Some(old_name) = old_name {
            if old_name != new_name {
                let old_trimmed = old_name.trim();
                let subjects = board
                    .subjects()
                    .iter()
                    .map(|s| {
                        if s.axis_name.trim() == old_trimmed {
                            let mut rebound = s.clone();
                            rebound.axis_name.clone_from(&new_name);
                            rebound
                        } else {
                            s.clone()
                        }
                    })
                    .collect();
                board.replace_subjects(subjects);
            }
        }

        Ok(())
    }

    /// Delete an axis by id.
    ///
    /// An unknown id is a no-op (`Ok(false)`). Any subject whose trimmed
    /// axis reference matches the axis name blocks the deletion.
    pub fn delete_axis(board: &mut CurriculumBoard, id: &str) -> Result<bool, BoardError> {
        let Some(axis) = board.axis_by_id(id.trim()) else {
            return Ok(false);
        };
        let axis_name = axis.name.clone();
        let trimmed = axis_name.trim();

        let blocking: Vec<String> = board
            .subjects()
            .iter()
            .filter(|s| s.axis_name.trim() == trimmed)
            .map(|s| s.name.clone())
            .collect();
        if !blocking.is_empty() {
            return Err(BoardError::AxisInUse {
                name: axis_name,
                blocking,
            });
        }

        let id = id.trim();
        let next = board
            .axes()
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        board.replace_axes(next);
        Ok(true)
    }

    // =========================================================================
    // SEMESTERS
    // =========================================================================

    /// Append a semester column. Unconditional, no upper bound.
    pub fn add_semester(board: &mut CurriculumBoard) -> u32 {
        let next = board.total_semesters().saturating_add(1);
        board.set_total_semesters(next);
        next
    }

    /// Remove semester `n`, closing the gap.
    ///
    /// Only an empty semester may be removed. Every subject above `n`
    /// shifts down by exactly one, in a single pass, so no subject is
    /// skipped or double-shifted. Returns the new total (floor 1).
    pub fn delete_semester(board: &mut CurriculumBoard, n: u32) -> Result<u32, BoardError> {
        if n == 0 || n > board.total_semesters() {
            return Err(BoardError::SemesterNotFound(n));
        }

        let blocking: Vec<String> = board
            .subjects_in_semester(n)
            .map(|s| s.name.clone())
            .collect();
        if !blocking.is_empty() {
            return Err(BoardError::SemesterOccupied {
                semester: n,
                blocking,
            });
        }

        let next_total = board.total_semesters().saturating_sub(1).max(1);
        let shifted = board
            .subjects()
            .iter()
            .map(|s| {
                if s.semester > n {
                    let mut moved = s.clone();
                    moved.semester -= 1;
                    moved
                } else {
                    s.clone()
                }
            })
            .collect();
        board.replace_subjects(shifted);
        board.set_total_semesters(next_total);
        Ok(next_total)
    }

    // =========================================================================
    // REFERENCE AUDIT
    // =========================================================================

    /// Run a referential-integrity pass over the board.
    ///
    /// Reports requisite entries that point at no stored subject and
    /// non-empty axis references that resolve to no axis. Never fails and
    /// never mutates; the caller decides what to do with the findings.
    #[must_use]
    pub fn audit_references(board: &CurriculumBoard) -> ReferenceAudit {
        let mut audit = ReferenceAudit::default();

        for subject in board.subjects() {
            for (kind, list) in [
                (RequisiteKind::Prerequisite, &subject.prerequisites),
                (RequisiteKind::Corequisite, &subject.corequisites),
            ] {
                for entry in list {
                    if !board.contains_subject(entry) {
                        audit.dangling.push(DanglingRequisite {
                            subject_id: subject.id.clone(),
                            kind,
                            missing_id: entry.clone(),
                        });
                    }
                }
            }

            if !subject.axis_name.trim().is_empty()
                && board.axis_by_name(&subject.axis_name).is_none()
            {
                audit.unresolved_axes.push(UnresolvedAxis {
                    subject_id: subject.id.clone(),
                    axis_name: subject.axis_name.clone(),
                });
            }
        }

        audit
    }
}

// =============================================================================
// TESTS
// =============================================================================
