//! # Session Module
//!
//! A Session owns the board and an optional persistence port. It is the
//! command boundary the outside world talks to:
//!
//! - read-at-init: a session created with a store seeds itself from the
//!   persisted slots, or from the bundled dataset when none exist
//! - write-after-mutation: every successful mutation persists the slots it
//!   touched; a rejected mutation persists nothing
//!
//! Mutations are synchronous and run to completion one at a time; there is
//! exactly one logical writer, so no locking discipline is needed here.
//! The binary wraps the session in shared state for its API server.

use crate::board::CurriculumBoard;
use crate::mutation::{BoardEditor, ReferenceAudit};
use crate::query::{self, Highlight, SemesterGroup};
use crate::seed;
use crate::snapshot::{self, Snapshot};
use crate::storage::{Slot, SlotStore};
use crate::types::{Axis, BoardError, ProgramInfo, Subject};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// Default display theme for new sessions.
const DEFAULT_THEME: &str = "dark";

/// The command boundary: board state plus the injectable persistence port.
pub struct Session {
    board: CurriculumBoard,
    store: Option<Box<dyn SlotStore>>,
    theme: String,
    started: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subjects", &self.board.subject_count())
            .field("axes", &self.board.axis_count())
            .field("total_semesters", &self.board.total_semesters())
            .field("persistent", &self.store.is_some())
            .field("started", &self.started)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Create an empty, storeless session (one blank semester).
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: CurriculumBoard::new(),
            store: None,
            theme: DEFAULT_THEME.to_string(),
            started: false,
        }
    }

    /// Create a storeless session over an existing board.
    #[must_use]
    pub fn with_board(board: CurriculumBoard) -> Self {
        Self {
            board,
            store: None,
            theme: DEFAULT_THEME.to_string(),
            started: false,
        }
    }

    /// Create a storeless session seeded from the bundled dataset.
    #[must_use]
    pub fn seeded() -> Self {
        Self::with_board(seed::seed_board())
    }

    /// Create a session backed by a persistence store.
    ///
    /// Reads every slot once. A store with no subjects slot is treated as
    /// brand new: the session seeds from the bundled dataset (first three
    /// semesters) and persists the seed immediately.
    pub fn with_store(store: Box<dyn SlotStore>) -> Result<Self, BoardError> {
        let mut session = Self {
            board: CurriculumBoard::new(),
            store: Some(store),
            theme: DEFAULT_THEME.to_string(),
            started: false,
        };

        let subjects: Option<Vec<Subject>> = session.read_slot(Slot::Subjects)?;
        match subjects {
            Some(subjects) => {
                let axes: Vec<Axis> = session.read_slot(Slot::Axes)?.unwrap_or_default();
                let program: ProgramInfo = session
                    .read_slot(Slot::ProgramInfo)?
                    .unwrap_or_default();
                let total: u32 = session.read_slot(Slot::SemesterCount)?.unwrap_or_else(|| {
                    // Older stores may lack the count slot; derive it.
                    subjects.iter().map(|s| s.semester).max().unwrap_or(1)
                });
                session.board = CurriculumBoard::with_parts(subjects, axes, program, total);
                session.theme = session
                    .read_slot(Slot::Theme)?
                    .unwrap_or_else(|| DEFAULT_THEME.to_string());
                session.started = session.read_slot(Slot::StartedFlag)?.unwrap_or(false);
            }
            None => {
                session.board = seed::seed_board();
                session.persist_all()?;
            }
        }

        Ok(session)
    }

    // =========================================================================
    // READ SIDE
    // =========================================================================

    /// The current board state.
    #[must_use]
    pub fn board(&self) -> &CurriculumBoard {
        &self.board
    }

    /// Current display theme (an opaque persisted scalar).
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Whether onboarding has completed.
    #[must_use]
    pub fn started(&self) -> bool {
        self.started
    }

    /// Whether the session persists to a store.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Semester grouping with search filtering (recomputed per call).
    #[must_use]
    pub fn semesters(&self, search: &str, show_empty: bool) -> Vec<SemesterGroup> {
        query::group_by_semester(
            self.board.subjects(),
            self.board.total_semesters(),
            search,
            show_empty,
        )
    }

    /// Classify a subject relative to the focused one.
    #[must_use]
    pub fn classify(&self, active_id: &str, subject_id: &str) -> Highlight {
        query::classify_highlight(&self.board, active_id, subject_id)
    }

    /// Resolve an axis reference for display.
    #[must_use]
    pub fn resolve_axis(&self, axis_name: &str) -> Axis {
        query::resolve_axis(&self.board, axis_name)
    }

    /// Stage a new subject for the given semester (not committed).
    #[must_use]
    pub fn draft_subject(&self, semester: u32) -> Subject {
        BoardEditor::draft_subject(&self.board, semester)
    }

    /// Run the referential-integrity audit.
    #[must_use]
    pub fn audit(&self) -> ReferenceAudit {
        BoardEditor::audit_references(&self.board)
    }

    /// Capture the full board as a snapshot with the given timestamp.
    #[must_use]
    pub fn export_snapshot(&self, timestamp: impl Into<String>) -> Snapshot {
        Snapshot::from_board(&self.board, timestamp)
    }

    // =========================================================================
    // MUTATIONS (validate via the engine, then persist)
    // =========================================================================

    /// Save a subject (create or replace; see [`BoardEditor::save_subject`]).
    pub fn save_subject(
        &mut self,
        candidate: Subject,
        original_id: Option<&str>,
    ) -> Result<(), BoardError> {
        BoardEditor::save_subject(&mut self.board, candidate, original_id)?;
        self.persist_subjects()
    }

    /// Delete a subject; `Ok(false)` when the id was not stored.
    pub fn delete_subject(&mut self, id: &str) -> Result<bool, BoardError> {
        let removed = BoardEditor::delete_subject(&mut self.board, id)?;
        if removed {
            self.persist_subjects()?;
        }
        Ok(removed)
    }

    /// Reassign a subject's semester; `Ok(false)` when the id was not stored.
    pub fn move_subject(&mut self, id: &str, target_semester: u32) -> Result<bool, BoardError> {
        let moved = BoardEditor::move_subject(&mut self.board, id, target_semester)?;
        if moved {
            self.persist_subjects()?;
        }
        Ok(moved)
    }

    /// Create an axis.
    pub fn create_axis(&mut self, axis: Axis) -> Result<(), BoardError> {
        BoardEditor::create_axis(&mut self.board, axis)?;
        self.persist_axes()
    }

    /// Update an axis; a rename rebinds subjects, so both slots persist.
    pub fn update_axis(&mut self, updated: Axis, old_name: Option<&str>) -> Result<(), BoardError> {
        BoardEditor::update_axis(&mut self.board, updated, old_name)?;
        self.persist_axes()?;
        self.persist_subjects()
    }

    /// Delete an axis; `Ok(false)` when the id was not stored.
    pub fn delete_axis(&mut self, id: &str) -> Result<bool, BoardError> {
        let removed = BoardEditor::delete_axis(&mut self.board, id)?;
        if removed {
            self.persist_axes()?;
        }
        Ok(removed)
    }

    /// Append a semester column; returns the new total.
    pub fn add_semester(&mut self) -> Result<u32, BoardError> {
        let total = BoardEditor::add_semester(&mut self.board);
        self.persist_semester_count()?;
        Ok(total)
    }

    /// Remove an empty semester; compaction touches subjects too.
    pub fn delete_semester(&mut self, n: u32) -> Result<u32, BoardError> {
        let total = BoardEditor::delete_semester(&mut self.board, n)?;
        self.persist_semester_count()?;
        self.persist_subjects()?;
        Ok(total)
    }

    /// Replace the program metadata.
    pub fn set_program(&mut self, program: ProgramInfo) -> Result<(), BoardError> {
        self.board.set_program(program);
        self.persist_program()
    }

    /// Set the display theme.
    pub fn set_theme(&mut self, theme: &str) -> Result<(), BoardError> {
        self.theme = theme.to_string();
        let value = self.theme.clone();
        self.write_slot(Slot::Theme, &value)
    }

    /// Mark onboarding as completed (or not).
    pub fn set_started(&mut self, started: bool) -> Result<(), BoardError> {
        self.started = started;
        self.write_slot(Slot::StartedFlag, &started)
    }

    // =========================================================================
    // SNAPSHOT IMPORT / RESET
    // =========================================================================

    /// Parse, validate, and atomically apply an interchange payload.
    ///
    /// A parse failure leaves the board completely unchanged. On success
    /// the whole store is replaced, the session is marked started, and the
    /// reference audit of the imported data is returned for display.
    pub fn import_json(&mut self, raw: &[u8]) -> Result<ReferenceAudit, BoardError> {
        let parsed = snapshot::snapshot_from_json(raw)?;
        self.import_snapshot(parsed)
    }

    /// Atomically apply an already-validated snapshot.
    pub fn import_snapshot(&mut self, parsed: Snapshot) -> Result<ReferenceAudit, BoardError> {
        snapshot::apply_snapshot(&mut self.board, parsed);
        self.started = true;
        self.persist_all()?;
        Ok(self.audit())
    }

    /// Wipe persisted state and return to the bundled seed.
    pub fn reset(&mut self) -> Result<(), BoardError> {
        if let Some(store) = &mut self.store {
            store.clear()?;
        }
        self.board = seed::seed_board();
        self.theme = DEFAULT_THEME.to_string();
        self.started = false;
        self.persist_all()
    }

    // =========================================================================
    // SLOT ENCODING
    // =========================================================================

    fn read_slot<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>, BoardError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let Some(bytes) = store.read(slot)? else {
            return Ok(None);
        };
        postcard::from_bytes(&bytes)
            .map(Some)
            .map_err(|e| BoardError::Serialization(e.to_string()))
    }

    fn write_slot<T: Serialize + ?Sized>(&mut self, slot: Slot, value: &T) -> Result<(), BoardError> {
        let Some(store) = &mut self.store else {
            return Ok(());
        };
        let bytes =
            postcard::to_stdvec(value).map_err(|e| BoardError::Serialization(e.to_string()))?;
        store.write(slot, &bytes)
    }

    fn persist_subjects(&mut self) -> Result<(), BoardError> {
        let subjects = self.board.subjects().to_vec();
        self.write_slot(Slot::Subjects, &subjects)
    }

    fn persist_axes(&mut self) -> Result<(), BoardError> {
        let axes = self.board.axes().to_vec();
        self.write_slot(Slot::Axes, &axes)
    }

    fn persist_program(&mut self) -> Result<(), BoardError> {
        let program = self.board.program().clone();
        self.write_slot(Slot::ProgramInfo, &program)
    }

    fn persist_semester_count(&mut self) -> Result<(), BoardError> {
        let total = self.board.total_semesters();
        self.write_slot(Slot::SemesterCount, &total)
    }

    fn persist_all(&mut self) -> Result<(), BoardError> {
        self.persist_subjects()?;
        self.persist_axes()?;
        self.persist_program()?;
        self.persist_semester_count()?;
        let theme = self.theme.clone();
        self.write_slot(Slot::Theme, &theme)?;
        let started = self.started;
        self.write_slot(Slot::StartedFlag, &started)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlots;

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
    fn fresh_store_seeds_default_dataset() {
        let session = Session::with_store(Box::new(MemorySlots::new())).expect("session");
        assert_eq!(session.board().total_semesters(), 3);
        assert!(session.board().subject_count() > 0);
        assert!(!session.started());
        assert_eq!(session.theme(), "dark");
    }

    #[test]
    fn mutations_persist_and_reload() {
        // First run: seed, then edit
        let mut session = Session::with_store(Box::new(MemorySlots::new())).expect("session");
        session
            .save_subject(subject("EXTRA", 2), None)
            .expect("save");
        session.set_theme("light").expect("theme");

        // "Restart" onto the same store
        let store = session.store.take().expect("store");
        let session = Session::with_store(store).expect("reload");
        assert!(session.board().contains_subject("EXTRA"));
        assert_eq!(session.theme(), "light");
    }

    #[test]
    fn rejected_mutation_changes_nothing() {
        let mut session = Session::seeded();
        let before = session.board().clone();

        let result = session.save_subject(subject("MAT1", 1), None);
        assert_eq!(
            result,
            Err(BoardError::DuplicateSubjectId("MAT1".to_string()))
        );
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn import_replaces_wholesale_and_marks_started() {
        let mut session = Session::seeded();
        let raw = r#"{
            "subjects": [{"id": "X", "nombre": "Única", "semestre": 1, "eje": ""}],
            "ejes": [],
            "totalSemesters": 4
        }"#
        .as_bytes();

        let audit = session.import_json(raw).expect("import");
        assert!(audit.is_clean());
        assert_eq!(session.board().subject_count(), 1);
        assert_eq!(session.board().total_semesters(), 4);
        assert!(session.started());
    }

    #[test]
    fn failed_import_leaves_board_untouched() {
        let mut session = Session::seeded();
        let before = session.board().clone();

        let result = session.import_json(br#"{"subjects": []}"#);
        assert!(matches!(result, Err(BoardError::MalformedSnapshot(_))));
        assert_eq!(session.board(), &before);
        assert!(!session.started());
    }

    #[test]
    fn import_audit_reports_dangling_requisites() {
        let mut session = Session::new();
        let raw = br#"{
            "subjects": [
                {"id": "A", "nombre": "A", "semestre": 1, "eje": "", "prerrequisitos": ["GHOST"]}
            ],
            "ejes": []
        }"#;

        let audit = session.import_json(raw).expect("import");
        assert_eq!(audit.dangling.len(), 1);
        assert_eq!(audit.dangling[0].missing_id, "GHOST");
    }

    #[test]
    fn reset_returns_to_seed() {
        let mut session = Session::with_store(Box::new(MemorySlots::new())).expect("session");
        session.save_subject(subject("EXTRA", 1), None).expect("save");
        session.set_started(true).expect("start");

        session.reset().expect("reset");
        assert!(!session.board().contains_subject("EXTRA"));
        assert!(!session.started());
        assert_eq!(session.board().total_semesters(), 3);
    }

    #[test]
    fn export_import_roundtrip_through_session() {
        let mut original = Session::seeded();
        let snapshot = original.export_snapshot("2024-06-01T00:00:00Z");
        let json = snapshot::snapshot_to_json(&snapshot).expect("serialize");

        let mut restored = Session::new();
        restored.import_json(json.as_bytes()).expect("import");

        assert_eq!(restored.board(), original.board());
        // Keep the original mutable path exercised: a no-op edit after export
        assert!(original.move_subject("MAT1", 1).expect("move"));
    }
}
