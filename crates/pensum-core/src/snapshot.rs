//! # Snapshot Interchange
//!
//! Full-board serialization to the JSON interchange format, and validated
//! import back. Import is all-or-nothing: parsing and validation complete
//! before any board state is touched, so a failed import leaves the store
//! exactly as it was.
//!
//! Top-level keys follow the format the board has always exported:
//! `subjects`, `ejes` (with `axes` accepted as an import alias),
//! `programInfo`, `totalSemesters`, `version`, `timestamp`. Only
//! `subjects` and `ejes` are required on import; absent optional fields
//! retain their prior values.

use crate::board::CurriculumBoard;
use crate::limits::{
    MAX_IMPORT_AXIS_COUNT, MAX_IMPORT_SUBJECT_COUNT, MAX_SNAPSHOT_PAYLOAD_SIZE,
    SNAPSHOT_FORMAT_VERSION,
};
use crate::types::{Axis, BoardError, ProgramInfo, Subject};
use serde::{Deserialize, Serialize};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A complete serialized copy of board state plus a generation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub subjects: Vec<Subject>,

    #[serde(rename = "ejes", alias = "axes")]
    pub axes: Vec<Axis>,

    #[serde(rename = "programInfo", default, skip_serializing_if = "Option::is_none")]
    pub program: Option<ProgramInfo>,

    #[serde(rename = "totalSemesters", default, skip_serializing_if = "Option::is_none")]
    pub total_semesters: Option<u32>,

    #[serde(default)]
    pub version: String,

    /// ISO-8601 generation time, stamped by the caller. The core takes no
    /// clock dependency.
    #[serde(default)]
    pub timestamp: String,
}

impl Snapshot {
    /// Capture the entire board, losslessly, with the given timestamp.
    #[must_use]
    pub fn from_board(board: &CurriculumBoard, timestamp: impl Into<String>) -> Self {
        Self {
            subjects: board.subjects().to_vec(),
            axes: board.axes().to_vec(),
            program: Some(board.program().clone()),
            total_semesters: Some(board.total_semesters()),
            version: SNAPSHOT_FORMAT_VERSION.to_string(),
            timestamp: timestamp.into(),
        }
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Serialize a snapshot to pretty-printed interchange JSON.
pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<String, BoardError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| BoardError::Serialization(e.to_string()))
}

/// Parse and validate an interchange payload.
///
/// Validation order matters: the payload size is checked BEFORE any
/// deserialization so oversized data is rejected without allocation, then
/// the parse itself enforces the required `subjects`/`ejes` fields, then
/// entity counts are capped.
pub fn snapshot_from_json(raw: &[u8]) -> Result<Snapshot, BoardError> {
    if raw.len() > MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(BoardError::MalformedSnapshot(format!(
            "payload size {} bytes exceeds maximum allowed {} bytes",
            raw.len(),
            MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }

    let snapshot: Snapshot =
        serde_json::from_slice(raw).map_err(|e| BoardError::MalformedSnapshot(e.to_string()))?;

    if snapshot.subjects.len() > MAX_IMPORT_SUBJECT_COUNT {
        return Err(BoardError::MalformedSnapshot(format!(
            "subject count {} exceeds maximum allowed {}",
            snapshot.subjects.len(),
            MAX_IMPORT_SUBJECT_COUNT
        )));
    }
    if snapshot.axes.len() > MAX_IMPORT_AXIS_COUNT {
        return Err(BoardError::MalformedSnapshot(format!(
            "axis count {} exceeds maximum allowed {}",
            snapshot.axes.len(),
            MAX_IMPORT_AXIS_COUNT
        )));
    }

    Ok(snapshot)
}

// =============================================================================
// ATOMIC APPLY
// =============================================================================

/// Replace the whole board with a validated snapshot.
///
/// Subjects and axes always replace; program info and semester count apply
/// only when present, retaining prior values otherwise. Imported data is
/// trusted as-is; [`crate::mutation::BoardEditor::audit_references`]
/// makes any dangling references observable afterwards.
pub fn apply_snapshot(board: &mut CurriculumBoard, snapshot: Snapshot) {
    board.replace_subjects(snapshot.subjects);
    board.replace_axes(snapshot.axes);
    if let Some(program) = snapshot.program {
        board.set_program(program);
    }
    if let Some(total) = snapshot.total_semesters {
        board.set_total_semesters(total);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AxisColor;

    fn sample_board() -> CurriculumBoard {
        let subject = Subject {
            id: "MAT1".to_string(),
            name: "Cálculo Diferencial".to_string(),
            semester: 1,
            axis_name: "Básico".to_string(),
            prerequisites: vec![],
            corequisites: vec![],
            details: None,
        };
        let axis = Axis {
            id: "ax-1".to_string(),
            name: "Básico".to_string(),
            label: "BAS".to_string(),
            color: AxisColor::Indigo,
        };
        CurriculumBoard::with_parts(
            vec![subject],
            vec![axis],
            ProgramInfo {
                program: "Nanociencia".to_string(),
                version: "1.0".to_string(),
                institution: "UMNG".to_string(),
                email: None,
            },
            5,
        )
    }

    #[test]
    fn roundtrip_is_lossless() {
        let board = sample_board();
        let snapshot = Snapshot::from_board(&board, "2024-06-01T12:00:00Z");

        let json = snapshot_to_json(&snapshot).expect("serialize");
        let parsed = snapshot_from_json(json.as_bytes()).expect("parse");

        let mut restored = CurriculumBoard::new();
        apply_snapshot(&mut restored, parsed);

        assert_eq!(restored, board);
    }

    #[test]
    fn export_uses_interchange_keys() {
        let snapshot = Snapshot::from_board(&sample_board(), "2024-06-01T12:00:00Z");
        let value = serde_json::to_value(&snapshot).expect("serialize");

        assert!(value.get("subjects").is_some());
        assert!(value.get("ejes").is_some());
        assert!(value.get("programInfo").is_some());
        assert!(value.get("totalSemesters").is_some());
        assert_eq!(
            value.get("version").and_then(|v| v.as_str()),
            Some(SNAPSHOT_FORMAT_VERSION)
        );
    }

    #[test]
    fn missing_subjects_rejected() {
        let raw = br#"{"ejes": []}"#;
        let result = snapshot_from_json(raw);
        assert!(matches!(result, Err(BoardError::MalformedSnapshot(_))));
    }

    #[test]
    fn missing_axes_rejected() {
        let raw = br#"{"subjects": []}"#;
        let result = snapshot_from_json(raw);
        assert!(matches!(result, Err(BoardError::MalformedSnapshot(_))));
    }

    #[test]
    fn axes_alias_accepted_on_import() {
        let raw = br#"{"subjects": [], "axes": []}"#;
        let snapshot = snapshot_from_json(raw).expect("parse");
        assert!(snapshot.axes.is_empty());
    }

    #[test]
    fn optional_fields_retain_prior_values() {
        let mut board = sample_board();
        let prior_program = board.program().clone();

        let raw = br#"{"subjects": [], "ejes": []}"#;
        let snapshot = snapshot_from_json(raw).expect("parse");
        apply_snapshot(&mut board, snapshot);

        assert_eq!(board.subject_count(), 0);
        assert_eq!(board.axis_count(), 0);
        // Not present in the payload: untouched
        assert_eq!(board.program(), &prior_program);
        assert_eq!(board.total_semesters(), 5);
    }

    #[test]
    fn garbage_payload_is_a_format_error() {
        let result = snapshot_from_json(b"not json at all");
        assert!(matches!(result, Err(BoardError::MalformedSnapshot(_))));
    }

    #[test]
    fn oversized_payload_rejected_before_parse() {
        let raw = vec![b' '; MAX_SNAPSHOT_PAYLOAD_SIZE + 1];
        let result = snapshot_from_json(&raw);
        assert!(matches!(result, Err(BoardError::MalformedSnapshot(_))));
    }

    #[test]
    fn semester_count_floors_at_one_on_apply() {
        let mut board = sample_board();
        let raw = br#"{"subjects": [], "ejes": [], "totalSemesters": 0}"#;
        let snapshot = snapshot_from_json(raw).expect("parse");
        apply_snapshot(&mut board, snapshot);
        assert_eq!(board.total_semesters(), 1);
    }
}
