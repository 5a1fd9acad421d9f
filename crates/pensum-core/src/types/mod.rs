//! # Core Type Definitions
//!
//! This module contains all core types for the Pensum curriculum board:
//! - Curriculum entities (`Subject`, `Axis`, `ProgramInfo`)
//! - Extended subject content (`SubjectDetails`, `SyllabusUnit`)
//! - The display palette (`AxisColor`)
//! - Error types (`BoardError`)
//!
//! ## Wire Format
//!
//! Field names on the wire follow the interchange format the board has always
//! used (Spanish keys: `nombre`, `semestre`, `eje`, `prerrequisitos`,
//! `correquisitos`). Rust field names are English; serde renames bridge the
//! two so exported files stay loadable by older tooling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// AXIS COLOR PALETTE
// =============================================================================

/// Display color for an axis, drawn from a fixed palette.
///
/// The core treats this as an opaque attribute; only the rendering
/// collaborator gives it meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisColor {
    #[default]
    Slate,
    Gray,
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Emerald,
    Teal,
    Cyan,
    Sky,
    Blue,
    Indigo,
    Violet,
    Purple,
    Fuchsia,
    Pink,
    Rose,
}

impl AxisColor {
    /// Lowercase palette name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slate => "slate",
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Amber => "amber",
            Self::Yellow => "yellow",
            Self::Lime => "lime",
            Self::Green => "green",
            Self::Emerald => "emerald",
            Self::Teal => "teal",
            Self::Cyan => "cyan",
            Self::Sky => "sky",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Violet => "violet",
            Self::Purple => "purple",
            Self::Fuchsia => "fuchsia",
            Self::Pink => "pink",
            Self::Rose => "rose",
        }
    }
}

// =============================================================================
// SYLLABUS
// =============================================================================

/// One unit of a subject's syllabus. Free-form content with no
/// cross-entity references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyllabusUnit {
    #[serde(rename = "unidad")]
    pub unit: String,
    #[serde(rename = "temas")]
    pub topics: String,
    #[serde(rename = "objetivos")]
    pub objectives: String,
    #[serde(rename = "fuentes")]
    pub sources: String,
}

/// Extended content attached to a subject: a justification text plus an
/// ordered sequence of syllabus units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubjectDetails {
    // Options serialize as explicit nulls: these records also travel through
    // postcard slot payloads, which cannot tolerate skipped fields.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "justificacion", default)]
    pub justification: String,
    #[serde(default)]
    pub syllabus: Vec<SyllabusUnit>,
}

// =============================================================================
// SUBJECT
// =============================================================================

/// A curriculum unit assigned to one semester column.
///
/// `id` is the primary key and the value other subjects use in their
/// requisite lists. `axis_name` is a denormalized reference to
/// [`Axis::name`]; the integrity engine trims it on write and the query
/// layer resolves it with trimmed comparison so whitespace drift in old
/// files cannot break the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "semestre")]
    pub semester: u32,
    #[serde(rename = "eje", default)]
    pub axis_name: String,
    #[serde(rename = "prerrequisitos", default)]
    pub prerequisites: Vec<String>,
    #[serde(rename = "correquisitos", default)]
    pub corequisites: Vec<String>,
    #[serde(default)]
    pub details: Option<SubjectDetails>,
}

impl Subject {
    /// True when `id` appears in this subject's prerequisites or
    /// corequisites.
    #[must_use]
    pub fn references(&self, id: &str) -> bool {
        self.prerequisites.iter().any(|p| p == id) || self.corequisites.iter().any(|c| c == id)
    }

    /// Trim identifier, name, axis reference, and requisite entries.
    ///
    /// Called at the mutation boundary so runtime joins never depend on
    /// whitespace. Empty requisite entries are dropped.
    pub fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        self.axis_name = self.axis_name.trim().to_string();
        for list in [&mut self.prerequisites, &mut self.corequisites] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_string();
            }
            list.retain(|entry| !entry.is_empty());
        }
    }
}

// =============================================================================
// AXIS (EJE)
// =============================================================================

/// A thematic axis ("eje") used to categorize and color subjects.
///
/// `name` is the human-meaningful identity subjects bind to; `id` is the
/// stable internal key used for edits and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub color: AxisColor,
}

impl Axis {
    /// Trim identifier, name, and label at the mutation boundary.
    pub fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        self.label = self.label.trim().to_string();
    }
}

// =============================================================================
// PROGRAM INFO
// =============================================================================

/// Scalar program metadata. A flat record with no invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    #[serde(rename = "name")]
    pub program: String,
    #[serde(rename = "pVersion")]
    pub version: String,
    #[serde(rename = "university")]
    pub institution: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for ProgramInfo {
    fn default() -> Self {
        Self {
            program: String::new(),
            version: "1.0".to_string(),
            institution: String::new(),
            email: None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by board mutations and snapshot handling.
///
/// - No silent failures: every rejected command reports why
/// - Guard variants always carry the blocking subjects' names so the
///   caller can display them
/// - The board is guaranteed unchanged whenever an error is returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A subject with this id already exists in the board.
    #[error("a subject with id \"{0}\" already exists")]
    DuplicateSubjectId(String),

    /// An axis with this id already exists in the board.
    #[error("an axis with id \"{0}\" already exists")]
    DuplicateAxisId(String),

    /// An axis with this name (trimmed comparison) already exists.
    #[error("an axis named \"{0}\" already exists")]
    DuplicateAxisName(String),

    /// A subject id must be non-empty after trimming.
    #[error("subject id must not be empty")]
    EmptySubjectId,

    /// Semester indices start at 1.
    #[error("semester must be a positive number")]
    InvalidSemester,

    /// The subject is listed as a requisite of other subjects.
    #[error("subject \"{}\" is a requisite of: {}", .name, .blocking.join(", "))]
    SubjectInUse { name: String, blocking: Vec<String> },

    /// The axis is still assigned to subjects.
    #[error("axis \"{}\" is assigned to: {}", .name, .blocking.join(", "))]
    AxisInUse { name: String, blocking: Vec<String> },

    /// The semester still contains subjects.
    #[error("semester {} still contains: {}", .semester, .blocking.join(", "))]
    SemesterOccupied { semester: u32, blocking: Vec<String> },

    /// No axis with the given id exists.
    #[error("axis not found: {0}")]
    AxisNotFound(String),

    /// The semester index is outside `1..=total_semesters`.
    #[error("semester not found: {0}")]
    SemesterNotFound(u32),

    /// An imported snapshot failed format validation.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl BoardError {
    /// The names of the entities blocking a rejected delete, when the
    /// error is an integrity guard.
    #[must_use]
    pub fn blocking_names(&self) -> Option<&[String]> {
        match self {
            Self::SubjectInUse { blocking, .. }
            | Self::AxisInUse { blocking, .. }
            | Self::SemesterOccupied { blocking, .. } => Some(blocking),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str) -> Subject {
        Subject {
            id: id.to_string(),
            name: "Test".to_string(),
            semester: 1,
            axis_name: String::new(),
            prerequisites: vec![],
            corequisites: vec![],
            details: None,
        }
    }

    #[test]
    fn subject_references_checks_both_lists() {
        let mut s = subject("A");
        s.prerequisites.push("B".to_string());
        s.corequisites.push("C".to_string());

        assert!(s.references("B"));
        assert!(s.references("C"));
        assert!(!s.references("D"));
    }

    #[test]
    fn normalize_trims_and_drops_empty_requisites() {
        let mut s = subject("  MAT1  ");
        s.axis_name = " Básico ".to_string();
        s.prerequisites = vec!["  FIS1 ".to_string(), "   ".to_string()];

        s.normalize();

        assert_eq!(s.id, "MAT1");
        assert_eq!(s.axis_name, "Básico");
        assert_eq!(s.prerequisites, vec!["FIS1".to_string()]);
    }

    #[test]
    fn axis_color_serializes_lowercase() {
        let json = serde_json::to_string(&AxisColor::Emerald).expect("serialize");
        assert_eq!(json, "\"emerald\"");
    }

    #[test]
    fn subject_wire_names_are_spanish() {
        let s = subject("MAT1");
        let json = serde_json::to_value(&s).expect("serialize");
        assert!(json.get("nombre").is_some());
        assert!(json.get("semestre").is_some());
        assert!(json.get("prerrequisitos").is_some());
    }

    #[test]
    fn blocking_names_only_on_guard_errors() {
        let guard = BoardError::SubjectInUse {
            name: "A".to_string(),
            blocking: vec!["B".to_string()],
        };
        assert_eq!(guard.blocking_names().map(<[String]>::len), Some(1));
        assert!(BoardError::EmptySubjectId.blocking_names().is_none());
    }

    #[test]
    fn guard_error_message_lists_blockers() {
        let guard = BoardError::SemesterOccupied {
            semester: 4,
            blocking: vec!["Física".to_string(), "Cálculo".to_string()],
        };
        assert_eq!(guard.to_string(), "semester 4 still contains: Física, Cálculo");
    }
}
