//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use pensum_core::{
    Axis, BoardError, ProgramInfo, ReferenceAudit, SemesterGroup, Subject,
    limits::{MAX_NAME_LENGTH, MAX_REQUISITES_PER_SUBJECT},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Board status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub subject_count: usize,
    pub axis_count: usize,
    pub total_semesters: u32,
    pub dangling_references: usize,
    pub started: bool,
}

// =============================================================================
// BOARD RESPONSE
// =============================================================================

/// Full board state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    pub subjects: Vec<Subject>,
    pub axes: Vec<Axis>,
    pub program: ProgramInfo,
    pub total_semesters: u32,
    pub theme: String,
}

// =============================================================================
// SEMESTER QUERY
// =============================================================================

/// Query string for the semester grouping endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemesterQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub show_empty: bool,
}

/// Grouped semester columns.
#[derive(Debug, Clone, Serialize)]
pub struct SemestersResponse {
    pub semesters: Vec<SemesterGroup>,
}

// =============================================================================
// HIGHLIGHT RESPONSE
// =============================================================================

/// One subject's relation to the focused subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightEntry {
    pub subject_id: String,
    pub highlight: pensum_core::Highlight,
}

/// Relation classification for every subject on the board.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightsResponse {
    pub active_id: String,
    pub entries: Vec<HighlightEntry>,
}

// =============================================================================
// SUBJECT REQUESTS
// =============================================================================

/// Subject save request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSubjectRequest {
    pub subject: Subject,
    #[serde(default)]
    pub original_id: Option<String>,
}

impl SaveSubjectRequest {
    /// Boundary validation before the engine sees the record.
    ///
    /// Caps name/id lengths and the requisite list size so oversized
    /// payloads are rejected at the API edge, not deep inside the core.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.subject.id.len() > MAX_NAME_LENGTH || self.subject.name.len() > MAX_NAME_LENGTH {
            return Err(BoardError::Serialization(format!(
                "id/name length exceeds maximum {} bytes",
                MAX_NAME_LENGTH
            )));
        }
        if self.subject.prerequisites.len() > MAX_REQUISITES_PER_SUBJECT
            || self.subject.corequisites.len() > MAX_REQUISITES_PER_SUBJECT
        {
            return Err(BoardError::Serialization(format!(
                "requisite count exceeds maximum {}",
                MAX_REQUISITES_PER_SUBJECT
            )));
        }
        Ok(())
    }
}

/// Subject move request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSubjectRequest {
    pub semester: u32,
}

// =============================================================================
// AXIS REQUESTS
// =============================================================================

/// Axis update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAxisRequest {
    pub axis: Axis,
    #[serde(default)]
    pub old_name: Option<String>,
}

// =============================================================================
// MUTATION RESPONSE
// =============================================================================

/// Uniform response for mutating endpoints.
///
/// Integrity-guard rejections carry the blocking entity names so the
/// caller can display them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<Vec<String>>,
}

impl MutationResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            blocking: None,
        }
    }

    pub fn rejected(error: &BoardError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            blocking: error.blocking_names().map(<[String]>::to_vec),
        }
    }
}

// =============================================================================
// SEMESTER RESPONSE
// =============================================================================

/// Response for semester add/remove.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterCountResponse {
    pub success: bool,
    pub total_semesters: u32,
}

// =============================================================================
// IMPORT RESPONSE
// =============================================================================

/// Import result, including the post-import reference audit.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<ReferenceAudit>,
}

impl ImportResponse {
    pub fn applied(audit: ReferenceAudit) -> Self {
        Self {
            success: true,
            error: None,
            audit: Some(audit),
        }
    }

    pub fn rejected(error: &BoardError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            audit: None,
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
    fn oversized_name_rejected_at_boundary() {
        let mut request = SaveSubjectRequest {
            subject: subject("A"),
            original_id: None,
        };
        request.subject.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn oversized_requisite_list_rejected() {
        let mut request = SaveSubjectRequest {
            subject: subject("A"),
            original_id: None,
        };
        request.subject.prerequisites =
            (0..=MAX_REQUISITES_PER_SUBJECT).map(|i| format!("S{i}")).collect();
        assert!(request.validate().is_err());
    }

    #[test]
    fn normal_request_passes() {
        let request = SaveSubjectRequest {
            subject: subject("A"),
            original_id: Some("B".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejected_response_carries_blocking_names() {
        let error = BoardError::SubjectInUse {
            name: "A".to_string(),
            blocking: vec!["B".to_string(), "C".to_string()],
        };
        let response = MutationResponse::rejected(&error);
        assert!(!response.success);
        assert_eq!(
            response.blocking,
            Some(vec!["B".to_string(), "C".to_string()])
        );
    }
}
