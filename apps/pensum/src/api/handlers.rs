//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Error mapping is uniform: validation failures are 400, unknown entities
//! 404, integrity-guard rejections 409 (with the blocking names in the
//! body), and storage faults 500. A rejected mutation never partially
//! applies; the session guarantees the board is unchanged.

use super::{
    AppState,
    types::{
        BoardResponse, HealthResponse, HighlightEntry, HighlightsResponse, ImportResponse,
        MoveSubjectRequest, MutationResponse, SaveSubjectRequest, SemesterCountResponse,
        SemesterQuery, SemestersResponse, StatusResponse, UpdateAxisRequest,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use pensum_core::{Axis, BoardError, ProgramInfo};

/// HTTP status for a rejected board command.
fn error_status(error: &BoardError) -> StatusCode {
    match error {
        BoardError::DuplicateSubjectId(_)
        | BoardError::DuplicateAxisId(_)
        | BoardError::DuplicateAxisName(_)
        | BoardError::SubjectInUse { .. }
        | BoardError::AxisInUse { .. }
        | BoardError::SemesterOccupied { .. } => StatusCode::CONFLICT,
        BoardError::AxisNotFound(_) | BoardError::SemesterNotFound(_) => StatusCode::NOT_FOUND,
        BoardError::EmptySubjectId
        | BoardError::InvalidSemester
        | BoardError::MalformedSnapshot(_)
        | BoardError::Serialization(_) => StatusCode::BAD_REQUEST,
        BoardError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a mutation result to the uniform response shape.
fn mutation_result(result: Result<(), BoardError>) -> (StatusCode, Json<MutationResponse>) {
    match result {
        Ok(()) => (StatusCode::OK, Json(MutationResponse::ok())),
        Err(e) => (error_status(&e), Json(MutationResponse::rejected(&e))),
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// Get board status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let audit = session.audit();

    let response = StatusResponse {
        subject_count: session.board().subject_count(),
        axis_count: session.board().axis_count(),
        total_semesters: session.board().total_semesters(),
        dangling_references: audit.dangling.len(),
        started: session.started(),
    };

    (StatusCode::OK, Json(response))
}

/// Get the full board state.
pub async fn board_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let board = session.board();

    let response = BoardResponse {
        subjects: board.subjects().to_vec(),
        axes: board.axes().to_vec(),
        program: board.program().clone(),
        total_semesters: board.total_semesters(),
        theme: session.theme().to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Get the grouped semester columns, filtered by search.
pub async fn semesters_handler(
    State(state): State<AppState>,
    Query(query): Query<SemesterQuery>,
) -> impl IntoResponse {
    let session = state.session.read().await;
    let semesters = session.semesters(&query.search, query.show_empty);

    (StatusCode::OK, Json(SemestersResponse { semesters }))
}

/// Classify every subject relative to the focused one.
pub async fn highlights_handler(
    State(state): State<AppState>,
    Path(active_id): Path<String>,
) -> impl IntoResponse {
    let session = state.session.read().await;

    let entries = session
        .board()
        .subjects()
        .iter()
        .map(|subject| HighlightEntry {
            subject_id: subject.id.clone(),
            highlight: session.classify(&active_id, &subject.id),
        })
        .collect();

    (
        StatusCode::OK,
        Json(HighlightsResponse { active_id, entries }),
    )
}

/// List axes.
pub async fn axes_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(session.board().axes().to_vec()))
}

/// Report dangling references.
pub async fn audit_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(session.audit()))
}

// =============================================================================
// SUBJECT HANDLERS
// =============================================================================

/// Save a subject (create, or replace when `original_id` is given).
pub async fn save_subject_handler(
    State(state): State<AppState>,
    Json(request): Json<SaveSubjectRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MutationResponse::rejected(&e)),
        );
    }

    let mut session = state.session.write().await;
    mutation_result(session.save_subject(request.subject, request.original_id.as_deref()))
}

/// Delete a subject. Unknown ids are a no-op cancel, reported as success.
pub async fn delete_subject_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    mutation_result(session.delete_subject(&id).map(|_| ()))
}

/// Move a subject to another semester.
pub async fn move_subject_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveSubjectRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    mutation_result(session.move_subject(&id, request.semester).map(|_| ()))
}

// =============================================================================
// AXIS HANDLERS
// =============================================================================

/// Create an axis.
pub async fn create_axis_handler(
    State(state): State<AppState>,
    Json(axis): Json<Axis>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    mutation_result(session.create_axis(axis))
}

/// Update an axis, rebinding subjects across a rename.
pub async fn update_axis_handler(
    State(state): State<AppState>,
    Json(request): Json<UpdateAxisRequest>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    mutation_result(session.update_axis(request.axis, request.old_name.as_deref()))
}

/// Delete an axis.
pub async fn delete_axis_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    mutation_result(session.delete_axis(&id).map(|_| ()))
}

// =============================================================================
// SEMESTER HANDLERS
// =============================================================================

/// Append a semester column.
pub async fn add_semester_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.add_semester() {
        Ok(total) => (
            StatusCode::OK,
            Json(SemesterCountResponse {
                success: true,
                total_semesters: total,
            }),
        )
            .into_response(),
        Err(e) => (error_status(&e), Json(MutationResponse::rejected(&e))).into_response(),
    }
}

/// Remove an empty semester column.
pub async fn delete_semester_handler(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.delete_semester(number) {
        Ok(total) => (
            StatusCode::OK,
            Json(SemesterCountResponse {
                success: true,
                total_semesters: total,
            }),
        )
            .into_response(),
        Err(e) => (error_status(&e), Json(MutationResponse::rejected(&e))).into_response(),
    }
}

// =============================================================================
// PROGRAM HANDLER
// =============================================================================

/// Replace the program metadata.
pub async fn program_handler(
    State(state): State<AppState>,
    Json(program): Json<ProgramInfo>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    mutation_result(session.set_program(program))
}

// =============================================================================
// SNAPSHOT HANDLERS
// =============================================================================

/// Export the whole board as an interchange snapshot.
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let snapshot = session.export_snapshot(timestamp);

    (StatusCode::OK, Json(snapshot))
}

/// Import an interchange snapshot, replacing the whole board atomically.
pub async fn import_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.import_json(&body) {
        Ok(audit) => (StatusCode::OK, Json(ImportResponse::applied(audit))),
        Err(e) => (error_status(&e), Json(ImportResponse::rejected(&e))),
    }
}
