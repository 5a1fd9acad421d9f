//! Integration tests for the Pensum HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum_test::TestServer;
use pensum::api::{
    AppState, HealthResponse, MutationResponse, SaveSubjectRequest, SemesterCountResponse,
    StatusResponse, UpdateAxisRequest, create_router,
};
use pensum_core::{Axis, AxisColor, Session, Snapshot, Subject};
use serde_json::json;
use std::sync::Mutex;

/// Mutex to serialize tests since the router reads env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
        unsafe { std::env::remove_var("PENSUM_API_KEY") };
    }
}

fn subject(id: &str, name: &str, semester: u32) -> Subject {
    Subject {
        id: id.to_string(),
        name: name.to_string(),
        semester,
        axis_name: String::new(),
        prerequisites: vec![],
        corequisites: vec![],
        details: None,
    }
}

/// Create a test server with an empty in-memory session.
/// Returns a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::remove_var("PENSUM_API_KEY") };
    let session = Session::new();
    let state = AppState::new(session);
    let router = create_router(state);
    (
        TestServer::new(router).unwrap(),
        TestGuard { _guard: guard },
    )
}

/// Create a test server seeded with the bundled dataset.
/// Returns a guard that must be kept alive during the test.
fn create_seeded_test_server() -> (TestServer, TestGuard) {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::remove_var("PENSUM_API_KEY") };
    let session = Session::seeded();
    let state = AppState::new(session);
    let router = create_router(state);
    (
        TestServer::new(router).unwrap(),
        TestGuard { _guard: guard },
    )
}

// =============================================================================
// HEALTH & STATUS
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn status_reports_seeded_counts() {
    let (server, _guard) = create_seeded_test_server();

    let response = server.get("/status").await;
    response.assert_status_ok();

    let status: StatusResponse = response.json();
    assert!(status.subject_count > 0);
    assert_eq!(status.total_semesters, 3);
    assert_eq!(status.dangling_references, 0);
}

// =============================================================================
// SUBJECT MUTATIONS
// =============================================================================

#[tokio::test]
async fn save_and_fetch_subject() {
    let (server, _guard) = create_test_server();

    let request = SaveSubjectRequest {
        subject: subject("MAT1", "Cálculo Diferencial", 1),
        original_id: None,
    };
    let response = server.post("/subjects").json(&request).await;
    response.assert_status_ok();

    let body: MutationResponse = response.json();
    assert!(body.success);

    let board = server.get("/board").await;
    board.assert_status_ok();
    let value: serde_json::Value = board.json();
    assert_eq!(value["subjects"][0]["id"], "MAT1");
    assert_eq!(value["subjects"][0]["nombre"], "Cálculo Diferencial");
}

#[tokio::test]
async fn duplicate_subject_id_is_conflict() {
    let (server, _guard) = create_test_server();

    let request = SaveSubjectRequest {
        subject: subject("MAT1", "Cálculo", 1),
        original_id: None,
    };
    server.post("/subjects").json(&request).await.assert_status_ok();

    let response = server.post("/subjects").json(&request).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    let body: MutationResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("MAT1"));
}

#[tokio::test]
async fn delete_guard_returns_blocking_names() {
    let (server, _guard) = create_test_server();

    let base = SaveSubjectRequest {
        subject: subject("A", "Base", 1),
        original_id: None,
    };
    server.post("/subjects").json(&base).await.assert_status_ok();

    let mut dependent = subject("B", "Dependiente", 2);
    dependent.prerequisites.push("A".to_string());
    let dependent = SaveSubjectRequest {
        subject: dependent,
        original_id: None,
    };
    server
        .post("/subjects")
        .json(&dependent)
        .await
        .assert_status_ok();

    let response = server.delete("/subjects/A").await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    let body: MutationResponse = response.json();
    assert_eq!(body.blocking, Some(vec!["Dependiente".to_string()]));
}

#[tokio::test]
async fn rename_cascades_through_api() {
    let (server, _guard) = create_test_server();

    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: subject("A", "Base", 1),
            original_id: None,
        })
        .await
        .assert_status_ok();

    let mut dependent = subject("B", "Dependiente", 2);
    dependent.prerequisites.push("A".to_string());
    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: dependent,
            original_id: None,
        })
        .await
        .assert_status_ok();

    // Rename A -> A2
    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: subject("A2", "Base", 1),
            original_id: Some("A".to_string()),
        })
        .await
        .assert_status_ok();

    let board: serde_json::Value = server.get("/board").await.json();
    let b = board["subjects"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "B")
        .unwrap();
    assert_eq!(b["prerrequisitos"][0], "A2");
}

#[tokio::test]
async fn move_subject_reassigns_semester() {
    let (server, _guard) = create_test_server();

    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: subject("A", "Base", 1),
            original_id: None,
        })
        .await
        .assert_status_ok();

    // Semester 3 exists only after growing the board, but moves are
    // unconditional by design
    let response = server
        .post("/subjects/A/move")
        .json(&json!({"semester": 3}))
        .await;
    response.assert_status_ok();

    let board: serde_json::Value = server.get("/board").await.json();
    assert_eq!(board["subjects"][0]["semestre"], 3);
}

// =============================================================================
// AXIS MUTATIONS
// =============================================================================

#[tokio::test]
async fn axis_create_update_delete_flow() {
    let (server, _guard) = create_test_server();

    let axis = Axis {
        id: "ax-1".to_string(),
        name: "Básico".to_string(),
        label: "BAS".to_string(),
        color: AxisColor::Indigo,
    };
    server.post("/axes").json(&axis).await.assert_status_ok();

    // Duplicate trimmed name is rejected
    let duplicate = Axis {
        id: "ax-2".to_string(),
        name: " Básico ".to_string(),
        label: "BA2".to_string(),
        color: AxisColor::Rose,
    };
    server
        .post("/axes")
        .json(&duplicate)
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);

    // Rename rebinds bound subjects
    let mut bound = subject("Q1", "Química", 1);
    bound.axis_name = "Básico".to_string();
    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: bound,
            original_id: None,
        })
        .await
        .assert_status_ok();

    let renamed = Axis {
        id: "ax-1".to_string(),
        name: "Ciencias Básicas".to_string(),
        label: "BAS".to_string(),
        color: AxisColor::Indigo,
    };
    server
        .put("/axes")
        .json(&UpdateAxisRequest {
            axis: renamed,
            old_name: Some("Básico".to_string()),
        })
        .await
        .assert_status_ok();

    let board: serde_json::Value = server.get("/board").await.json();
    assert_eq!(board["subjects"][0]["eje"], "Ciencias Básicas");

    // Deletion is guarded while assigned
    let response = server.delete("/axes/ax-1").await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    let body: MutationResponse = response.json();
    assert_eq!(body.blocking, Some(vec!["Química".to_string()]));
}

// =============================================================================
// SEMESTER MUTATIONS
// =============================================================================

#[tokio::test]
async fn semester_add_and_guarded_delete() {
    let (server, _guard) = create_test_server();

    // Grow to 3 semesters
    server.post("/semesters").await.assert_status_ok();
    let response = server.post("/semesters").await;
    let body: SemesterCountResponse = response.json();
    assert_eq!(body.total_semesters, 3);

    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: subject("A", "Física", 3),
            original_id: None,
        })
        .await
        .assert_status_ok();

    // Occupied semester cannot be removed
    server
        .delete("/semesters/3")
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);

    // Empty semester 2 compacts the board and shifts A down
    let response = server.delete("/semesters/2").await;
    response.assert_status_ok();
    let body: SemesterCountResponse = response.json();
    assert_eq!(body.total_semesters, 2);

    let board: serde_json::Value = server.get("/board").await.json();
    assert_eq!(board["subjects"][0]["semestre"], 2);
}

#[tokio::test]
async fn unknown_semester_is_not_found() {
    let (server, _guard) = create_test_server();
    server
        .delete("/semesters/42")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

// =============================================================================
// QUERY ENDPOINTS
// =============================================================================

#[tokio::test]
async fn semesters_search_keeps_pinned_columns() {
    let (server, _guard) = create_test_server();

    for _ in 0..4 {
        server.post("/semesters").await.assert_status_ok();
    }
    server
        .post("/subjects")
        .json(&SaveSubjectRequest {
            subject: subject("NAN2", "Caracterización", 4),
            original_id: None,
        })
        .await
        .assert_status_ok();

    let response = server
        .get("/semesters")
        .add_query_param("search", "caracter")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let numbers: Vec<u64> = body["semesters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["number"].as_u64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn highlights_classify_in_both_directions() {
    let (server, _guard) = create_test_server();

    let mut a = subject("A", "A", 1);
    a.prerequisites.push("B".to_string());
    for s in [a, subject("B", "B", 1)] {
        server
            .post("/subjects")
            .json(&SaveSubjectRequest {
                subject: s,
                original_id: None,
            })
            .await
            .assert_status_ok();
    }

    let focused_a: serde_json::Value = server.get("/highlights/A").await.json();
    let entries = focused_a["entries"].as_array().unwrap();
    assert_eq!(entries[0]["highlight"], "active");
    assert_eq!(entries[1]["highlight"], "prereq");

    let focused_b: serde_json::Value = server.get("/highlights/B").await.json();
    let entries = focused_b["entries"].as_array().unwrap();
    assert_eq!(entries[0]["highlight"], "dependent");
    assert_eq!(entries[1]["highlight"], "active");
}

// =============================================================================
// SNAPSHOT ENDPOINTS
// =============================================================================

#[tokio::test]
async fn export_import_roundtrip() {
    let (server, _guard) = create_seeded_test_server();

    let exported = server.get("/export").await;
    exported.assert_status_ok();
    let snapshot: Snapshot = exported.json();
    assert!(!snapshot.subjects.is_empty());
    assert!(!snapshot.timestamp.is_empty());

    // Import into a fresh empty server
    let (fresh, _guard2) = {
        drop(_guard);
        create_test_server()
    };
    let response = fresh
        .post("/import")
        .bytes(serde_json::to_vec(&snapshot).unwrap().into())
        .await;
    response.assert_status_ok();

    let status: StatusResponse = fresh.get("/status").await.json();
    assert_eq!(status.subject_count, snapshot.subjects.len());
    assert_eq!(status.total_semesters, 3);
    assert!(status.started);
}

#[tokio::test]
async fn malformed_import_is_rejected_with_400() {
    let (server, _guard) = create_seeded_test_server();

    let before: StatusResponse = server.get("/status").await.json();

    let response = server
        .post("/import")
        .bytes(br#"{"ejes": []}"#.to_vec().into())
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);

    // Board unchanged
    let after: StatusResponse = server.get("/status").await.json();
    assert_eq!(after.subject_count, before.subject_count);
}

#[tokio::test]
async fn import_reports_dangling_references() {
    let (server, _guard) = create_test_server();

    let payload = json!({
        "subjects": [
            {"id": "A", "nombre": "A", "semestre": 1, "eje": "", "prerrequisitos": ["GHOST"]}
        ],
        "ejes": []
    });
    let response = server
        .post("/import")
        .bytes(serde_json::to_vec(&payload).unwrap().into())
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["audit"]["dangling"][0]["missing_id"], "GHOST");
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[tokio::test]
async fn auth_rejects_missing_and_wrong_keys() {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("PENSUM_API_KEY", "secret-key") };
    let _guard = TestGuard { _guard: guard };

    let state = AppState::new(Session::new());
    let server = TestServer::new(create_router(state)).unwrap();

    // Health is always open
    server.get("/health").await.assert_status_ok();

    // No key
    server
        .get("/status")
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);

    // Wrong key
    server
        .get("/status")
        .authorization_bearer("wrong-key")
        .await
        .assert_status(axum::http::StatusCode::UNAUTHORIZED);

    // Correct key
    server
        .get("/status")
        .authorization_bearer("secret-key")
        .await
        .assert_status_ok();
}
