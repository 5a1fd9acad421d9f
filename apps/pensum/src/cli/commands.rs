//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::AppConfig;
use crate::remote::RemoteStore;
use chrono::{SecondsFormat, Utc};
use pensum_core::{
    Axis, BoardError, ProgramInfo, RedbSlots, Session, Subject,
    limits::MAX_SNAPSHOT_PAYLOAD_SIZE, query::resolve_axis, snapshot_to_json,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE HYGIENE
// =============================================================================

/// Maximum size for subject/axis JSON files read by the CLI.
const MAX_RECORD_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), BoardError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| BoardError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(BoardError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and requires it to
/// be a regular file, closing the path-traversal hole a raw open would
/// leave.
fn validate_file_path(path: &Path) -> Result<PathBuf, BoardError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| BoardError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(BoardError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output file path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, BoardError> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        BoardError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(BoardError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| BoardError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Read and parse a small JSON record file.
fn read_record<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, BoardError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_RECORD_FILE_SIZE)?;
    let raw = std::fs::read(&validated).map_err(|e| BoardError::Io(format!("Read file: {}", e)))?;
    serde_json::from_slice(&raw).map_err(|e| BoardError::Serialization(e.to_string()))
}

// =============================================================================
// SESSION HELPERS
// =============================================================================

/// Open (or create) the board session at the database path.
pub fn open_session(db_path: &Path) -> Result<Session, BoardError> {
    let store = RedbSlots::open(db_path)?;
    Session::with_store(Box::new(store))
}

/// ISO-8601 generation timestamp for exports.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Print the audit findings of an import, if any.
fn report_audit(audit: &pensum_core::ReferenceAudit) {
    for dangling in &audit.dangling {
        tracing::warn!(
            "subject {} has a dangling {:?} reference: {}",
            dangling.subject_id,
            dangling.kind,
            dangling.missing_id
        );
    }
    for unresolved in &audit.unresolved_axes {
        tracing::warn!(
            "subject {} is bound to unknown axis \"{}\"",
            unresolved.subject_id,
            unresolved.axis_name
        );
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &Path,
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), BoardError> {
    let session = open_session(db_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("Pensum Curriculum Board Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  GET  /health          - Health check");
    println!("  GET  /status          - Board status");
    println!("  GET  /board           - Full board state");
    println!("  GET  /semesters       - Grouped semester columns");
    println!("  POST /subjects        - Save a subject");
    println!("  GET  /export          - Export snapshot");
    println!("  POST /import          - Import snapshot");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, session).await
}

// =============================================================================
// STATUS & BOARD COMMANDS
// =============================================================================

/// Show board status.
pub fn cmd_status(db_path: &Path, json_mode: bool) -> Result<(), BoardError> {
    let session = open_session(db_path)?;
    let board = session.board();
    let audit = session.audit();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "program": board.program().program,
            "version": board.program().version,
            "institution": board.program().institution,
            "subject_count": board.subject_count(),
            "axis_count": board.axis_count(),
            "total_semesters": board.total_semesters(),
            "dangling_references": audit.dangling.len(),
            "unresolved_axes": audit.unresolved_axes.len(),
            "started": session.started()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Pensum Board Status");
    println!("===================");
    println!("Database: {:?}", db_path);
    println!();
    println!("Program:     {}", board.program().program);
    println!("Version:     {}", board.program().version);
    println!("Institution: {}", board.program().institution);
    println!();
    println!("Subjects:  {}", board.subject_count());
    println!("Axes:      {}", board.axis_count());
    println!("Semesters: {}", board.total_semesters());
    if !audit.is_clean() {
        println!();
        println!(
            "Warning: {} dangling requisite(s), {} unresolved axis reference(s). Run `pensum audit`.",
            audit.dangling.len(),
            audit.unresolved_axes.len()
        );
    }

    Ok(())
}

/// Show the semester columns.
pub fn cmd_board(
    db_path: &Path,
    json_mode: bool,
    search: &str,
    show_empty: bool,
) -> Result<(), BoardError> {
    let session = open_session(db_path)?;
    let groups = session.semesters(search, show_empty);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&groups).unwrap_or_default()
        );
        return Ok(());
    }

    for group in &groups {
        println!("SEM_{:02}", group.number);
        if group.subjects.is_empty() {
            println!("  (vacío)");
        }
        for subject in &group.subjects {
            let axis = resolve_axis(session.board(), &subject.axis_name);
            println!("  [{}] {} ({})", subject.id, subject.name, axis.label);
        }
        println!();
    }

    Ok(())
}

// =============================================================================
// SUBJECT COMMANDS
// =============================================================================

/// Print a staged draft subject for the given semester.
pub fn cmd_subject_new(db_path: &Path, semester: u32) -> Result<(), BoardError> {
    let session = open_session(db_path)?;
    let draft = session.draft_subject(semester);

    println!(
        "{}",
        serde_json::to_string_pretty(&draft)
            .map_err(|e| BoardError::Serialization(e.to_string()))?
    );
    Ok(())
}

/// Save a subject from a JSON file.
pub fn cmd_subject_save(
    db_path: &Path,
    file: &Path,
    original_id: Option<&str>,
) -> Result<(), BoardError> {
    let subject: Subject = read_record(file)?;
    let id = subject.id.trim().to_string();

    let mut session = open_session(db_path)?;
    session.save_subject(subject, original_id)?;

    println!("Saved subject {}", id);
    Ok(())
}

/// Delete a subject by id.
pub fn cmd_subject_rm(db_path: &Path, id: &str) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;
    if session.delete_subject(id)? {
        println!("Deleted subject {}", id);
    } else {
        println!("Subject {} not found (nothing to do)", id);
    }
    Ok(())
}

/// Move a subject to another semester.
pub fn cmd_subject_move(db_path: &Path, id: &str, semester: u32) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;
    if session.move_subject(id, semester)? {
        println!("Moved subject {} to semester {}", id, semester);
    } else {
        println!("Subject {} not found (nothing to do)", id);
    }
    Ok(())
}

// =============================================================================
// AXIS COMMANDS
// =============================================================================

/// List axes.
pub fn cmd_axis_list(db_path: &Path, json_mode: bool) -> Result<(), BoardError> {
    let session = open_session(db_path)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(session.board().axes()).unwrap_or_default()
        );
        return Ok(());
    }

    for axis in session.board().axes() {
        let assigned = session
            .board()
            .subjects()
            .iter()
            .filter(|s| s.axis_name.trim() == axis.name.trim())
            .count();
        println!(
            "{:10} [{}] {} ({}, {} subject(s))",
            axis.id,
            axis.label,
            axis.name,
            axis.color.as_str(),
            assigned
        );
    }
    Ok(())
}

/// Create an axis from a JSON file.
pub fn cmd_axis_add(db_path: &Path, file: &Path) -> Result<(), BoardError> {
    let axis: Axis = read_record(file)?;
    let name = axis.name.trim().to_string();

    let mut session = open_session(db_path)?;
    session.create_axis(axis)?;

    println!("Created axis \"{}\"", name);
    Ok(())
}

/// Update an axis from a JSON file.
pub fn cmd_axis_update(
    db_path: &Path,
    file: &Path,
    old_name: Option<&str>,
) -> Result<(), BoardError> {
    let axis: Axis = read_record(file)?;
    let name = axis.name.trim().to_string();

    let mut session = open_session(db_path)?;
    session.update_axis(axis, old_name)?;

    println!("Updated axis \"{}\"", name);
    Ok(())
}

/// Delete an axis by id.
pub fn cmd_axis_rm(db_path: &Path, id: &str) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;
    if session.delete_axis(id)? {
        println!("Deleted axis {}", id);
    } else {
        println!("Axis {} not found (nothing to do)", id);
    }
    Ok(())
}

// =============================================================================
// SEMESTER COMMANDS
// =============================================================================

/// Append a semester column.
pub fn cmd_semester_add(db_path: &Path) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;
    let total = session.add_semester()?;
    println!("Added semester; the board now has {}", total);
    Ok(())
}

/// Remove an empty semester column.
pub fn cmd_semester_rm(db_path: &Path, number: u32) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;
    let total = session.delete_semester(number)?;
    println!("Removed semester {}; the board now has {}", number, total);
    Ok(())
}

// =============================================================================
// PROGRAM COMMAND
// =============================================================================

/// Show or edit program metadata.
pub fn cmd_program(
    db_path: &Path,
    json_mode: bool,
    name: Option<String>,
    version: Option<String>,
    institution: Option<String>,
    email: Option<String>,
) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;

    let editing = name.is_some() || version.is_some() || institution.is_some() || email.is_some();
    if editing {
        let current = session.board().program().clone();
        let updated = ProgramInfo {
            program: name.unwrap_or(current.program),
            version: version.unwrap_or(current.version),
            institution: institution.unwrap_or(current.institution),
            email: email.or(current.email),
        };
        session.set_program(updated)?;
    }

    let program = session.board().program();
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(program).unwrap_or_default()
        );
    } else {
        println!("Program:     {}", program.program);
        println!("Version:     {}", program.version);
        println!("Institution: {}", program.institution);
        println!(
            "Email:       {}",
            program.email.as_deref().unwrap_or("(none)")
        );
    }
    Ok(())
}

// =============================================================================
// ONBOARDING & THEME COMMANDS
// =============================================================================

/// Complete onboarding: set program metadata and mark the board started.
pub fn cmd_start(
    db_path: &Path,
    institution: String,
    name: String,
    email: Option<String>,
) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;

    let current = session.board().program().clone();
    session.set_program(ProgramInfo {
        program: name,
        version: current.version,
        institution,
        email: email.or(current.email),
    })?;
    session.set_started(true)?;

    println!(
        "Welcome! Board started for {} at {}",
        session.board().program().program,
        session.board().program().institution
    );
    Ok(())
}

/// Show or set the display theme.
pub fn cmd_theme(db_path: &Path, value: Option<String>) -> Result<(), BoardError> {
    let mut session = open_session(db_path)?;

    if let Some(value) = value {
        session.set_theme(&value)?;
    }
    println!("{}", session.theme());
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Export the board to a snapshot file.
pub fn cmd_export(db_path: &Path, output: Option<PathBuf>) -> Result<(), BoardError> {
    let session = open_session(db_path)?;
    let snapshot = session.export_snapshot(timestamp_now());
    let json = snapshot_to_json(&snapshot)?;

    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!("pensum_data_{}.json", Utc::now().format("%Y-%m-%d")))
    });
    let validated = validate_output_path(&output)?;

    std::fs::write(&validated, json.as_bytes())
        .map_err(|e| BoardError::Io(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", json.len(), validated);
    Ok(())
}

/// Import a snapshot file, replacing the whole board.
pub fn cmd_import(db_path: &Path, input: &Path) -> Result<(), BoardError> {
    let validated = validate_file_path(input)?;
    validate_file_size(&validated, MAX_SNAPSHOT_PAYLOAD_SIZE as u64)?;

    let raw = std::fs::read(&validated).map_err(|e| BoardError::Io(format!("Read file: {}", e)))?;

    let mut session = open_session(db_path)?;
    let audit = session.import_json(&raw)?;
    report_audit(&audit);

    println!(
        "Imported board: {} subjects, {} axes, {} semesters",
        session.board().subject_count(),
        session.board().axis_count(),
        session.board().total_semesters()
    );
    Ok(())
}

// =============================================================================
// AUDIT COMMAND
// =============================================================================

/// Report dangling requisites and unresolved axes.
pub fn cmd_audit(db_path: &Path, json_mode: bool) -> Result<(), BoardError> {
    let session = open_session(db_path)?;
    let audit = session.audit();

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&audit).unwrap_or_default()
        );
        return Ok(());
    }

    if audit.is_clean() {
        println!("All references resolve. Nothing to report.");
        return Ok(());
    }

    for dangling in &audit.dangling {
        println!(
            "subject {}: {:?} reference to missing subject {}",
            dangling.subject_id, dangling.kind, dangling.missing_id
        );
    }
    for unresolved in &audit.unresolved_axes {
        println!(
            "subject {}: bound to unknown axis \"{}\"",
            unresolved.subject_id, unresolved.axis_name
        );
    }
    Ok(())
}

// =============================================================================
// SYNC COMMANDS
// =============================================================================

/// Upload the current board keyed by email.
pub async fn cmd_sync_push(
    db_path: &Path,
    config: &AppConfig,
    email: &str,
    token: Option<String>,
) -> Result<(), BoardError> {
    let token = token
        .or_else(|| std::env::var("PENSUM_SYNC_TOKEN").ok())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            BoardError::Io("No token given: pass --token or set PENSUM_SYNC_TOKEN".to_string())
        })?;

    let session = open_session(db_path)?;
    let snapshot = session.export_snapshot(timestamp_now());
    let json = snapshot_to_json(&snapshot)?;

    let store = RemoteStore::new(config.remote.clone());
    store
        .push_snapshot(email, &json, &token)
        .await
        .map_err(|e| BoardError::Io(e.to_string()))?;

    println!("Pushed snapshot for {}", email);
    Ok(())
}

/// Download and import the snapshot stored for an email.
pub async fn cmd_sync_pull(db_path: &Path, config: &AppConfig, email: &str) -> Result<(), BoardError> {
    let store = RemoteStore::new(config.remote.clone());
    let raw = store
        .pull_snapshot(email)
        .await
        .map_err(|e| BoardError::Io(e.to_string()))?;

    let mut session = open_session(db_path)?;
    let audit = session.import_json(&raw)?;
    report_audit(&audit);

    println!(
        "Pulled snapshot for {}: {} subjects, {} semesters",
        email,
        session.board().subject_count(),
        session.board().total_semesters()
    );
    Ok(())
}

// =============================================================================
// INIT / RESET COMMANDS
// =============================================================================

/// Initialize a new board database.
pub fn cmd_init(db_path: &Path, force: bool) -> Result<(), BoardError> {
    if db_path.exists() && !force {
        return Err(BoardError::Io(
            "Database already exists. Use --force to overwrite.".to_string(),
        ));
    }
    if db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| BoardError::Io(e.to_string()))?;
    }

    let session = open_session(db_path)?;
    println!(
        "Initialized board at {:?}: {} subjects over {} semesters",
        db_path,
        session.board().subject_count(),
        session.board().total_semesters()
    );
    Ok(())
}

/// Wipe the database back to the bundled dataset.
pub fn cmd_reset(db_path: &Path, yes: bool) -> Result<(), BoardError> {
    if !yes {
        return Err(BoardError::Io(
            "Reset wipes all local changes. Re-run with --yes to confirm.".to_string(),
        ));
    }

    let mut session = open_session(db_path)?;
    session.reset()?;
    println!("Board restored to the bundled dataset");
    Ok(())
}
