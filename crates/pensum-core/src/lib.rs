//! # pensum-core
//!
//! The deterministic curriculum engine for Pensum - THE LOGIC.
//!
//! This crate models an academic program as a board of subjects organized
//! into semesters, linked by prerequisite/corequisite references and
//! grouped into thematic axes ("ejes"), and implements the
//! consistency-preserving mutations that keep those references coherent
//! while the board is edited, imported, and rearranged.
//!
//! ## Architecture
//!
//! - [`board`]: the entity store, collections plus unconditional swaps
//! - [`mutation`]: the integrity engine every mutating command goes through
//! - [`query`]: pure read-side derivations (highlighting, grouping, axis
//!   resolution), recomputed per call
//! - [`snapshot`]: the JSON interchange format with atomic import
//! - [`session`]: the command boundary, wiring the board to an injectable
//!   persistence port
//! - [`storage`]: the slot-store port and its in-memory / redb backends
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies
//! - Deterministic: no clocks, no randomness; timestamps are injected by
//!   the caller
//! - No panics: all fallible operations return `Result<T, BoardError>`,
//!   and the board is unchanged whenever an error comes back

// =============================================================================
// MODULES
// =============================================================================

pub mod board;
pub mod limits;
pub mod mutation;
pub mod query;
pub mod seed;
pub mod session;
pub mod snapshot;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Axis, AxisColor, BoardError, ProgramInfo, Subject, SubjectDetails, SyllabusUnit};

// =============================================================================
// RE-EXPORTS: Board Engine
// =============================================================================

pub use board::CurriculumBoard;
pub use mutation::{
    BoardEditor, DanglingRequisite, ReferenceAudit, RequisiteKind, UnresolvedAxis,
};
pub use query::{Highlight, SemesterGroup, classify_highlight, group_by_semester, resolve_axis};
pub use session::Session;

// =============================================================================
// RE-EXPORTS: Snapshot & Storage
// =============================================================================

pub use snapshot::{Snapshot, apply_snapshot, snapshot_from_json, snapshot_to_json};
pub use storage::{MemorySlots, RedbSlots, Slot, SlotStore};
