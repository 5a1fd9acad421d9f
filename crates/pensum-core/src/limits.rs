//! # Board Limits
//!
//! Hardcoded runtime constants for the curriculum board.
//!
//! These are compiled into the binary and immutable at runtime.

/// Semesters at or below this index are always shown by the grouping
/// derivation, even when empty and not searched for.
pub const ALWAYS_VISIBLE_SEMESTERS: u32 = 3;

/// New boards seeded from the bundled dataset are restricted to this many
/// semesters.
pub const SEED_SEMESTERS: u32 = 3;

/// Version string stamped into exported snapshots.
pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0";

/// Maximum snapshot payload accepted by the importer.
///
/// Validated BEFORE deserialization to prevent allocation-based memory
/// exhaustion from corrupted or malicious files.
pub const MAX_SNAPSHOT_PAYLOAD_SIZE: usize = 16 * 1024 * 1024; // 16 MB

/// Maximum number of subjects accepted in one imported snapshot.
pub const MAX_IMPORT_SUBJECT_COUNT: usize = 10_000;

/// Maximum number of axes accepted in one imported snapshot.
pub const MAX_IMPORT_AXIS_COUNT: usize = 1_000;

/// Maximum length for subject and axis names at the API boundary.
pub const MAX_NAME_LENGTH: usize = 512;

/// Maximum requisite entries per subject at the API boundary.
pub const MAX_REQUISITES_PER_SUBJECT: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_visible_is_three() {
        // The first three semesters are pinned visible
        assert_eq!(ALWAYS_VISIBLE_SEMESTERS, 3);
    }

    #[test]
    fn seed_matches_visible_window() {
        assert_eq!(SEED_SEMESTERS, ALWAYS_VISIBLE_SEMESTERS);
    }
}
