//! # Storage Module
//!
//! The persistence port for the board: a small set of fixed named slots,
//! each holding one opaque payload. The session writes the affected slots
//! after every successful mutation and reads them all once at startup.
//!
//! Two implementations are provided:
//! - [`MemorySlots`]: in-memory, for tests and throwaway sessions
//! - [`RedbSlots`]: disk-backed ACID storage using redb

mod redb_slots;

pub use redb_slots::RedbSlots;

use crate::types::BoardError;
use std::collections::BTreeMap;

// =============================================================================
// SLOTS
// =============================================================================

/// The fixed persistence slots. Each maps to one stable storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    Subjects,
    Axes,
    ProgramInfo,
    SemesterCount,
    Theme,
    StartedFlag,
}

impl Slot {
    /// Every slot, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Subjects,
        Self::Axes,
        Self::ProgramInfo,
        Self::SemesterCount,
        Self::Theme,
        Self::StartedFlag,
    ];

    /// Stable storage key for this slot.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Subjects => "subjects",
            Self::Axes => "axes",
            Self::ProgramInfo => "program-info",
            Self::SemesterCount => "semester-count",
            Self::Theme => "theme",
            Self::StartedFlag => "started-flag",
        }
    }
}

// =============================================================================
// SLOT STORE TRAIT
// =============================================================================

/// The injectable persistence port.
///
/// Payloads are opaque bytes; the session owns the encoding. Implementors
/// must be `Send + Sync` so a session can sit behind the API server's
/// shared state.
pub trait SlotStore: Send + Sync {
    /// Read a slot's payload, `None` if the slot has never been written.
    fn read(&self, slot: Slot) -> Result<Option<Vec<u8>>, BoardError>;

    /// Write a slot's payload, replacing any previous value.
    fn write(&mut self, slot: Slot, payload: &[u8]) -> Result<(), BoardError>;

    /// Remove every slot.
    fn clear(&mut self) -> Result<(), BoardError>;
}

// =============================================================================
// IN-MEMORY IMPLEMENTATION
// =============================================================================

/// In-memory slot store. Volatile; useful for tests and for sessions that
/// opt out of durability.
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: BTreeMap<&'static str, Vec<u8>>,
}

impl MemorySlots {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlots {
    fn read(&self, slot: Slot) -> Result<Option<Vec<u8>>, BoardError> {
        Ok(self.slots.get(slot.key()).cloned())
    }

    fn write(&mut self, slot: Slot, payload: &[u8]) -> Result<(), BoardError> {
        self.slots.insert(slot.key(), payload.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BoardError> {
        self.slots.clear();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_are_stable() {
        assert_eq!(Slot::Subjects.key(), "subjects");
        assert_eq!(Slot::ProgramInfo.key(), "program-info");
        assert_eq!(Slot::StartedFlag.key(), "started-flag");
    }

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemorySlots::new();
        assert_eq!(store.read(Slot::Theme).expect("read"), None);

        store.write(Slot::Theme, b"dark").expect("write");
        assert_eq!(store.read(Slot::Theme).expect("read"), Some(b"dark".to_vec()));

        store.write(Slot::Theme, b"light").expect("write");
        assert_eq!(
            store.read(Slot::Theme).expect("read"),
            Some(b"light".to_vec())
        );
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = MemorySlots::new();
        for slot in Slot::ALL {
            store.write(slot, b"x").expect("write");
        }
        store.clear().expect("clear");
        for slot in Slot::ALL {
            assert_eq!(store.read(slot).expect("read"), None);
        }
    }
}
