//! # Redb Slot Store
//!
//! Disk-backed implementation of [`SlotStore`] over a single redb table.
//! Each write is its own ACID transaction; a crash mid-write leaves the
//! previous slot value intact.

use super::{Slot, SlotStore};
use crate::types::BoardError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Slot table: slot key -> opaque payload.
const SLOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

/// A slot store backed by a redb database file.
#[derive(Debug)]
pub struct RedbSlots {
    db: Database,
}

impl RedbSlots {
    /// Open (or create) the slot database at the given path.
    ///
    /// The slot table is created eagerly so a fresh database reads cleanly.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BoardError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| BoardError::Io(e.to_string()))?;

        let tx = db
            .begin_write()
            .map_err(|e| BoardError::Io(e.to_string()))?;
        tx.open_table(SLOTS)
            .map_err(|e| BoardError::Io(e.to_string()))?;
        tx.commit().map_err(|e| BoardError::Io(e.to_string()))?;

        Ok(Self { db })
    }
}

impl SlotStore for RedbSlots {
    fn read(&self, slot: Slot) -> Result<Option<Vec<u8>>, BoardError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| BoardError::Io(e.to_string()))?;
        let table = tx
            .open_table(SLOTS)
            .map_err(|e| BoardError::Io(e.to_string()))?;
        let value = table
            .get(slot.key())
            .map_err(|e| BoardError::Io(e.to_string()))?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn write(&mut self, slot: Slot, payload: &[u8]) -> Result<(), BoardError> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| BoardError::Io(e.to_string()))?;
        {
            let mut table = tx
                .open_table(SLOTS)
                .map_err(|e| BoardError::Io(e.to_string()))?;
            table
                .insert(slot.key(), payload)
                .map_err(|e| BoardError::Io(e.to_string()))?;
        }
        tx.commit().map_err(|e| BoardError::Io(e.to_string()))
    }

    fn clear(&mut self) -> Result<(), BoardError> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| BoardError::Io(e.to_string()))?;
        {
            let mut table = tx
                .open_table(SLOTS)
                .map_err(|e| BoardError::Io(e.to_string()))?;
            for slot in Slot::ALL {
                table
                    .remove(slot.key())
                    .map_err(|e| BoardError::Io(e.to_string()))?;
            }
        }
        tx.commit().map_err(|e| BoardError::Io(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("slots.db");

        let mut store = RedbSlots::open(&path).expect("open");
        store.write(Slot::Subjects, b"payload").expect("write");
        drop(store);

        // Reopen and read back
        let store = RedbSlots::open(&path).expect("reopen");
        assert_eq!(
            store.read(Slot::Subjects).expect("read"),
            Some(b"payload".to_vec())
        );
        assert_eq!(store.read(Slot::Axes).expect("read"), None);
    }

    #[test]
    fn fresh_database_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbSlots::open(dir.path().join("empty.db")).expect("open");
        for slot in Slot::ALL {
            assert_eq!(store.read(slot).expect("read"), None);
        }
    }

    #[test]
    fn clear_wipes_all_slots() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = RedbSlots::open(dir.path().join("wipe.db")).expect("open");

        store.write(Slot::Theme, b"dark").expect("write");
        store.write(Slot::StartedFlag, b"\x01").expect("write");
        store.clear().expect("clear");

        assert_eq!(store.read(Slot::Theme).expect("read"), None);
        assert_eq!(store.read(Slot::StartedFlag).expect("read"), None);
    }
}
