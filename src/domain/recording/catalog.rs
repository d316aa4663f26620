//! In-memory catalog of recordings

use std::cmp::Ordering;

use super::{RecordingEntry, RecordingFileName, RecordingId};

/// Recordings ordered newest first.
///
/// Ties on creation time fall back to the file name (descending) so the
/// order never depends on directory listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<RecordingEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[RecordingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id
    pub fn get(&self, id: RecordingId) -> Option<&RecordingEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Add an entry, keeping the order. An entry already stored at the same
    /// location is replaced and its id carries over. Returns the stored id.
    pub fn insert(&mut self, entry: RecordingEntry) -> RecordingId {
        let existing = self
            .entries
            .iter()
            .position(|e| e.location() == entry.location());
        let entry = match existing {
            Some(index) => {
                let known = self.entries.remove(index);
                entry.with_id(known.id())
            }
            None => entry,
        };
        let id = entry.id();
        self.entries.push(entry);
        self.sort();
        id
    }

    /// Remove an entry by id
    pub fn remove(&mut self, id: RecordingId) -> Option<RecordingEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }

    /// Rename an entry in place. Returns false for an unknown id.
    pub fn rename(&mut self, id: RecordingId, filename: RecordingFileName) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        entry.rename_to(filename);
        self.sort();
        true
    }

    /// Replace every entry after a directory scan.
    /// Files already in the catalog keep their id.
    pub fn replace(&mut self, entries: Vec<RecordingEntry>) {
        let previous = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .map(|entry| {
                match previous.iter().find(|known| known.location() == entry.location()) {
                    Some(known) => entry.with_id(known.id()),
                    None => entry,
                }
            })
            .collect();
        self.sort();
    }

    fn sort(&mut self) {
        self.entries.sort_by(newest_first);
    }
}

fn newest_first(a: &RecordingEntry, b: &RecordingEntry) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| b.filename().cmp(a.filename()))
}

/// Sort scanned entries the same way the catalog does
pub fn sort_newest_first(entries: &mut [RecordingEntry]) {
    entries.sort_by(newest_first);
}
