//! # Preview Handles
//!
//! A [`PreviewHandle`] is a short-lived reference to a renderable copy of a
//! blob, the way a browser object URL is. The bytes live in a
//! [`PreviewTable`]; a handle only resolves while its table entry is live.
//!
//! ## Lifecycle
//!
//! - The table is keyed by slot. Creating a handle for an occupied slot
//!   releases the previous one first, so every create has exactly one release.
//! - [`PreviewTable::release`] and [`PreviewTable::release_all`] invalidate
//!   handles immediately.
//! - Dropping the table releases whatever is left (view teardown).

use std::collections::HashMap;
use std::hash::Hash;

use base64::{engine::general_purpose, Engine as _};
use log::debug;
use uuid::Uuid;

use crate::common::media::Blob;

/// URL scheme prefix for handles.
const URL_PREFIX: &str = "blob:securevision/";

/// Revocable reference to a previewable blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    id: Uuid,
    url: String,
}

impl PreviewHandle {
    fn new() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            url: format!("{}{}", URL_PREFIX, id),
        }
    }

    /// `blob:securevision/<uuid>` URL identifying this handle.
    pub fn url(&self) -> &str {
        &self.url
    }
}

struct Entry {
    handle: PreviewHandle,
    blob: Blob,
}

/// Slot-keyed table of live preview handles.
pub struct PreviewTable<K: Eq + Hash + Copy + std::fmt::Debug> {
    entries: HashMap<K, Entry>,
}

impl<K: Eq + Hash + Copy + std::fmt::Debug> PreviewTable<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a handle for `slot`, releasing the one it supersedes.
    pub fn create(&mut self, slot: K, blob: Blob) -> PreviewHandle {
        self.release(slot);

        let handle = PreviewHandle::new();
        debug!("Created preview {} for {:?} ({})", handle.url, slot, blob.name());

        self.entries.insert(
            slot,
            Entry {
                handle: handle.clone(),
                blob,
            },
        );
        handle
    }

    /// Release the handle in `slot`. Returns whether anything was released.
    pub fn release(&mut self, slot: K) -> bool {
        match self.entries.remove(&slot) {
            Some(entry) => {
                debug!("Released preview {} for {:?}", entry.handle.url, slot);
                true
            }
            None => false,
        }
    }

    /// Release every live handle.
    pub fn release_all(&mut self) {
        let slots: Vec<K> = self.entries.keys().copied().collect();
        for slot in slots {
            self.release(slot);
        }
    }

    pub fn get(&self, slot: K) -> Option<&PreviewHandle> {
        self.entries.get(&slot).map(|e| &e.handle)
    }

    /// Bytes behind a handle, or `None` once it has been released.
    pub fn resolve(&self, handle: &PreviewHandle) -> Option<&Blob> {
        self.entries
            .values()
            .find(|e| e.handle.id == handle.id)
            .map(|e| &e.blob)
    }

    /// Inline `data:` URI for a live handle.
    pub fn data_uri(&self, handle: &PreviewHandle) -> Option<String> {
        self.resolve(handle).map(|blob| {
            format!(
                "data:{};base64,{}",
                blob.media_type().mime(),
                general_purpose::STANDARD.encode(blob.bytes())
            )
        })
    }

    /// Number of handles that still resolve.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Eq + Hash + Copy + std::fmt::Debug> Default for PreviewTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Copy + std::fmt::Debug> Drop for PreviewTable<K> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::media::MediaType;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Slot {
        A,
        B,
    }

    fn png(byte: u8) -> Blob {
        Blob::new("p.png", MediaType::Png, vec![byte])
    }

    #[test]
    fn test_create_supersedes_previous_handle() {
        let mut table = PreviewTable::new();

        let first = table.create(Slot::A, png(1));
        let second = table.create(Slot::A, png(2));

        assert_ne!(first, second);
        assert_eq!(table.live_count(), 1);
        assert!(table.resolve(&first).is_none());
        assert_eq!(table.resolve(&second).unwrap().bytes(), &[2]);
        assert!(second.url().starts_with("blob:securevision/"));
    }

    #[test]
    fn test_release_invalidates() {
        let mut table = PreviewTable::new();
        let a = table.create(Slot::A, png(1));
        table.create(Slot::B, png(2));

        assert!(table.release(Slot::A));
        assert!(!table.release(Slot::A));
        assert!(table.resolve(&a).is_none());
        assert!(table.get(Slot::B).is_some());

        table.release_all();
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn test_data_uri() {
        let mut table = PreviewTable::new();
        let handle = table.create(Slot::A, Blob::new("p.png", MediaType::Png, b"hi".to_vec()));

        assert_eq!(
            table.data_uri(&handle).unwrap(),
            "data:image/png;base64,aGk="
        );
    }
}
