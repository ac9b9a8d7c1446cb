//! Hard link tracking during archive creation.
//!
//! This module provides the [`HardLinkTracker`] which detects hard links
//! by remembering inode identities as the traversal visits regular files.
//!
//! The tracker maintains a mapping from [`FileId`] (device + inode) to the
//! archive name (raw bytes) of the first occurrence. When a file with
//! multiple hard links is encountered again, the caller is handed the
//! first name so it can emit a zero-size link entry instead of duplicating
//! the content.
//!
//! Only files whose on-disk link count exceeds one should be checked;
//! files with a single link can never be a hard link to anything else and
//! never enter the table. The table is never pruned during a run; it lives
//! as long as the [`Archiver`](crate::Archiver) that owns it.

use std::collections::HashMap;

use crate::meta::FileId;

/// Tracker for detecting hard links during archive creation.
///
/// # Example
///
/// ```rust,ignore
/// use tarwalk::hardlink::HardLinkTracker;
///
/// let mut tracker = HardLinkTracker::new();
/// match tracker.check(id, b"./a/first") {
///     Some(first) => { /* emit a link entry pointing at `first` */ }
///     None => { /* first occurrence: emit a full entry */ }
/// }
/// ```
#[derive(Debug, Default)]
pub struct HardLinkTracker {
    /// Maps file identity to the archive name of the first occurrence.
    seen: HashMap<FileId, Vec<u8>>,
}

impl HardLinkTracker {
    /// Creates a new hard link tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `id` was already archived under another name.
    ///
    /// Returns the archive name of the first occurrence if `id` has been
    /// seen before; otherwise records `entry_name` as the first occurrence
    /// and returns `None`.
    pub fn check(&mut self, id: FileId, entry_name: &[u8]) -> Option<Vec<u8>> {
        if let Some(first) = self.seen.get(&id) {
            Some(first.clone())
        } else {
            self.seen.insert(id, entry_name.to_vec());
            None
        }
    }

    /// Returns the number of distinct inodes recorded so far.
    pub fn tracked_count(&self) -> usize {
        self.seen.len()
    }
}
