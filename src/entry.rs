//! Entry classification and fallback metadata.
//!
//! Every visited filesystem object is classified exactly once into an
//! [`EntryKind`], which the archiver then matches exhaustively. This keeps
//! the per-kind archiving rules in one `match` instead of scattered
//! mode-bit conditionals, and makes adding a kind (e.g. FIFOs) a localized
//! change.
//!
//! [`EntryDefaults`] carries the metadata written in place of on-disk
//! values when permission or ownership preservation is disabled, so the
//! archiver's output is fully determined by its configuration rather than
//! by ambient constants.

use std::fs::FileType;

/// The kind of a filesystem object, as relevant to archiving.
///
/// Produced by [`EntryKind::of`] from a (non-followed) file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryKind {
    /// A directory; archived with a trailing `/` and descended into.
    Directory,
    /// A symbolic link; archived with a resolved link target.
    Symlink,
    /// A regular file; archived with its content (or as a hard link).
    Regular,
    /// A block or character device; archived with major/minor numbers.
    Device {
        /// True for character devices, false for block devices.
        char: bool,
    },
    /// A Unix domain socket; skipped (GNU tar does the same).
    Socket,
    /// Anything else (FIFOs, unrecognized types); skipped.
    Other,
}

impl EntryKind {
    /// Classifies a file type.
    ///
    /// The file type must come from a non-following stat (`symlink_metadata`
    /// or `DirEntry::metadata`), otherwise symlinks are misclassified as
    /// their targets.
    pub fn of(file_type: FileType) -> Self {
        if file_type.is_dir() {
            return Self::Directory;
        }
        if file_type.is_symlink() {
            return Self::Symlink;
        }
        if file_type.is_file() {
            return Self::Regular;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_char_device() {
                return Self::Device { char: true };
            }
            if file_type.is_block_device() {
                return Self::Device { char: false };
            }
            if file_type.is_socket() {
                return Self::Socket;
            }
        }
        Self::Other
    }
}

/// Metadata written when permission or ownership preservation is disabled.
///
/// With `include_permissions` off, directories and symlinks get
/// [`dir_mode`](Self::dir_mode) and regular files get
/// [`file_mode`](Self::file_mode) regardless of their on-disk modes. With
/// `include_owners` off, every entry gets [`uid`](Self::uid) /
/// [`gid`](Self::gid) instead of the host identities. The default ids are
/// 500/500, the first uid/gid conventionally reserved for normal users, so
/// archives never embed host-specific or root ownership by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDefaults {
    /// Mode for directories and symlinks.
    pub dir_mode: u32,
    /// Mode for regular files.
    pub file_mode: u32,
    /// Placeholder user id.
    pub uid: u64,
    /// Placeholder group id.
    pub gid: u64,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            dir_mode: 0o755,
            file_mode: 0o644,
            uid: 500,
            gid: 500,
        }
    }
}
