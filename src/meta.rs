//! Platform metadata capability layer.
//!
//! Archiving needs a handful of POSIX-flavored facts about each visited
//! object: inode identity and link count (hard-link detection), uid/gid
//! (ownership), permission bits, device major/minor numbers, and the
//! modification time. `std::fs::Metadata` exposes these only through
//! platform extension traits, so this module wraps them behind small
//! free functions with degraded non-Unix fallbacks: no inode identity,
//! link count 1, no ownership, no mode bits, no device numbers. Traversal
//! code never touches `cfg` directly.

use std::fs::Metadata;

/// Platform-independent identity of the underlying storage object.
///
/// Two paths with the same `FileId` reference the same inode, i.e. they are
/// hard links to one another. The device id disambiguates inode numbers
/// across filesystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    device: u64,
    inode: u64,
}

impl FileId {
    #[cfg(any(unix, test))]
    pub(crate) fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }
}

/// Returns the identity of the object, if the platform exposes one.
#[cfg(unix)]
pub fn file_id(meta: &Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some(FileId::new(meta.dev(), meta.ino()))
}

/// Returns the identity of the object, if the platform exposes one.
#[cfg(not(unix))]
pub fn file_id(_meta: &Metadata) -> Option<FileId> {
    None
}

/// Returns the number of directory entries referencing the object.
#[cfg(unix)]
pub fn link_count(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.nlink()
}

/// Returns the number of directory entries referencing the object.
///
/// Platforms without link counts report 1, so hard-link detection is
/// simply never triggered.
#[cfg(not(unix))]
pub fn link_count(_meta: &Metadata) -> u64 {
    1
}

/// Returns the owning uid/gid, if the platform tracks ownership.
#[cfg(unix)]
pub fn owner_ids(meta: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((u64::from(meta.uid()), u64::from(meta.gid())))
}

/// Returns the owning uid/gid, if the platform tracks ownership.
#[cfg(not(unix))]
pub fn owner_ids(_meta: &Metadata) -> Option<(u64, u64)> {
    None
}

/// Returns the permission bits (including setuid/setgid/sticky), if any.
#[cfg(unix)]
pub fn mode_bits(meta: &Metadata) -> Option<u32> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.mode() & 0o7777)
}

/// Returns the permission bits (including setuid/setgid/sticky), if any.
#[cfg(not(unix))]
pub fn mode_bits(_meta: &Metadata) -> Option<u32> {
    None
}

/// Returns the device (major, minor) numbers of a device node.
#[cfg(unix)]
pub fn device_numbers(meta: &Metadata) -> Option<(u32, u32)> {
    use std::os::unix::fs::MetadataExt;
    let rdev = meta.rdev() as libc::dev_t;
    Some((libc::major(rdev) as u32, libc::minor(rdev) as u32))
}

/// Returns the device (major, minor) numbers of a device node.
#[cfg(not(unix))]
pub fn device_numbers(_meta: &Metadata) -> Option<(u32, u32)> {
    None
}

/// Returns the modification time as seconds since the Unix epoch.
///
/// Timestamps before the epoch are clamped to 0, which is what the tar
/// header field can represent.
pub fn mtime(meta: &Metadata) -> u64 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        meta.mtime().max(0) as u64
    }
    #[cfg(not(unix))]
    {
        meta.modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
