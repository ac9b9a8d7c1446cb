//! Symlink target resolution for archiving.
//!
//! A symlink's on-disk target is rarely suitable for the archive as-is: a
//! target inside the archived root should be stored relative so the link
//! survives extraction to any location, while a target escaping the root
//! has no portable spelling and is stored as the resolved absolute path.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive_path::{clean, relative_from};
use crate::{Error, Result};

/// Resolves the archive target for the symlink at `rel` under `target_root`.
///
/// Reads the link, absolutizes a relative target against the link's
/// containing directory, lexically cleans the result, and rewrites it
/// relative to the containing directory when it stays under `target_root`.
/// Containment is component-wise, so a sibling of the root that shares a
/// name prefix (`/data2` next to `/data`) is correctly treated as outside.
///
/// # Errors
///
/// Fails if the link cannot be read (e.g. permission denied) or, for a
/// relative `target_root`, if the current directory cannot be determined.
pub(crate) fn resolve(target_root: &Path, rel: &Path) -> Result<PathBuf> {
    let location = target_root.join(rel);
    let link = fs::read_link(&location).map_err(|e| Error::fs(&location, e))?;

    let root = absolute(target_root)?;
    let link_dir = clean(&root.join(rel.parent().unwrap_or(Path::new(""))));

    let target = if link.is_absolute() {
        clean(&link)
    } else {
        clean(&link_dir.join(&link))
    };

    if target.starts_with(&root) {
        Ok(relative_from(&link_dir, &target))
    } else {
        Ok(target)
    }
}

/// Lexically absolutizes `path` against the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(clean(path))
    } else {
        Ok(clean(&env::current_dir()?.join(path)))
    }
}
