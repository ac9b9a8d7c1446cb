//! Entry-name construction and lexical path manipulation.
//!
//! Tar entry names follow a fixed convention: every name is prefixed with
//! `./`, directories carry a trailing `/`, and an optional virtual prefix
//! is joined and lexically cleaned ahead of the `./` prefix. The virtual
//! prefix decouples the on-disk location of the tree from the location
//! recorded in the archive, so `/tmp/build/bin/foo` can be archived as
//! `./var/lib/build/bin/foo`.
//!
//! Names are byte strings, as in the tar format itself, so file names
//! that are not valid UTF-8 pass through unchanged. All manipulation here
//! is lexical: no path in this module is ever resolved against the
//! filesystem.

use std::path::{Component, Path, PathBuf};

/// Builds the archive entry name for a relative path.
///
/// `rel` is the traversal-relative path of the object (`.` for the root)
/// as `/`-separated raw bytes. The result always starts with `./` and
/// ends with `/` when `is_dir` is set.
///
/// # Examples
///
/// ```
/// use tarwalk::archive_path::entry_name;
///
/// assert_eq!(entry_name(None, b"a/f.txt", false), b"./a/f.txt");
/// assert_eq!(entry_name(None, b"a", true), b"./a/");
/// assert_eq!(entry_name(None, b".", true), b"./");
/// assert_eq!(entry_name(Some("var/lib"), b"a", true), b"./var/lib/a/");
/// assert_eq!(entry_name(Some("var/lib"), b".", true), b"./var/lib/");
/// ```
pub fn entry_name(virtual_prefix: Option<&str>, rel: &[u8], is_dir: bool) -> Vec<u8> {
    let joined = match virtual_prefix {
        Some(prefix) => {
            let prefix = prefix.trim_matches('/').as_bytes();
            let mut joined = Vec::with_capacity(prefix.len() + rel.len() + 1);
            joined.extend_from_slice(prefix);
            joined.push(b'/');
            joined.extend_from_slice(rel);
            clean_name(&joined)
        }
        None => clean_name(rel),
    };

    if joined == b"." {
        // The archive root itself.
        return if is_dir { b"./".to_vec() } else { b".".to_vec() };
    }

    let mut name = Vec::with_capacity(joined.len() + 3);
    name.extend_from_slice(b"./");
    name.extend_from_slice(&joined);
    if is_dir {
        name.push(b'/');
    }
    name
}

/// Lexically cleans a `/`-separated relative path given as raw bytes.
///
/// Removes `.` segments, resolves `..` against preceding segments, and
/// collapses repeated slashes. Returns `"."` when nothing remains.
pub fn clean_name(name: &[u8]) -> Vec<u8> {
    let mut segments: Vec<&[u8]> = Vec::new();
    for segment in name.split(|b| *b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => {
                if segments.last().is_some_and(|s| *s != b"..") {
                    segments.pop();
                } else {
                    segments.push(b"..");
                }
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        b".".to_vec()
    } else {
        segments.join(&b'/')
    }
}

/// Lexically cleans a platform path, resolving `.` and `..` components.
///
/// For absolute paths, `..` at the root is dropped (as in `/a/../../b` →
/// `/b`). No symlinks are followed; the result may name a different object
/// than the input when `..` crosses a symlinked directory, which is
/// acceptable for the archive-name rewriting this crate does.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    let mut rooted = false;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                out.push(component.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !rooted {
                    out.push("..");
                }
            }
            Component::Normal(name) => {
                out.push(name);
                depth += 1;
            }
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Computes `target` relative to `base`.
///
/// Both paths must be absolute and lexically cleaned. Walks off the shared
/// prefix, then climbs out of the remaining `base` components with `..`.
pub fn relative_from(base: &Path, target: &Path) -> PathBuf {
    let mut base_components = base.components().peekable();
    let mut target_components = target.components().peekable();

    // Skip the shared prefix.
    while let (Some(b), Some(t)) = (base_components.peek(), target_components.peek()) {
        if b != t {
            break;
        }
        base_components.next();
        target_components.next();
    }

    let mut rel = PathBuf::new();
    for _ in base_components {
        rel.push("..");
    }
    for component in target_components {
        rel.push(component.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Converts a relative platform path into `/`-separated archive-name bytes.
#[cfg(unix)]
pub(crate) fn to_slash(rel: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;

    let mut out = Vec::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push(b'/');
        }
        out.extend_from_slice(component.as_os_str().as_bytes());
    }
    if out.is_empty() {
        out.push(b'.');
    }
    out
}

/// Converts a relative platform path into `/`-separated archive-name bytes.
///
/// Non-Unix file names have no byte representation, so the conversion is
/// lossy there.
#[cfg(not(unix))]
pub(crate) fn to_slash(rel: &Path) -> Vec<u8> {
    let mut out = Vec::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push(b'/');
        }
        out.extend_from_slice(component.as_os_str().to_string_lossy().as_bytes());
    }
    if out.is_empty() {
        out.push(b'.');
    }
    out
}

/// Raw bytes of a path, for tar header link-target fields.
#[cfg(unix)]
pub(crate) fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

/// Raw bytes of a path, for tar header link-target fields (lossy off Unix).
#[cfg(not(unix))]
pub(crate) fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}
