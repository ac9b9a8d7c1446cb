//! Shared test utilities for integration tests.
//!
//! Read-back helpers over `tar::Archive` so tests can assert on entry
//! names, types, metadata, link targets, and content.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::io::Read;

use tar::EntryType;

/// One decoded archive entry, in archive order.
#[derive(Debug, Clone)]
pub struct ArchivedEntry {
    /// Raw entry name, exactly as stored (keeps `./` prefixes and
    /// directory trailing slashes).
    pub name: String,
    pub entry_type: EntryType,
    pub size: u64,
    pub mode: u32,
    pub uid: u64,
    pub gid: u64,
    /// Link target for symlink and hard-link entries.
    pub link_name: Option<String>,
    pub content: Vec<u8>,
}

/// Decodes every entry of an uncompressed tar stream, in order.
pub fn read_entries(bytes: &[u8]) -> Vec<ArchivedEntry> {
    let mut archive = tar::Archive::new(bytes);
    let mut out = Vec::new();

    for entry in archive.entries().expect("valid archive") {
        let mut entry = entry.expect("valid entry");

        let name = String::from_utf8(entry.path_bytes().into_owned()).expect("utf-8 name");
        let link_name = entry
            .link_name_bytes()
            .map(|b| String::from_utf8(b.into_owned()).expect("utf-8 link name"));

        let header = entry.header();
        let entry_type = header.entry_type();
        let size = header.size().expect("size field");
        let mode = header.mode().expect("mode field");
        let uid = header.uid().expect("uid field");
        let gid = header.gid().expect("gid field");

        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("entry content");

        out.push(ArchivedEntry {
            name,
            entry_type,
            size,
            mode,
            uid,
            gid,
            link_name,
            content,
        });
    }

    out
}

/// Returns the entry with the given name, panicking with a useful message
/// if it is missing.
pub fn find<'a>(entries: &'a [ArchivedEntry], name: &str) -> &'a ArchivedEntry {
    entries.iter().find(|e| e.name == name).unwrap_or_else(|| {
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        panic!("entry {name:?} not found; archive contains {names:?}");
    })
}

/// Position of the named entry in archive order.
pub fn position(entries: &[ArchivedEntry], name: &str) -> usize {
    entries
        .iter()
        .position(|e| e.name == name)
        .unwrap_or_else(|| panic!("entry {name:?} not found"))
}
