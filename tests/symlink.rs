//! Integration tests for symlink target rewriting.
//!
//! Targets that stay inside the archived root are recorded relative to the
//! link's directory so the archive relocates cleanly; targets pointing
//! outside the root are recorded as the absolute paths they resolve to.

#![cfg(unix)]

mod common;

use std::fs;
use std::os::unix::fs::symlink;

use common::{find, read_entries};
use tar::EntryType;
use tempfile::TempDir;
use tarwalk::Archiver;

fn archive(root: &TempDir) -> Vec<u8> {
    let mut out = Vec::new();
    Archiver::new(&mut out, root.path()).run().unwrap();
    out
}

#[test]
fn test_relative_target_in_same_directory() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("data.txt"), b"x").unwrap();
    symlink("data.txt", root.path().join("alias")).unwrap();

    let entries = read_entries(&archive(&root));
    let link = find(&entries, "./alias");
    assert_eq!(link.entry_type, EntryType::Symlink);
    assert_eq!(link.link_name.as_deref(), Some("data.txt"));
}

#[test]
fn test_relative_target_across_directories() {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("bin")).unwrap();
    fs::create_dir(root.path().join("lib")).unwrap();
    fs::write(root.path().join("lib/libfoo.so"), b"x").unwrap();
    symlink("../lib/libfoo.so", root.path().join("bin/foo")).unwrap();

    let entries = read_entries(&archive(&root));
    let link = find(&entries, "./bin/foo");
    assert_eq!(link.link_name.as_deref(), Some("../lib/libfoo.so"));
}

#[test]
fn test_absolute_target_inside_root_becomes_relative() {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("etc")).unwrap();
    fs::write(root.path().join("etc/conf"), b"x").unwrap();
    symlink(root.path().join("etc/conf"), root.path().join("conf")).unwrap();

    let entries = read_entries(&archive(&root));
    let link = find(&entries, "./conf");
    // The on-disk absolute target is rewritten so the archive does not
    // leak the staging directory's location.
    assert_eq!(link.link_name.as_deref(), Some("etc/conf"));
}

#[test]
fn test_absolute_target_outside_root_is_kept() {
    let root = TempDir::new().unwrap();
    symlink("/etc/hosts", root.path().join("hosts")).unwrap();

    let entries = read_entries(&archive(&root));
    let link = find(&entries, "./hosts");
    assert_eq!(link.link_name.as_deref(), Some("/etc/hosts"));
}

#[test]
fn test_relative_target_escaping_root_resolves_absolute() {
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join("secret"), b"x").unwrap();
    let root_path = outer.path().join("tree");
    fs::create_dir(&root_path).unwrap();
    symlink("../secret", root_path.join("leak")).unwrap();

    let mut out = Vec::new();
    Archiver::new(&mut out, &root_path).run().unwrap();

    let entries = read_entries(&out);
    let link = find(&entries, "./leak");
    // Resolution leaves the root, so the recorded target is the
    // absolute path outside it.
    assert_eq!(
        link.link_name.as_deref(),
        Some(outer.path().join("secret").to_str().unwrap())
    );
}

#[test]
fn test_dangling_symlink_is_archived() {
    let root = TempDir::new().unwrap();
    symlink("nowhere", root.path().join("dangling")).unwrap();

    let entries = read_entries(&archive(&root));
    let link = find(&entries, "./dangling");
    assert_eq!(link.entry_type, EntryType::Symlink);
    assert_eq!(link.link_name.as_deref(), Some("nowhere"));
}

#[test]
fn test_symlink_targets_ignore_virtual_prefix() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("real"), b"x").unwrap();
    symlink("real", root.path().join("ref")).unwrap();

    let mut out = Vec::new();
    Archiver::new(&mut out, root.path())
        .virtual_path("opt/app")
        .run()
        .unwrap();

    let entries = read_entries(&out);
    let link = find(&entries, "./opt/app/ref");
    // The prefix relocates names, not targets; a relative target still
    // resolves next to the link after extraction.
    assert_eq!(link.link_name.as_deref(), Some("real"));
}
