//! Directory-tree archiving.
//!
//! [`Archiver`] walks a filesystem subtree depth-first and writes one tar
//! entry per visited object through the `tar` crate's encoder, optionally
//! behind gzip framing. Hard links, symlinks, and device nodes are
//! preserved; sockets and unclassifiable objects are skipped.
//!
//! The walk is single-threaded and fully synchronous. Children are visited
//! in whatever order `read_dir` yields them, so archives are not
//! byte-identical across runs or machines for the same tree. A directory's
//! header is always written before its contents are enumerated. Any
//! filesystem or encoder error aborts the run; bytes already written stay
//! on the sink.
//!
//! Entry names are written into the header name field verbatim: the
//! naming convention requires the `./` prefix that the `tar` crate's path
//! canonicalization strips, and names are raw bytes rather than UTF-8.
//! Over-long names and link targets get GNU long-name records, as GNU tar
//! writes them.

use std::fs::{self, File, Metadata};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tar::{Builder, EntryType, Header};

use crate::archive_path::{self, entry_name};
use crate::compression::CompressedWriter;
use crate::entry::{EntryDefaults, EntryKind};
use crate::exclude::ExcludeList;
use crate::hardlink::HardLinkTracker;
use crate::symlink;
use crate::{Compression, Error, Result, meta};

/// Archives a directory tree to a byte sink as a tar stream.
///
/// Construct with [`Archiver::new`], adjust the configuration with the
/// builder methods, then call [`Archiver::run`]. A single archiver performs
/// a single run; its hard-link table lives exactly as long as the archiver.
///
/// Defaults: no compression, permissions preserved, ownership masked to
/// the placeholder ids, no exclusions, no virtual prefix.
///
/// # Example
///
/// ```rust,no_run
/// use tarwalk::{Archiver, Compression, Result};
///
/// fn main() -> Result<()> {
///     let mut out = Vec::new();
///     Archiver::new(&mut out, "/tmp/build")
///         .compression(Compression::Gzip)
///         .virtual_path("var/lib/build")
///         .exclude("*.tmp")?
///         .run()?;
///     Ok(())
/// }
/// ```
pub struct Archiver<W: Write> {
    target: PathBuf,
    sink: W,
    compression: Compression,
    include_permissions: bool,
    include_owners: bool,
    excluded: ExcludeList,
    virtual_path: Option<String>,
    defaults: EntryDefaults,
    hard_links: HardLinkTracker,
}

impl<W: Write> Archiver<W> {
    /// Creates an archiver that writes the contents of `target` to `sink`.
    pub fn new(sink: W, target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            sink,
            compression: Compression::None,
            include_permissions: true,
            include_owners: false,
            excluded: ExcludeList::default(),
            virtual_path: None,
            defaults: EntryDefaults::default(),
            hard_links: HardLinkTracker::new(),
        }
    }

    /// Selects the compression framing for the output stream.
    ///
    /// Only [`Compression::None`] and [`Compression::Gzip`] can be written;
    /// the other modes make [`run`](Self::run) fail before any byte reaches
    /// the sink.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Whether to copy on-disk permission bits (default `true`).
    ///
    /// When disabled, directories and symlinks are archived with the
    /// default directory mode and regular files with the default file mode
    /// from [`EntryDefaults`].
    pub fn include_permissions(mut self, include: bool) -> Self {
        self.include_permissions = include;
        self
    }

    /// Whether to copy on-disk uid/gid (default `false`).
    ///
    /// When disabled, every entry carries the placeholder ids from
    /// [`EntryDefaults`] instead of host-specific identities.
    pub fn include_owners(mut self, include: bool) -> Self {
        self.include_owners = include;
        self
    }

    /// Prepends a virtual prefix to every archived name.
    ///
    /// This decouples the on-disk location from the archived location:
    /// archiving `/tmp/build` with prefix `var/lib/build` records
    /// `/tmp/build/bin/foo` as `./var/lib/build/bin/foo`.
    pub fn virtual_path(mut self, prefix: impl Into<String>) -> Self {
        self.virtual_path = Some(prefix.into());
        self
    }

    /// Adds a glob pattern excluding matching paths from the archive.
    ///
    /// The pattern is matched against each full archive-relative path and
    /// against each basename; either match excludes the object, and an
    /// excluded directory is never descended into. A leading `/` is
    /// stripped since candidate paths are relative to the archive root.
    ///
    /// # Errors
    ///
    /// Fails if `pattern` is not a valid glob expression.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.excluded.add(pattern)?;
        Ok(self)
    }

    /// Replaces the fallback metadata used when permission or ownership
    /// preservation is disabled.
    pub fn defaults(mut self, defaults: EntryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Archives the target tree, consuming the archiver.
    ///
    /// On success the sink holds a complete, correctly terminated archive.
    /// On failure the end-of-archive markers are still flushed on a
    /// best-effort basis, but the stream should be considered invalid and
    /// discarded by the caller.
    pub fn run(mut self) -> Result<()> {
        let writer = CompressedWriter::for_writing(self.compression, self.sink)?;

        let mut walker = Walker {
            target: &self.target,
            include_permissions: self.include_permissions,
            include_owners: self.include_owners,
            excluded: &self.excluded,
            virtual_path: self.virtual_path.as_deref(),
            defaults: self.defaults,
            hard_links: &mut self.hard_links,
            builder: Builder::new(writer),
        };

        let root_meta = fs::metadata(&self.target).map_err(|e| Error::fs(&self.target, e))?;

        // An early return drops the walker, whose encoder and compressor
        // flush their trailing format markers on drop where they still can.
        walker.process_entry(Path::new("."), &root_meta)?;

        let writer = walker.builder.into_inner()?;
        writer.finish()?;
        Ok(())
    }
}

/// Per-run traversal state: the archiver's configuration plus the encoder.
struct Walker<'a, W: Write> {
    target: &'a Path,
    include_permissions: bool,
    include_owners: bool,
    excluded: &'a ExcludeList,
    virtual_path: Option<&'a str>,
    defaults: EntryDefaults,
    hard_links: &'a mut HardLinkTracker,
    builder: Builder<CompressedWriter<W>>,
}

impl<W: Write> Walker<'_, W> {
    /// Processes one visited object: exclusion filter, classification,
    /// header emission, and (for directories) recursion into children.
    fn process_entry(&mut self, rel: &Path, meta: &Metadata) -> Result<()> {
        let rel_name = archive_path::to_slash(rel);
        if self.excluded.matches(&rel_name) {
            return Ok(());
        }

        match EntryKind::of(meta.file_type()) {
            EntryKind::Directory => {
                let name = entry_name(self.virtual_path, &rel_name, true);
                let mut header = self.base_header(meta);
                header.set_entry_type(EntryType::Directory);
                header.set_size(0);
                header.set_mode(self.mode_for(meta, self.defaults.dir_mode));
                self.append_entry(&mut header, &name, io::empty())?;

                self.process_directory(rel)
            }
            EntryKind::Symlink => {
                let name = entry_name(self.virtual_path, &rel_name, false);
                let link_target = symlink::resolve(self.target, rel)?;
                let mut header = self.base_header(meta);
                header.set_entry_type(EntryType::Symlink);
                header.set_size(0);
                header.set_mode(self.mode_for(meta, self.defaults.dir_mode));
                self.set_link_target(&mut header, &archive_path::path_bytes(&link_target))?;
                self.append_entry(&mut header, &name, io::empty())
            }
            EntryKind::Regular => {
                let name = entry_name(self.virtual_path, &rel_name, false);
                let mut header = self.base_header(meta);
                header.set_mode(self.mode_for(meta, self.defaults.file_mode));

                // A link count above one means other paths share this
                // inode; the first one archived carries the content and
                // every later one becomes a link entry referencing it.
                if meta::link_count(meta) > 1 {
                    if let Some(id) = meta::file_id(meta) {
                        if let Some(first) = self.hard_links.check(id, &name) {
                            header.set_entry_type(EntryType::Link);
                            header.set_size(0);
                            self.set_link_target(&mut header, &first)?;
                            return self.append_entry(&mut header, &name, io::empty());
                        }
                    }
                }

                header.set_entry_type(EntryType::Regular);
                header.set_size(meta.len());

                let location = self.target.join(rel);
                let mut file = File::open(&location).map_err(|e| Error::fs(&location, e))?;
                self.append_entry(&mut header, &name, &mut file)
            }
            EntryKind::Device { char } => {
                let name = entry_name(self.virtual_path, &rel_name, false);
                let mut header = self.base_header(meta);
                header.set_entry_type(if char {
                    EntryType::Char
                } else {
                    EntryType::Block
                });
                header.set_size(0);
                // Devices keep their on-disk mode regardless of the
                // permission policy.
                header.set_mode(meta::mode_bits(meta).unwrap_or(self.defaults.file_mode));

                // lstat has no rdev guarantee for the traversal metadata
                // source on all platforms; re-stat the node itself. A
                // failure here is tolerated: the entry is written with
                // major/minor unset.
                let location = self.target.join(rel);
                match fs::metadata(&location) {
                    Ok(statted) => {
                        if let Some((major, minor)) = meta::device_numbers(&statted) {
                            header.set_device_major(major)?;
                            header.set_device_minor(minor)?;
                        }
                    }
                    Err(err) => {
                        debug!(
                            "device numbers unavailable for {}: {err}",
                            location.display()
                        );
                    }
                }

                self.append_entry(&mut header, &name, io::empty())
            }
            EntryKind::Socket => {
                // gnutar skips sockets, so we do too.
                debug!("skipping socket {}", String::from_utf8_lossy(&rel_name));
                Ok(())
            }
            EntryKind::Other => {
                debug!(
                    "skipping unsupported filesystem object {}",
                    String::from_utf8_lossy(&rel_name)
                );
                Ok(())
            }
        }
    }

    /// Visits a directory's children in `read_dir` order.
    fn process_directory(&mut self, rel: &Path) -> Result<()> {
        let location = self.target.join(rel);
        let entries = fs::read_dir(&location).map_err(|e| Error::fs(&location, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::fs(&location, e))?;
            let child_rel = if rel == Path::new(".") {
                PathBuf::from(entry.file_name())
            } else {
                rel.join(entry.file_name())
            };
            // DirEntry metadata does not follow symlinks, which is what
            // classification needs.
            let child_meta = entry.metadata().map_err(|e| Error::fs(entry.path(), e))?;
            self.process_entry(&child_rel, &child_meta)?;
        }

        Ok(())
    }

    /// Appends `header` and its data with `name` stored verbatim in the
    /// header name field. `Header::set_path` would canonicalize away the
    /// `./` prefix the naming convention requires.
    fn append_entry(&mut self, header: &mut Header, name: &[u8], data: impl Read) -> Result<()> {
        let field = &mut header.as_old_mut().name;
        if name.len() > field.len() {
            let keep = field.len();
            self.append_long(EntryType::GNULongName, name)?;
            field.copy_from_slice(&name[..keep]);
        } else {
            field[..name.len()].copy_from_slice(name);
        }
        header.set_cksum();
        self.builder.append(header, data)?;
        Ok(())
    }

    /// Stores a symlink or hard-link target verbatim on `header`.
    fn set_link_target(&mut self, header: &mut Header, target: &[u8]) -> Result<()> {
        let field = &mut header.as_old_mut().linkname;
        if target.len() > field.len() {
            let keep = field.len();
            self.append_long(EntryType::GNULongLink, target)?;
            field.copy_from_slice(&target[..keep]);
        } else {
            field[..target.len()].copy_from_slice(target);
        }
        Ok(())
    }

    /// Emits the GNU record carrying an over-long name or link target,
    /// ahead of the entry it applies to.
    fn append_long(&mut self, kind: EntryType, bytes: &[u8]) -> Result<()> {
        let mut header = Header::new_gnu();
        let marker = b"././@LongLink";
        header.as_old_mut().name[..marker.len()].copy_from_slice(marker);
        header.set_entry_type(kind);
        header.set_mode(0o644);
        header.set_size(bytes.len() as u64);
        header.set_cksum();
        self.builder.append(&header, bytes)?;
        Ok(())
    }

    /// Builds a header with the fields common to every entry kind:
    /// modification time and policy-resolved ownership.
    fn base_header(&self, meta: &Metadata) -> Header {
        let mut header = Header::new_gnu();
        header.set_mtime(meta::mtime(meta));

        let (uid, gid) = if self.include_owners {
            meta::owner_ids(meta).unwrap_or((self.defaults.uid, self.defaults.gid))
        } else {
            (self.defaults.uid, self.defaults.gid)
        };
        header.set_uid(uid);
        header.set_gid(gid);
        header
    }

    /// Resolves the mode to archive for an entry with the given fallback.
    fn mode_for(&self, meta: &Metadata, default_mode: u32) -> u32 {
        if self.include_permissions {
            meta::mode_bits(meta).unwrap_or(default_mode)
        } else {
            default_mode
        }
    }
}
