//! # tarwalk
//!
//! A streaming tar archiver for directory trees.
//!
//! `tarwalk` walks a filesystem subtree and emits a single tar stream that
//! faithfully reproduces the tree's structure: hard links become link
//! entries referencing the first archived occurrence, symlink targets are
//! rewritten relative when they stay inside the archived root, and device
//! nodes carry their major/minor numbers. Permissions and ownership are
//! copied or masked according to policy, paths can be excluded with glob
//! patterns, and a virtual path prefix can relocate the whole tree inside
//! the archive. Sockets and unrecognized objects are skipped rather than
//! corrupting the stream.
//!
//! The low-level tar entry encoding is delegated to the `tar` crate and
//! gzip framing to `flate2`; this crate supplies the traversal, the
//! filesystem-to-entry mapping, and the policies in between.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tarwalk::{Archiver, Compression, Result};
//!
//! fn main() -> Result<()> {
//!     let out = std::fs::File::create("build.tar.gz")?;
//!     Archiver::new(out, "/tmp/build")
//!         .compression(Compression::Gzip)
//!         .run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Relocating and filtering
//!
//! ```rust,no_run
//! use tarwalk::{Archiver, Result};
//!
//! fn main() -> Result<()> {
//!     let mut out = Vec::new();
//!     // /tmp/build/bin/foo is archived as ./var/lib/build/bin/foo;
//!     // editor droppings never make it in.
//!     Archiver::new(&mut out, "/tmp/build")
//!         .virtual_path("var/lib/build")
//!         .exclude("*.swp")?
//!         .exclude("*.tmp")?
//!         .run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Ownership and permissions
//!
//! By default on-disk permission bits are preserved and ownership is
//! masked to the placeholder ids (500/500), so archives do not embed
//! host-specific identities. Both policies are independent switches:
//!
//! ```rust,no_run
//! use tarwalk::{Archiver, Result};
//!
//! fn main() -> Result<()> {
//!     let mut out = Vec::new();
//!     Archiver::new(&mut out, "/srv/data")
//!         .include_permissions(false) // force 0755 dirs / 0644 files
//!         .include_owners(true)       // keep real uid/gid
//!         .run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! Any filesystem or encoder failure aborts the run as a whole. The
//! archive prefix already written to the sink is not retracted; treat the
//! stream as invalid when [`Archiver::run`] returns an error.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod archive_path;
pub mod archiver;
pub mod compression;
pub mod entry;
pub mod error;
pub mod hardlink;
pub mod meta;

mod exclude;
mod symlink;

pub use archiver::Archiver;
pub use compression::Compression;
pub use entry::{EntryDefaults, EntryKind};
pub use error::{Error, Result};
pub use hardlink::HardLinkTracker;
pub use meta::FileId;
