//! Error types for archive creation.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when archiving a directory tree, along with a convenient
//! [`Result<T>`] type alias.
//!
//! All fallible operations in this crate return `Result<T, Error>`. Any
//! error aborts the archive run as a whole; there is no retry policy and
//! no partial-failure recovery. Bytes already written to the sink before
//! the failure are left as-is — discarding them is the caller's
//! responsibility.
//!
//! ```rust,no_run
//! use tarwalk::{Archiver, Result};
//!
//! fn archive_tree(out: &mut Vec<u8>) -> Result<()> {
//!     Archiver::new(out, "some/dir").run()?;
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;

use crate::Compression;

/// The main error type for archive creation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error from the entry encoder or the output sink.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A filesystem read failed (stat, readdir, readlink, or open) on a
    /// visited object.
    #[error("failed to read {path}: {source}")]
    Fs {
        /// Path of the object that could not be read.
        path: PathBuf,
        /// The underlying filesystem error.
        source: io::Error,
    },

    /// The requested compression mode cannot be produced on the write side.
    #[error("{0} compression is not supported")]
    UnsupportedCompression(Compression),

    /// The compression mode is a read-side concept and is invalid for
    /// writing (e.g. [`Compression::Detect`]).
    #[error("{0} is not a valid compression type for writing")]
    InvalidCompression(Compression),

    /// An exclusion pattern failed to parse as a glob expression.
    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Attaches a path to an `io::Error` from a filesystem read.
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Fs {
            path: path.into(),
            source,
        }
    }
}

/// A specialized `Result` type for archive operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
