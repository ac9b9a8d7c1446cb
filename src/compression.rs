//! Compression mode selection for the archive byte stream.
//!
//! The archiver writes tar data through an optional compressing transform.
//! [`Compression`] names the supported framings; [`CompressedWriter`] is the
//! write-side decorator the archiver wraps around its sink. Only `None` and
//! `Gzip` can be produced: `Bzip2` is unsupported for writing and `Detect`
//! is a read-side concept, so both are rejected before any byte reaches the
//! sink.

use std::fmt;
use std::io::{self, Write};

use flate2::write::GzEncoder;

use crate::{Error, Result};

/// How the archive byte stream is framed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Compression {
    /// Raw tar stream, no compression.
    #[default]
    None,
    /// Gzip-compressed tar stream.
    Gzip,
    /// Bzip2-compressed tar stream. Not supported for writing.
    Bzip2,
    /// Sniff the framing from the stream contents. Only meaningful when
    /// reading an archive; invalid for writing.
    Detect,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Gzip => write!(f, "gzip"),
            Self::Bzip2 => write!(f, "bzip2"),
            Self::Detect => write!(f, "detect"),
        }
    }
}

/// Write-side sink decorator selected by a [`Compression`] mode.
///
/// Wraps the caller's sink either transparently or in a [`GzEncoder`]. The
/// tar encoder writes through this; [`CompressedWriter::finish`] flushes
/// the compressor trailer after the encoder has written its end-of-archive
/// markers.
pub(crate) enum CompressedWriter<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    /// Decorates `sink` according to `compression`.
    ///
    /// Fails without touching the sink for modes that cannot be written.
    pub(crate) fn for_writing(compression: Compression, sink: W) -> Result<Self> {
        match compression {
            Compression::None => Ok(Self::Plain(sink)),
            Compression::Gzip => Ok(Self::Gzip(GzEncoder::new(
                sink,
                flate2::Compression::default(),
            ))),
            Compression::Bzip2 => Err(Error::UnsupportedCompression(Compression::Bzip2)),
            Compression::Detect => Err(Error::InvalidCompression(Compression::Detect)),
            #[allow(unreachable_patterns)]
            other => Err(Error::UnsupportedCompression(other)),
        }
    }

    /// Finishes the compression framing and returns the inner sink.
    pub(crate) fn finish(self) -> Result<W> {
        match self {
            Self::Plain(mut sink) => {
                sink.flush()?;
                Ok(sink)
            }
            Self::Gzip(encoder) => Ok(encoder.finish()?),
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(sink) => sink.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(sink) => sink.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}
