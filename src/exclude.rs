//! Glob-based path exclusion.
//!
//! Callers register glob patterns; during traversal each candidate path is
//! tested before classification, so an excluded directory is never
//! descended into and an excluded file produces no header and no bytes.
//!
//! A pattern matches when it matches either the full archive-relative path
//! or just the final path component, so `"*.tmp"` drops `a/b/scratch.tmp`
//! even though the full path contains separators the single-level `*`
//! would not cross.

use std::str;

use glob::{MatchOptions, Pattern};
use log::debug;

use crate::Result;

/// Single-level wildcard semantics: `*` and `?` never cross a `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// An ordered list of exclusion patterns.
#[derive(Debug, Default, Clone)]
pub(crate) struct ExcludeList {
    patterns: Vec<Pattern>,
}

impl ExcludeList {
    /// Compiles and appends a pattern.
    ///
    /// A leading path separator is stripped, since all candidate paths are
    /// relative to the archive root.
    pub(crate) fn add(&mut self, pattern: &str) -> Result<()> {
        let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
        self.patterns.push(Pattern::new(pattern)?);
        Ok(())
    }

    /// Returns true if `rel` (a `/`-separated relative path) is excluded.
    ///
    /// Patterns are UTF-8, so a name that is not valid UTF-8 never
    /// matches one. The first pattern matching the full path or its
    /// basename short-circuits.
    pub(crate) fn matches(&self, rel: &[u8]) -> bool {
        let Ok(rel) = str::from_utf8(rel) else {
            return false;
        };
        let base = rel.rsplit('/').next().unwrap_or(rel);
        for pattern in &self.patterns {
            if pattern.matches_with(rel, MATCH_OPTIONS) || pattern.matches_with(base, MATCH_OPTIONS)
            {
                debug!("excluding {rel} from archive (pattern {pattern})");
                return true;
            }
        }
        false
    }
}
