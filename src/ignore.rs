//! File and directory ignore pattern handling.
//! Patterns apply while `add` expands a directory into its files, similar to
//! .gitignore. A file named explicitly on the command line is never ignored.

use crate::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Reads the ignore file from the base directory and compiles it together with
/// the default patterns.
///
/// # Arguments
/// * `base_dir` - Session base directory holding the optional `.stampignore`
///
/// # Returns
/// * `Result<GlobSet>` - Compiled patterns, matched against session keys
///
/// # Notes
/// - If the ignore file doesn't exist, only the default patterns are used
/// - Blank lines and lines starting with `#` are skipped
/// - Invalid patterns result in an `IgnoreFileError`
pub fn parse_ignore_file<P: AsRef<Path>>(base_dir: P) -> Result<GlobSet> {
    let ignore_path = base_dir.as_ref().join(IGNORE_FILE);
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(Glob::new(pattern).map_err(|e| Error::IgnoreFileError(e.to_string()))?);
    }

    if let Ok(contents) = read_to_string(&ignore_path) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(Glob::new(line).map_err(|e| {
                Error::IgnoreFileError(format!("{} loading failed: {}", IGNORE_FILE, e))
            })?);
        }
    } else {
        debug!("{} does not exist", ignore_path.display());
    }

    builder
        .build()
        .map_err(|e| Error::IgnoreFileError(format!("{} loading failed: {}", IGNORE_FILE, e)))
}
