//! Path helpers shared by the session model and the generator.
//! All paths handled by stamp are absolute and lexically normalized; session keys
//! are forward-slash separated paths relative to the session base directory.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Number of leading bytes inspected when sniffing for binary content.
const SNIFF_LEN: usize = 8192;

/// Removes `.` and resolves `..` components without touching the file system.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Turns a possibly relative path into a normalized absolute one, relative paths
/// being resolved against the current working directory.
pub fn absolutize<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        let cwd = std::env::current_dir().map_err(Error::IoError)?;
        Ok(normalize(cwd.join(path)))
    }
}

/// Returns `path` relative to `base` as a forward-slash key, or `None` when `path`
/// is not located at or beneath `base`. The base directory itself maps to `""`.
pub fn relative_within(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Sniffs the beginning of a file for NUL bytes.
pub fn is_binary(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let mut buf = Vec::with_capacity(SNIFF_LEN);
    fs::File::open(path)
        .and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut buf))
        .map_err(Error::IoError)?;
    Ok(buf.contains(&0))
}

/// Lists the regular files inside `dir`, sorted by name. Symlinks are listed
/// when they resolve to a regular file; links to directories are not followed.
///
/// With `recursive` unset only the direct children are visited, sub-directories
/// are skipped entirely.
pub fn list_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path_is_symlink() && !entry.path().is_file() {
            debug!("Not following link {}", entry.path().display());
            continue;
        }
        files.push(normalize(entry.path()));
    }
    Ok(files)
}

/// Reads a file as text. Invalid UTF-8 sequences are replaced, with a warning.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(Error::IoError)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("{} is not valid UTF-8, invalid sequences are replaced", path.display());
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Writes `content` through a temporary sibling file and renames it into place,
/// creating parent directories as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, content).map_err(Error::IoError)?;
    fs::rename(&tmp_path, path).map_err(Error::IoError)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
