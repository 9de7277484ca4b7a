//! Session data model and its JSON representation.
//! A session records which files of a project are included in the generator, the
//! subject word and the generation options. Older session formats are accepted
//! and upgraded in memory right after parsing.

use crate::constants::{
    FORMAT_VERSION, OLDEST_FORMAT_MINOR, SESSION_ABOUT, SUPPORTED_MAJOR, SUPPORTED_MINOR,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Whether a path takes part in generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    Included,
    Excluded,
}

/// Three part session format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FormatVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl FormatVersion {
    /// Version written by this build.
    pub fn current() -> Self {
        Self { major: SUPPORTED_MAJOR, minor: SUPPORTED_MINOR, patch: 0 }
    }

    /// Whether this build can read a session written with this version.
    pub fn is_supported(&self) -> bool {
        match self.major.cmp(&SUPPORTED_MAJOR) {
            Ordering::Less => true,
            Ordering::Equal => self.minor <= SUPPORTED_MINOR,
            Ordering::Greater => false,
        }
    }
}

impl FromStr for FormatVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u64>().map_err(|e| format!("'{s}': {e}")))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [major, minor, patch] => Ok(Self { major: *major, minor: *minor, patch: *patch }),
            _ => Err(format!("'{s}' is not of the form major.minor.patch")),
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Persisted state of one templatization effort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub about: String,
    pub format_version: String,
    pub name: String,
    pub files_and_dirs: IndexMap<String, Inclusion>,
    pub subject_word: Option<String>,
    pub generate_parent_directory: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub extra: Value,
    /// Top level keys this build does not know about, written back untouched
    #[serde(flatten)]
    pub unknown: IndexMap<String, Value>,
}

impl Session {
    /// Creates a session that includes only its own session file.
    pub fn new(name: &str, session_file_key: &str) -> Self {
        let mut files_and_dirs = IndexMap::new();
        files_and_dirs.insert(session_file_key.to_string(), Inclusion::Included);
        Self {
            about: SESSION_ABOUT.to_string(),
            format_version: FORMAT_VERSION.to_string(),
            name: name.to_string(),
            files_and_dirs,
            subject_word: None,
            generate_parent_directory: false,
            extra: Value::Null,
            unknown: IndexMap::new(),
        }
    }

    /// Missing keys count as excluded.
    pub fn inclusion(&self, key: &str) -> Inclusion {
        self.files_and_dirs.get(key).copied().unwrap_or(Inclusion::Excluded)
    }

    pub fn is_included(&self, key: &str) -> bool {
        self.inclusion(key) == Inclusion::Included
    }

    pub fn included_paths(&self) -> impl Iterator<Item = &str> {
        self.files_and_dirs
            .iter()
            .filter(|(_, inclusion)| **inclusion == Inclusion::Included)
            .map(|(key, _)| key.as_str())
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInclusion {
    Flag(bool),
    State(Inclusion),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFiles {
    /// 0.1.x: plain list of included paths
    List(Vec<String>),
    Map(IndexMap<String, RawInclusion>),
}

impl Default for RawFiles {
    fn default() -> Self {
        RawFiles::Map(IndexMap::new())
    }
}

/// Session as found on disk, before validation and upgrade.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSession {
    #[serde(default)]
    about: String,
    #[serde(default)]
    format_version: Option<Value>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    files_and_dirs: RawFiles,
    #[serde(default)]
    subject_word: Option<String>,
    #[serde(default)]
    generate_parent_directory: bool,
    #[serde(default)]
    extra: Value,
    #[serde(flatten)]
    unknown: IndexMap<String, Value>,
}

/// Parses and validates the content of a session file, upgrading older formats.
///
/// # Arguments
/// * `content` - Raw JSON text
/// * `path` - Location of the file, used in error messages
///
/// # Errors
/// * `Error::InvalidSessionFile` if the JSON is malformed or the version is missing or unparseable
/// * `Error::InvalidSessionFileVersion` if the file was written by a newer format
pub fn parse_session(content: &str, path: &Path) -> Result<Session> {
    let invalid = |reason: String| Error::InvalidSessionFile {
        path: path.display().to_string(),
        reason,
    };

    let raw: RawSession = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
    let version_text = raw
        .format_version
        .as_ref()
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing formatVersion".to_string()))?;
    let version: FormatVersion =
        version_text.parse().map_err(|e| invalid(format!("invalid formatVersion {e}")))?;

    if !version.is_supported() {
        return Err(Error::InvalidSessionFileVersion {
            path: path.display().to_string(),
            found: version.to_string(),
            supported: FormatVersion::current().to_string(),
        });
    }

    Ok(upgrade(raw, version))
}

/// Brings a parsed session written with `from` up to the current format.
fn upgrade(raw: RawSession, from: FormatVersion) -> Session {
    let files_and_dirs = match raw.files_and_dirs {
        RawFiles::List(paths) => paths.into_iter().map(|p| (p, Inclusion::Included)).collect(),
        RawFiles::Map(map) => map
            .into_iter()
            .map(|(path, inclusion)| {
                let inclusion = match inclusion {
                    RawInclusion::Flag(true) => Inclusion::Included,
                    RawInclusion::Flag(false) => Inclusion::Excluded,
                    RawInclusion::State(state) => state,
                };
                (path, inclusion)
            })
            .collect(),
    };

    // the oldest format always nested generated files under a parent directory
    let oldest = from.major == 0 && from.minor <= OLDEST_FORMAT_MINOR;

    Session {
        about: raw.about,
        format_version: FORMAT_VERSION.to_string(),
        name: raw.name,
        files_and_dirs,
        subject_word: raw.subject_word.filter(|w| !w.is_empty()),
        generate_parent_directory: raw.generate_parent_directory || oldest,
        extra: raw.extra,
        unknown: raw.unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version_parse() {
        let v: FormatVersion = "1.22.3".parse().unwrap();
        assert_eq!(v, FormatVersion { major: 1, minor: 22, patch: 3 });
        assert!("1.2".parse::<FormatVersion>().is_err());
        assert!("a.b.c".parse::<FormatVersion>().is_err());
        assert!("1.2.3.4".parse::<FormatVersion>().is_err());
    }

    #[test]
    fn test_current_version_matches_constant() {
        assert_eq!(FormatVersion::current().to_string(), FORMAT_VERSION);
    }

    #[test]
    fn test_missing_key_is_excluded() {
        let session = Session::new("gen", "stamp.json");
        assert_eq!(session.inclusion("stamp.json"), Inclusion::Included);
        assert_eq!(session.inclusion("other.txt"), Inclusion::Excluded);
    }
}
