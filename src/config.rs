//! Runtime settings for stamp.
//! Settings come from defaults, environment variables and command line flags, in
//! increasing order of precedence. The generators root is resolved lazily since it
//! only matters to `generate`.

use crate::constants::{
    DEFAULT_ACTION, DEFAULT_VARIABLE, HYGEN_TMPLS_ENV, LOCAL_TMPLS_DIR, SESSION_FILE,
    SESSION_FILE_ENV, TMPLS_ENV,
};
use crate::error::{Error, Result};
use crate::paths;
use log::debug;
use std::path::{Path, PathBuf};

/// One place the generators root may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCandidate {
    /// Value of an environment variable, `None` when the variable is unset
    Env { var: String, value: Option<String> },
    /// Directory relative to the session base directory
    Local(PathBuf),
}

impl TargetCandidate {
    fn describe(&self) -> String {
        match self {
            TargetCandidate::Env { var, .. } => format!("${var}"),
            TargetCandidate::Local(dir) => format!("'{}'", dir.display()),
        }
    }

    fn resolve(&self, base_dir: &Path) -> Option<PathBuf> {
        let path = match self {
            TargetCandidate::Env { value: Some(value), .. } if !value.is_empty() => {
                paths::absolutize(value).ok()?
            }
            TargetCandidate::Env { .. } => return None,
            TargetCandidate::Local(dir) => paths::normalize(base_dir.join(dir)),
        };
        path.is_dir().then_some(path)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Name of the session file looked up in the project
    pub session_file_name: String,
    /// hygen action directory created under the generator
    pub action: String,
    /// Runtime variable the template expressions refer to
    pub variable: String,
    /// Generators root candidates, first existing directory wins
    pub target_candidates: Vec<TargetCandidate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_file_name: SESSION_FILE.to_string(),
            action: DEFAULT_ACTION.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
            target_candidates: vec![TargetCandidate::Local(PathBuf::from(LOCAL_TMPLS_DIR))],
        }
    }
}

impl Settings {
    /// Reads the environment on top of the defaults.
    pub fn from_env() -> Self {
        let env = |var: &str| std::env::var(var).ok();
        let mut settings = Settings::default();
        if let Some(name) = env(SESSION_FILE_ENV).filter(|n| !n.is_empty()) {
            settings.session_file_name = name;
        }
        settings.target_candidates = vec![
            TargetCandidate::Env { var: TMPLS_ENV.to_string(), value: env(TMPLS_ENV) },
            TargetCandidate::Env { var: HYGEN_TMPLS_ENV.to_string(), value: env(HYGEN_TMPLS_ENV) },
            TargetCandidate::Local(PathBuf::from(LOCAL_TMPLS_DIR)),
        ];
        settings
    }

    /// Settings writing generators into a fixed directory.
    pub fn with_target_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.target_candidates = vec![TargetCandidate::Local(dir.into())];
        self
    }

    /// Returns the first candidate naming an existing directory.
    ///
    /// # Errors
    /// * `Error::TargetPathNotSet` naming every candidate tried
    pub fn resolve_target_root(&self, base_dir: &Path) -> Result<PathBuf> {
        for candidate in &self.target_candidates {
            if let Some(root) = candidate.resolve(base_dir) {
                debug!("Generators root {} from {}", root.display(), candidate.describe());
                return Ok(root);
            }
        }
        let sources: Vec<String> =
            self.target_candidates.iter().map(TargetCandidate::describe).collect();
        Err(Error::TargetPathNotSet { sources: sources.join(", ") })
    }
}
