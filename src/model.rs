//! Session lifecycle and file set management.
//! `SessionModel` is owned by the caller and holds the only copy of the session
//! state; every operation goes through it. Two processes editing the same session
//! file race, the last writer wins.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::generator::{GenerateOutcome, Generator};
use crate::ignore::parse_ignore_file;
use crate::paths;
use crate::prompt::Prompter;
use crate::session::{parse_session, Inclusion, Session};
use crate::template::TemplateResult;
use crate::word_forms::WordFormPattern;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// What `add` did with one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyIncluded,
    /// Binary files are never included
    SkippedBinary,
    /// Matched an ignore pattern, or lies under the generators root, while
    /// expanding a directory
    Ignored,
}

/// What `remove` did with one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotIncluded,
}

/// How far `add` descends into a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Direct children only, sub-directories are skipped
    Shallow,
    Recursive,
}

impl From<bool> for Depth {
    fn from(recursive: bool) -> Self {
        if recursive {
            Depth::Recursive
        } else {
            Depth::Shallow
        }
    }
}

pub struct SessionModel {
    settings: Settings,
    base_dir: Option<PathBuf>,
    session_path: Option<PathBuf>,
    session: Option<Session>,
    /// Serialized form of the session as loaded, `None` when never saved
    baseline: Option<String>,
}

impl SessionModel {
    pub fn new(settings: Settings) -> Self {
        Self { settings, base_dir: None, session_path: None, session: None, baseline: None }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn session_path(&self) -> Option<&Path> {
        self.session_path.as_deref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Loads the session for `path`.
    ///
    /// A file is parsed as a session file. For a directory the session file is
    /// searched in the directory and its ancestors; when none is found the
    /// directory becomes the base directory of a future session.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether a session was loaded
    pub fn load_if_exists<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        let path = paths::absolutize(path)?;
        self.base_dir = None;
        self.session_path = None;
        self.session = None;
        self.baseline = None;

        let session_file = if path.is_file() {
            Some(path.clone())
        } else if path.is_dir() {
            path.ancestors()
                .map(|dir| dir.join(&self.settings.session_file_name))
                .find(|candidate| candidate.is_file())
        } else {
            debug!("{} does not exist, no base directory", path.display());
            return Ok(false);
        };

        let Some(session_file) = session_file else {
            debug!("No session found, base directory is {}", path.display());
            self.base_dir = Some(path);
            return Ok(false);
        };

        debug!("Loading session from {}", session_file.display());
        let content = fs::read_to_string(&session_file).map_err(Error::IoError)?;
        let session = parse_session(&content, &session_file)?;
        self.baseline = Some(session.to_json()?);
        self.base_dir = session_file.parent().map(Path::to_path_buf);
        self.session_path = Some(session_file);
        self.session = Some(session);
        Ok(true)
    }

    /// Starts a new session in the base directory.
    ///
    /// # Errors
    /// * `Error::SessionInProgress` if a session is already loaded
    /// * `Error::TryingToStartSessionWithoutPath` if no base directory is known
    pub fn start(&mut self, name: &str) -> Result<()> {
        if let Some(path) = &self.session_path {
            return Err(Error::SessionInProgress { session_file: path.display().to_string() });
        }
        let base_dir = self.base_dir.as_ref().ok_or(Error::TryingToStartSessionWithoutPath)?;
        let session_path = base_dir.join(&self.settings.session_file_name);
        let key = paths::relative_within(&session_path, base_dir)
            .unwrap_or_else(|| self.settings.session_file_name.clone());

        info!("Starting session '{}' in {}", name, base_dir.display());
        self.session = Some(Session::new(name, &key));
        self.session_path = Some(session_path);
        self.baseline = None;
        Ok(())
    }

    /// Changes the generator name.
    pub fn rename(&mut self, name: &str) -> Result<bool> {
        let session = self.session_mut()?;
        if session.name == name {
            return Ok(false);
        }
        session.name = name.to_string();
        Ok(true)
    }

    /// Drops the session and deletes its file.
    pub fn abort(&mut self) -> Result<()> {
        if self.session.is_none() {
            return Err(Error::NoSessionInProgress);
        }
        if let Some(path) = self.session_path.take() {
            if path.exists() {
                fs::remove_file(&path).map_err(Error::IoError)?;
                info!("Deleted {}", path.display());
            }
        }
        self.session = None;
        self.baseline = None;
        Ok(())
    }

    /// Asks `prompter` before aborting the session.
    ///
    /// # Returns
    /// * `Result<Option<PathBuf>>` - The deleted session file, `None` when declined
    pub fn confirm_abort<P: Prompter + ?Sized>(
        &mut self,
        prompter: &P,
        skip: bool,
    ) -> Result<Option<PathBuf>> {
        let session_path = match (&self.session, &self.session_path) {
            (Some(_), Some(path)) => path.clone(),
            _ => return Err(Error::NoSessionInProgress),
        };
        let question = format!("Delete '{}' and abort the session?", session_path.display());
        if !prompter.confirm(skip, question)? {
            debug!("Abort declined");
            return Ok(None);
        }
        self.abort()?;
        Ok(Some(session_path))
    }

    /// Includes files in the session.
    ///
    /// Directories, and links to directories, are expanded into their files, direct
    /// children only unless `depth` is `Depth::Recursive`. During expansion files
    /// matching an ignore pattern or lying under the generators root are skipped.
    ///
    /// # Errors
    /// * `Error::AddedFileMustBeUnderBaseDir` for a path outside the base directory
    /// * `Error::FileNotFound` for a path that does not exist
    pub fn add<P: AsRef<Path>>(
        &mut self,
        targets: &[P],
        depth: Depth,
    ) -> Result<Vec<(String, AddOutcome)>> {
        self.session_ref()?;
        let mut report = Vec::new();
        let mut ignored = None;
        let generators = self.generators_prefix();

        for path in targets {
            let (abs_path, key) = self.contained(path.as_ref())?;
            let metadata = fs::metadata(&abs_path)
                .map_err(|_| Error::FileNotFound { path: abs_path.display().to_string() })?;

            if !metadata.is_dir() {
                let outcome = self.add_file(&abs_path, key.clone())?;
                report.push((key, outcome));
                continue;
            }

            if ignored.is_none() {
                ignored = Some(parse_ignore_file(self.require_base_dir()?)?);
            }
            for file in paths::list_files(&abs_path, depth == Depth::Recursive)? {
                let (_, key) = self.contained(&file)?;
                let is_ignored = ignored.as_ref().is_some_and(|globs| globs.is_match(&key))
                    || generators.as_ref().is_some_and(|prefix| key.starts_with(prefix));
                let outcome = if is_ignored {
                    debug!("Ignoring {}", key);
                    AddOutcome::Ignored
                } else {
                    self.add_file(&file, key.clone())?
                };
                report.push((key, outcome));
            }
        }
        Ok(report)
    }

    fn add_file(&mut self, abs_path: &Path, key: String) -> Result<AddOutcome> {
        let binary = paths::is_binary(abs_path)?;
        let session = self.session_mut()?;
        if session.is_included(&key) {
            return Ok(AddOutcome::AlreadyIncluded);
        }
        if binary {
            warn!("Skipping binary file {}", key);
            return Ok(AddOutcome::SkippedBinary);
        }
        debug!("Adding {}", key);
        session.files_and_dirs.insert(key, Inclusion::Included);
        Ok(AddOutcome::Added)
    }

    /// Excludes files from the session. A directory excludes every included file
    /// beneath it.
    ///
    /// # Errors
    /// * `Error::AddedFileMustBeUnderBaseDir` for a path outside the base directory
    pub fn remove<P: AsRef<Path>>(
        &mut self,
        targets: &[P],
    ) -> Result<Vec<(String, RemoveOutcome)>> {
        self.session_ref()?;
        let mut report = Vec::new();

        for path in targets {
            let (_, key) = self.contained(path.as_ref())?;
            let session = self.session_mut()?;
            let prefix = if key.is_empty() { String::new() } else { format!("{key}/") };
            let matching: Vec<String> = session
                .included_paths()
                .filter(|included| *included == key || included.starts_with(&prefix))
                .map(str::to_string)
                .collect();

            if matching.is_empty() {
                report.push((key, RemoveOutcome::NotIncluded));
                continue;
            }
            for included in matching {
                debug!("Removing {}", included);
                session.files_and_dirs.insert(included.clone(), Inclusion::Excluded);
                report.push((included, RemoveOutcome::Removed));
            }
        }
        Ok(report)
    }

    /// Sets the subject word.
    ///
    /// # Returns
    /// * `Result<bool>` - `false` when the word was already in use
    pub fn use_name(&mut self, word: &str) -> Result<bool> {
        let session = self.session_mut()?;
        if session.subject_word.as_deref() == Some(word) {
            return Ok(false);
        }
        WordFormPattern::new(word)?;
        session.subject_word = Some(word.to_string());
        Ok(true)
    }

    /// Turns nesting of the generated files under a parent directory on or off.
    pub fn set_generate_parent_dir(&mut self, enabled: bool) -> Result<bool> {
        let session = self.session_mut()?;
        if session.generate_parent_directory == enabled {
            return Ok(false);
        }
        session.generate_parent_directory = enabled;
        Ok(true)
    }

    pub fn included_files(&self) -> Result<Vec<String>> {
        Ok(self.session_ref()?.included_paths().map(str::to_string).collect())
    }

    pub fn is_included<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let (_, key) = self.contained(path.as_ref())?;
        Ok(self.session_ref()?.is_included(&key))
    }

    /// Computes the template of one file, included or not.
    pub fn template_for<P: AsRef<Path>>(&self, path: P) -> Result<TemplateResult> {
        let (abs_path, key) = self.contained(path.as_ref())?;
        if !abs_path.exists() {
            return Err(Error::FileNotFound { path: abs_path.display().to_string() });
        }
        let session = self.session_ref()?;
        let pattern = self.pattern()?;
        TemplateResult::compute(
            self.require_base_dir()?,
            &key,
            pattern.as_ref(),
            &self.settings.variable,
            session.generate_parent_directory,
        )
    }

    /// Computes the templates of every included file, in session order.
    pub fn templates(&self) -> Result<Vec<TemplateResult>> {
        let session = self.session_ref()?;
        let base_dir = self.require_base_dir()?;
        let pattern = self.pattern()?;
        session
            .included_paths()
            .map(|key| {
                TemplateResult::compute(
                    base_dir,
                    key,
                    pattern.as_ref(),
                    &self.settings.variable,
                    session.generate_parent_directory,
                )
            })
            .collect()
    }

    /// Writes the generator for the included files.
    ///
    /// # Errors
    /// * `Error::NoSessionInProgress` without a session
    /// * `Error::NothingToGenerate` when no file is included
    /// * `Error::SubjectWordNotSet` / `Error::GeneratorNameNotSet` for incomplete sessions
    /// * `Error::TargetPathNotSet` when no generators root exists
    pub fn generate(&self, force: bool) -> Result<GenerateOutcome> {
        let session = self.session_ref()?;
        if session.included_paths().next().is_none() {
            return Err(Error::NothingToGenerate);
        }
        if session.subject_word.is_none() {
            return Err(Error::SubjectWordNotSet);
        }
        if session.name.trim().is_empty() {
            return Err(Error::GeneratorNameNotSet);
        }
        let target_root = self.settings.resolve_target_root(self.require_base_dir()?)?;

        let templates = self.templates()?;
        Generator::new(&target_root, &session.name, &self.settings.action).run(&templates, force)
    }

    /// Writes the session file if the session changed since it was loaded.
    ///
    /// # Returns
    /// * `Result<bool>` - Whether the file was written
    pub fn save_if_changed(&mut self) -> Result<bool> {
        let (Some(session), Some(path)) = (&self.session, &self.session_path) else {
            return Ok(false);
        };
        let json = session.to_json()?;
        if self.baseline.as_deref() == Some(json.as_str()) {
            debug!("Session unchanged, not saving");
            return Ok(false);
        }
        paths::write_atomic(path, &json)?;
        info!("Saved session to {}", path.display());
        self.baseline = Some(json);
        Ok(true)
    }

    /// Key prefix of the generators root when it lies inside the base directory.
    /// Generated templates and their numbered backups all live beneath it.
    fn generators_prefix(&self) -> Option<String> {
        let base_dir = self.base_dir.as_deref()?;
        let root = self.settings.resolve_target_root(base_dir).ok()?;
        let key = paths::relative_within(&root, base_dir).filter(|key| !key.is_empty())?;
        Some(format!("{key}/"))
    }

    fn pattern(&self) -> Result<Option<WordFormPattern>> {
        self.session_ref()?.subject_word.as_deref().map(WordFormPattern::new).transpose()
    }

    fn require_base_dir(&self) -> Result<&Path> {
        self.base_dir.as_deref().ok_or(Error::TryingToStartSessionWithoutPath)
    }

    fn session_ref(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NoSessionInProgress)
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(Error::NoSessionInProgress)
    }

    /// Resolves `path` and checks it lies at or beneath the base directory.
    fn contained(&self, path: &Path) -> Result<(PathBuf, String)> {
        let base_dir = self.require_base_dir()?;
        let abs_path = paths::absolutize(path)?;
        let key = paths::relative_within(&abs_path, base_dir).ok_or_else(|| {
            Error::AddedFileMustBeUnderBaseDir {
                path: abs_path.display().to_string(),
                base_dir: base_dir.display().to_string(),
            }
        })?;
        Ok((abs_path, key))
    }
}
