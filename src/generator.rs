//! Writing template files into the hygen generators directory.
//! An existing generator is never overwritten in place: when the new output
//! differs from what is on disk the old directory is kept as a numbered backup.

use crate::error::{Error, Result};
use crate::paths;
use crate::template::TemplateResult;
use indexmap::IndexMap;
use log::{debug, info};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of a `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The generator on disk already matches, nothing was written
    Unchanged { generator_dir: PathBuf },
    Generated {
        generator_dir: PathBuf,
        files: Vec<PathBuf>,
        /// Where the previous, different generator was moved to
        backup: Option<PathBuf>,
    },
}

/// Generator directory layout: `<target_root>/<name>/<action>/<template files>`.
pub struct Generator<'a> {
    target_root: &'a Path,
    name: &'a str,
    action: &'a str,
}

impl<'a> Generator<'a> {
    pub fn new(target_root: &'a Path, name: &'a str, action: &'a str) -> Self {
        Self { target_root, name, action }
    }

    pub fn generator_dir(&self) -> PathBuf {
        self.target_root.join(self.name)
    }

    /// Maps each file that would be written, relative to the generator directory,
    /// to its content.
    ///
    /// # Errors
    /// * `Error::DuplicateTemplateName` when two templates flatten to the same file name
    pub fn plan(&self, templates: &[TemplateResult]) -> Result<IndexMap<PathBuf, String>> {
        let mut planned = IndexMap::with_capacity(templates.len());
        let mut sources: HashMap<String, &str> = HashMap::with_capacity(templates.len());
        for template in templates {
            let file_name = template.file_name();
            if let Some(first) = sources.insert(file_name.clone(), &template.rel_path) {
                return Err(Error::DuplicateTemplateName {
                    first: first.to_string(),
                    second: template.rel_path.clone(),
                    file_name,
                });
            }
            planned.insert(Path::new(self.action).join(&file_name), template.contents());
        }
        Ok(planned)
    }

    /// Compares the planned files with the generator directory, file for file and
    /// count for count.
    pub fn is_unchanged(&self, planned: &IndexMap<PathBuf, String>) -> Result<bool> {
        let generator_dir = self.generator_dir();
        let mut existing = 0;
        for entry in WalkDir::new(&generator_dir).min_depth(1) {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if entry.file_type().is_dir() {
                continue;
            }
            existing += 1;
            let relative = entry.path().strip_prefix(&generator_dir).unwrap_or(entry.path());
            let Some(content) = planned.get(relative) else {
                debug!("{} would not be generated anymore", relative.display());
                return Ok(false);
            };
            if fs::read(entry.path()).map_err(Error::IoError)? != content.as_bytes() {
                debug!("{} differs", relative.display());
                return Ok(false);
            }
        }
        if existing != planned.len() {
            debug!("{} files on disk, {} planned", existing, planned.len());
            return Ok(false);
        }
        Ok(true)
    }

    /// Next unused `<name>.<n>` sibling of the generator directory.
    pub fn next_backup_dir(&self) -> Result<PathBuf> {
        let numbered = Regex::new(&format!(r"^{}\.(\d+)$", regex::escape(self.name)))?;
        let mut highest = 0u64;
        if self.target_root.is_dir() {
            for entry in fs::read_dir(self.target_root).map_err(Error::IoError)? {
                let entry = entry.map_err(Error::IoError)?;
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if let Some(n) = numbered
                    .captures(&file_name)
                    .and_then(|caps| caps[1].parse::<u64>().ok())
                {
                    highest = highest.max(n);
                }
            }
        }
        Ok(self.target_root.join(format!("{}.{}", self.name, highest + 1)))
    }

    /// Writes the generator.
    ///
    /// # Arguments
    /// * `templates` - Templates of every included file
    /// * `force` - Skip the comparison and replace an existing generator without backup
    ///
    /// # Notes
    /// A failure part way leaves the files written so far in place.
    pub fn run(&self, templates: &[TemplateResult], force: bool) -> Result<GenerateOutcome> {
        let generator_dir = self.generator_dir();
        let planned = self.plan(templates)?;
        let mut backup = None;

        if generator_dir.exists() {
            if force {
                debug!("Removing {}", generator_dir.display());
                fs::remove_dir_all(&generator_dir).map_err(Error::IoError)?;
            } else if self.is_unchanged(&planned)? {
                info!("Generator {} is unchanged", generator_dir.display());
                return Ok(GenerateOutcome::Unchanged { generator_dir });
            } else {
                let backup_dir = self.next_backup_dir()?;
                info!("Moving {} to {}", generator_dir.display(), backup_dir.display());
                fs::rename(&generator_dir, &backup_dir).map_err(Error::IoError)?;
                backup = Some(backup_dir);
            }
        }

        let mut files = Vec::with_capacity(planned.len());
        for (relative, content) in planned {
            let target = generator_dir.join(relative);
            paths::write_atomic(&target, &content)?;
            files.push(target);
        }

        Ok(GenerateOutcome::Generated { generator_dir, files, backup })
    }
}
