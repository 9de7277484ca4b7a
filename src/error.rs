//! Error handling for the stamp application.
//! Defines the error kinds and the result type used throughout the crate.

use std::io;
use thiserror::Error;

/// Every failure stamp can report.
///
/// Variants carry the data needed to explain the failure, so callers can
/// match on the kind instead of parsing messages.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation needs a session but none is loaded
    #[error("No session in progress, run 'stamp start <name>' first.")]
    NoSessionInProgress,

    /// `start` found an existing session
    #[error("A session is already in progress in '{session_file}'.")]
    SessionInProgress { session_file: String },

    /// No base directory was established by loading
    #[error("Cannot start a session before a base directory is known.")]
    TryingToStartSessionWithoutPath,

    /// `generate` was called before a subject word was chosen
    #[error("No subject word set, run 'stamp use-name <word>' first.")]
    SubjectWordNotSet,

    /// The subject word given to `use-name` was empty
    #[error("The subject word must not be empty.")]
    EmptySubjectWord,

    /// The session has a blank generator name
    #[error("The generator has no name, run 'stamp rename <name>' first.")]
    GeneratorNameNotSet,

    /// A path given to `add` or `show` does not exist
    #[error("File not found: '{path}'.")]
    FileNotFound { path: String },

    /// A path lies outside the session base directory
    #[error("'{path}' is not under the session base directory '{base_dir}'.")]
    AddedFileMustBeUnderBaseDir { path: String, base_dir: String },

    /// The session file is malformed or lacks a usable format version
    #[error("Invalid session file '{path}': {reason}.")]
    InvalidSessionFile { path: String, reason: String },

    /// The session file was written by a newer format
    #[error(
        "Session file '{path}' has format version {found}, this stamp supports up to {supported}."
    )]
    InvalidSessionFileVersion { path: String, found: String, supported: String },

    /// `generate` was called with no included files
    #[error("Nothing to generate, no files are included.")]
    NothingToGenerate,

    /// Two included files flatten to the same template file name
    #[error("'{first}' and '{second}' would both be written to template '{file_name}'.")]
    DuplicateTemplateName { file_name: String, first: String, second: String },

    /// None of the generators root candidates exists
    #[error("Cannot find a generators directory, tried: {sources}.")]
    TargetPathNotSet { sources: String },

    /// The ignore file holds an invalid pattern
    #[error("Ignore file error: {0}.")]
    IgnoreFileError(String),

    /// Reading the answer to a confirmation prompt failed
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// File system failure
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// The word-form pattern failed to compile
    #[error("Regex error: {0}.")]
    RegexError(#[from] regex::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to report
/// * `verbose` - Also print the debug representation of the error
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error, verbose: bool) {
    eprintln!("{err}");
    if verbose {
        eprintln!("{err:?}");
    }
    std::process::exit(1);
}
