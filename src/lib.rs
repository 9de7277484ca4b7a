//! stamp turns an existing project into a hygen generator.
//! It records which files of the project belong to the generator, replaces every
//! form of one chosen word with template expressions and writes the resulting
//! template files, keeping earlier generations as numbered backups.

/// Command-line interface module for the stamp application
pub mod cli;

/// Runtime settings: session file name, generators root resolution
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling for the stamp application
pub mod error;

/// Generator output, comparison with previous output and numbered backups
pub mod generator;

/// File and directory ignore patterns
/// Processes .stampignore files to exclude paths while adding directories
pub mod ignore;

/// Logger initialization
pub mod logger;

/// Session lifecycle and file set operations
pub mod model;

/// Absolute path handling, binary detection and atomic writes
pub mod paths;

/// User confirmation prompts
pub mod prompt;

/// Session data model, persistence format and version upgrades
pub mod session;

/// Line substitution of the subject word
pub mod substitution;

/// Template file synthesis
pub mod template;

/// Subject word forms and the pattern matching them
pub mod word_forms;
