//! Command-line interface implementation for stamp.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments structure for stamp.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "stamp: turn an existing project into a hygen generator",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session file name, looked up in the current directory and its parents
    #[arg(long, value_name = "FILE", global = true)]
    pub session_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a session for a new generator
    Start {
        /// Name of the generator
        name: String,
    },
    /// Rename the generator
    Rename {
        /// New name of the generator
        name: String,
    },
    /// Abort the session and delete the session file
    Abort {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Include files or directories in the generator
    Add {
        /// Descend into sub-directories
        #[arg(short, long)]
        recursive: bool,
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Exclude files or directories from the generator
    Remove {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Set the word replaced by the generator's name
    UseName {
        word: String,
    },
    /// Nest the generated files under a directory named after the generator's argument
    ParentDir {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Show the session status
    Status,
    /// Preview the templates of included files
    Show {
        /// Files to preview, all included files when empty
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Write the generator
    Generate {
        /// Replace an existing generator without comparing or keeping a backup
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument
                || e.kind() == ErrorKind::MissingSubcommand
            {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
