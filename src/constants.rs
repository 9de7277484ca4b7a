//! Common constants used throughout the stamp application.

/// Default session file name, looked up in the project directory and its ancestors
pub const SESSION_FILE: &str = "stamp.json";

/// Format version written into every saved session file
pub const FORMAT_VERSION: &str = "0.3.0";

/// Highest session format major version this build understands
pub const SUPPORTED_MAJOR: u64 = 0;

/// Highest session format minor version this build understands
pub const SUPPORTED_MINOR: u64 = 3;

/// Oldest known session format; loading it turns on parent directory generation
pub const OLDEST_FORMAT_MINOR: u64 = 1;

/// Informational text stored in the `about` field of new sessions
pub const SESSION_ABOUT: &str =
    "This file is used by stamp to turn this project into a hygen generator.";

/// Tool specific environment variable naming the generators root
pub const TMPLS_ENV: &str = "STAMP_TMPLS";

/// Generic hygen environment variable naming the generators root
pub const HYGEN_TMPLS_ENV: &str = "HYGEN_TMPLS";

/// Environment variable overriding the session file name
pub const SESSION_FILE_ENV: &str = "STAMP_SESSION_FILE";

/// Conventional generators directory, relative to the project base directory
pub const LOCAL_TMPLS_DIR: &str = "_templates";

/// hygen action directory the template files are written to
pub const DEFAULT_ACTION: &str = "new";

/// Runtime variable the template expressions refer to
pub const DEFAULT_VARIABLE: &str = "name";

/// Suffix appended to every generated template file
pub const TEMPLATE_SUFFIX: &str = ".ejs.t";

/// Character replacing path separators in template file names
pub const FLATTEN_CHAR: char = '_';

/// EJS open delimiter
pub const OPEN_DELIMITER: &str = "<%";

/// EJS escaped open delimiter, renders as a literal `<%`
pub const ESCAPED_OPEN_DELIMITER: &str = "<%%";

/// Body written in place of the content of binary files
pub const BINARY_MARKER: &str = "<binary file, not templatized>";

/// Ignore file read from the project base directory
pub const IGNORE_FILE: &str = ".stampignore";

/// Patterns ignored while expanding directories, even without an ignore file
pub const DEFAULT_IGNORE_PATTERNS: [&str; 3] =
    ["**/.git/**", "**/.DS_Store", "**/node_modules/**"];
