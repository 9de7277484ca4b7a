//! Template synthesis for a single included file.
//! Combines the substituted file body with the frontmatter header declaring where
//! hygen should write the generated file.

use crate::constants::{BINARY_MARKER, FLATTEN_CHAR, TEMPLATE_SUFFIX};
use crate::error::Result;
use crate::paths;
use crate::substitution::{ReplacementRecord, Substitutor};
use crate::word_forms::WordFormPattern;
use log::debug;
use std::path::{Path, PathBuf};

/// Returns the template file name for a session key.
///
/// # Example
/// ```
/// use stamp::template::template_file_name;
///
/// assert_eq!(template_file_name("src/inner/file1.txt"), "src_inner_file1.txt.ejs.t");
/// ```
pub fn template_file_name(rel_path: &str) -> String {
    let flattened: String =
        rel_path.chars().map(|c| if c == '/' || c == '\\' { FLATTEN_CHAR } else { c }).collect();
    format!("{flattened}{TEMPLATE_SUFFIX}")
}

/// Builds the three line frontmatter block.
pub fn destination_header(destination: &str) -> String {
    format!("---\nto: {destination}\n---\n")
}

/// Everything known about the template of one included file.
///
/// Computed on demand from the session, never persisted.
#[derive(Debug, Clone)]
pub struct TemplateResult {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub subject_word: Option<String>,
    pub generate_parent_dir: bool,
    /// Destination path written after `to:`, possibly holding template expressions
    pub destination: String,
    pub header: String,
    pub replacements: Vec<ReplacementRecord>,
    pub is_binary: bool,
    body: String,
}

impl TemplateResult {
    /// Reads the file at `base_dir/rel_path` and templatizes both its path and its
    /// content.
    ///
    /// # Arguments
    /// * `base_dir` - Session base directory
    /// * `rel_path` - Session key of the file
    /// * `pattern` - Subject word pattern, `None` when no subject word is set
    /// * `variable` - Runtime variable named by the template expressions
    /// * `generate_parent_dir` - Nest the destination under a directory named after the variable
    pub fn compute(
        base_dir: &Path,
        rel_path: &str,
        pattern: Option<&WordFormPattern>,
        variable: &str,
        generate_parent_dir: bool,
    ) -> Result<Self> {
        let abs_path = paths::normalize(base_dir.join(rel_path));
        let substitutor = Substitutor::new(pattern, variable);

        let mut destination = substitutor.substitute(rel_path);
        if generate_parent_dir {
            destination = format!("<%= {variable} %>/{destination}");
        }
        let header = destination_header(&destination);

        let is_binary = paths::is_binary(&abs_path)?;
        let (body, replacements) = if is_binary {
            debug!("{} is binary, not templatized", rel_path);
            (format!("{BINARY_MARKER}\n"), Vec::new())
        } else {
            substitutor.substitute_text(&paths::read_text(&abs_path)?)
        };

        Ok(Self {
            rel_path: rel_path.to_string(),
            abs_path,
            subject_word: pattern.map(|p| p.word().to_string()),
            generate_parent_dir,
            destination,
            header,
            replacements,
            is_binary,
            body,
        })
    }

    pub fn file_name(&self) -> String {
        template_file_name(&self.rel_path)
    }

    /// Number of content lines changed by the substitution.
    pub fn replacement_count(&self) -> usize {
        self.replacements.len()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Full text of the template file: header followed by the body.
    pub fn contents(&self) -> String {
        format!("{}{}", self.header, self.body)
    }
}
