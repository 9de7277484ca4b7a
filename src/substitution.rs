//! Line by line replacement of the subject word with template expressions.

use crate::constants::{ESCAPED_OPEN_DELIMITER, OPEN_DELIMITER};
use crate::word_forms::WordFormPattern;
use regex::Captures;

/// A line that differs between the source file and its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRecord {
    /// 1-based line number in the source file
    pub line_number: usize,
    pub original_text: String,
    pub replaced_text: String,
}

/// Escapes the EJS open delimiters already present in `line` so they render as
/// literal text.
pub fn escape_delimiters(line: &str) -> String {
    line.replace(OPEN_DELIMITER, ESCAPED_OPEN_DELIMITER)
}

/// Applies the word form pattern to a line of text.
pub struct Substitutor<'a> {
    pattern: Option<&'a WordFormPattern>,
    variable: &'a str,
}

impl<'a> Substitutor<'a> {
    /// Without a pattern only delimiter escaping takes place.
    pub fn new(pattern: Option<&'a WordFormPattern>, variable: &'a str) -> Self {
        Self { pattern, variable }
    }

    /// Returns the templatized form of `line`.
    pub fn substitute(&self, line: &str) -> String {
        let escaped = escape_delimiters(line);
        let Some(pattern) = self.pattern else {
            return escaped;
        };
        pattern
            .regex()
            .replace_all(&escaped, |caps: &Captures<'_>| {
                let boundary = caps.get(1).map_or("", |m| m.as_str());
                match pattern.matched_form(caps) {
                    Some(form) => {
                        format!("{}<%= {} %>", boundary, form.expression(self.variable))
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Templatizes one line, returning `None` when the line comes out unchanged.
    pub fn substitute_line(&self, line_number: usize, line: &str) -> Option<ReplacementRecord> {
        let replaced = self.substitute(line);
        if replaced == line {
            return None;
        }
        Some(ReplacementRecord {
            line_number,
            original_text: line.to_string(),
            replaced_text: replaced,
        })
    }

    /// Templatizes a whole text, line by line. Line endings are preserved.
    pub fn substitute_text(&self, text: &str) -> (String, Vec<ReplacementRecord>) {
        let mut lines = Vec::new();
        let mut records = Vec::new();
        for (index, line) in text.split('\n').enumerate() {
            match self.substitute_line(index + 1, line) {
                Some(record) => {
                    lines.push(record.replaced_text.clone());
                    records.push(record);
                }
                None => lines.push(line.to_string()),
            }
        }
        (lines.join("\n"), records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_delimiters() {
        assert_eq!(escape_delimiters("<% x %>"), "<%% x %>");
        assert_eq!(escape_delimiters("no delimiters"), "no delimiters");
    }

    #[test]
    fn test_substitute_text_keeps_trailing_newline() {
        let pattern = WordFormPattern::new("word").unwrap();
        let substitutor = Substitutor::new(Some(&pattern), "name");
        let (text, records) = substitutor.substitute_text("a word\nnothing\n");
        assert_eq!(text, "a <%= name %>\nnothing\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number, 1);
    }
}
