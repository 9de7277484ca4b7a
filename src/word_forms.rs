//! Lexical forms of the subject word and the pattern recognizing them.

use crate::error::{Error, Result};
use cruet::Inflector;
use regex::Regex;

/// One lexical form the subject word can take in source text.
///
/// The declaration order is the matching precedence: when two forms match at the
/// same position the earlier one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordForm {
    Upper,
    Lower,
    Capitalized,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Dash,
    Title,
}

impl WordForm {
    pub const ALL: [WordForm; 9] = [
        WordForm::Upper,
        WordForm::Lower,
        WordForm::Capitalized,
        WordForm::Camel,
        WordForm::Pascal,
        WordForm::Snake,
        WordForm::ScreamingSnake,
        WordForm::Dash,
        WordForm::Title,
    ];

    /// Renders `word` in this form.
    pub fn apply(self, word: &str) -> String {
        match self {
            WordForm::Upper => word.to_uppercase(),
            WordForm::Lower => word.to_lowercase(),
            WordForm::Capitalized => capitalize(word),
            WordForm::Camel => word.to_camel_case(),
            WordForm::Pascal => word.to_pascal_case(),
            WordForm::Snake => word.to_snake_case(),
            WordForm::ScreamingSnake => word.to_screaming_snake_case(),
            WordForm::Dash => word.to_kebab_case(),
            WordForm::Title => word.to_title_case(),
        }
    }

    /// Template expression producing this form from the runtime variable.
    pub fn expression(self, variable: &str) -> String {
        match self {
            WordForm::Upper => format!("{variable}.toUpperCase()"),
            WordForm::Lower => variable.to_string(),
            WordForm::Capitalized => format!("h.capitalize({variable})"),
            WordForm::Camel => format!("h.inflection.camelize({variable}, true)"),
            WordForm::Pascal => format!("h.inflection.camelize({variable})"),
            WordForm::Snake => format!("h.inflection.underscore({variable})"),
            WordForm::ScreamingSnake => {
                format!("h.inflection.underscore({variable}).toUpperCase()")
            }
            WordForm::Dash => {
                format!("h.inflection.dasherize(h.inflection.underscore({variable}))")
            }
            WordForm::Title => format!("h.inflection.titleize({variable})"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Compiled alternation over every form of one subject word.
///
/// Group 1 captures the boundary character before the match (empty at the start
/// of a line). Group `i + 2` captures the form `forms[i]`.
///
/// Only the left side of a match is bounded: `word` matches inside `words`,
/// leaving the trailing `s` untouched.
#[derive(Debug, Clone)]
pub struct WordFormPattern {
    word: String,
    regex: Regex,
    forms: Vec<WordForm>,
}

impl WordFormPattern {
    pub fn new(word: &str) -> Result<Self> {
        if word.is_empty() {
            return Err(Error::EmptySubjectWord);
        }

        let mut forms = Vec::new();
        let mut alternatives = Vec::new();
        for form in WordForm::ALL {
            let variant = form.apply(word);
            // inflections of a word made only of separators come out empty
            if variant.is_empty() {
                continue;
            }
            forms.push(form);
            alternatives.push(format!("({})", regex::escape(&variant)));
        }
        if forms.is_empty() {
            return Err(Error::EmptySubjectWord);
        }

        let regex = Regex::new(&format!("(^|[^a-zA-Z0-9])(?:{})", alternatives.join("|")))?;
        Ok(Self { word: word.to_string(), regex, forms })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn forms(&self) -> &[WordForm] {
        &self.forms
    }

    /// Returns the form that matched in `captures`.
    pub fn matched_form(&self, captures: &regex::Captures<'_>) -> Option<WordForm> {
        self.forms
            .iter()
            .enumerate()
            .find(|(i, _)| captures.get(i + 2).is_some())
            .map(|(_, form)| *form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("word"), "Word");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_forms_of_single_word() {
        assert_eq!(WordForm::Upper.apply("word"), "WORD");
        assert_eq!(WordForm::Capitalized.apply("word"), "Word");
        assert_eq!(WordForm::Lower.apply("Word"), "word");
    }
}
