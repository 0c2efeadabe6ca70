//! Language configuration: the closed word lists the analysis consults.
//!
//! Each list is a newline-delimited file with one word per line. Lines are
//! trimmed and lower-cased; blank lines are ignored. The lists are loaded once
//! and shared immutably (usually behind an `Arc`).

use std::path::Path;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::Result;

/// File name of the base scalar type list inside a configuration directory.
pub const BASE_TYPES_FILE: &str = "types.txt";
/// File name of the keyword list inside a configuration directory.
pub const KEYWORDS_FILE: &str = "keywords.txt";
/// File name of the function list inside a configuration directory.
pub const FUNCTIONS_FILE: &str = "functions.txt";

const DEFAULT_BASE_TYPES: &[&str] = &[
    "character", "code", "date", "float", "money", "number", "rate",
];

const DEFAULT_KEYWORDS: &[&str] = &[
    "and", "call", "col", "define", "do", "each", "else", "end", "for", "header", "headers",
    "if", "newline", "not", "or", "print", "procedure", "record", "select", "setup", "sort",
    "suppressnewline", "target", "then", "title", "total", "trailer", "until", "while", "with",
];

const DEFAULT_FUNCTIONS: &[&str] = &[
    "abs", "anydate", "characterread", "coderead", "date", "dateread", "day", "format",
    "fullyear", "length", "moneyread", "month", "numberread", "rateread", "segment", "value",
    "year", "yesnoread",
];

/// A closed, case-insensitive set of words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: FxHashSet<SmolStr>,
}

impl WordList {
    /// Parse newline-delimited text.
    pub fn parse(text: &str) -> Self {
        let words = text
            .lines()
            .map(|line| line.trim().to_ascii_lowercase())
            .filter(|line| !line.is_empty())
            .map(SmolStr::from)
            .collect();
        Self { words }
    }

    /// Load a newline-delimited list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let list = Self::parse(&text);
        tracing::debug!("Loaded {} words from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn contains(&self, word: &str) -> bool {
        if word.bytes().any(|b| b.is_ascii_uppercase()) {
            self.words.contains(word.to_ascii_lowercase().as_str())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(SmolStr::as_str)
    }
}

impl<'a> FromIterator<&'a str> for WordList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|word| SmolStr::from(word.trim().to_ascii_lowercase()))
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }
}

/// Process-wide immutable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Recognized base scalar type names; a declaration whose type is one of
    /// these is a variable, anything else is a constant.
    pub base_types: WordList,
    pub keywords: WordList,
    pub functions: WordList,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            base_types: DEFAULT_BASE_TYPES.iter().copied().collect(),
            keywords: DEFAULT_KEYWORDS.iter().copied().collect(),
            functions: DEFAULT_FUNCTIONS.iter().copied().collect(),
        }
    }
}

impl LanguageConfig {
    /// Load the three word lists from a directory.
    ///
    /// A missing list falls back to the built-in default for that list; any
    /// other IO failure is returned.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            base_types: load_or(dir, BASE_TYPES_FILE, defaults.base_types)?,
            keywords: load_or(dir, KEYWORDS_FILE, defaults.keywords)?,
            functions: load_or(dir, FUNCTIONS_FILE, defaults.functions)?,
        })
    }

    /// Replace the base type list.
    pub fn with_base_types(mut self, base_types: WordList) -> Self {
        self.base_types = base_types;
        self
    }
}

fn load_or(dir: &Path, file: &str, default: WordList) -> Result<WordList> {
    let path = dir.join(file);
    if !path.is_file() {
        tracing::debug!("{} not found, using built-in list", path.display());
        return Ok(default);
    }
    WordList::load(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let list = WordList::parse("Number\n\n  money  \r\n\t\nDATE\n");
        assert_eq!(list.len(), 3);
        assert!(list.contains("number"));
        assert!(list.contains("MONEY"));
        assert!(list.contains("date"));
        assert!(!list.contains(""));
    }

    #[test]
    fn test_default_base_types() {
        let config = LanguageConfig::default();
        assert!(config.base_types.contains("number"));
        assert!(config.base_types.contains("character"));
        assert!(!config.base_types.contains("amount"));
        assert!(config.keywords.contains("define"));
        assert!(config.functions.contains("format"));
    }

    #[test]
    fn test_load_dir_with_partial_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BASE_TYPES_FILE), "amount\nnumber\n").unwrap();

        let config = LanguageConfig::load_dir(dir.path()).unwrap();
        assert!(config.base_types.contains("amount"));
        assert!(!config.base_types.contains("money"));
        // keywords.txt is missing, so the defaults apply
        assert!(config.keywords.contains("print"));
    }
}
