//! Token classification for syntax highlighting.
//!
//! Classification is data only: each token in a range gets a [`TokenKind`]
//! and the caller decides how to paint it.

use text_size::TextRange;

use crate::lexer::TokenChain;
use crate::project::{LanguageConfig, SchemaOracle};
use crate::semantic::VariableTable;

/// Token type for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    String,
    Date,
    Keyword,
    Function,
    Record,
    Field,
    Variable,
    Plain,
}

/// A classified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub range: TextRange,
    pub kind: TokenKind,
}

/// Classifies tokens against the configuration, the schema and the known
/// variables.
pub struct Highlighter<'a> {
    config: &'a LanguageConfig,
    oracle: &'a dyn SchemaOracle,
    variables: &'a VariableTable,
}

impl<'a> Highlighter<'a> {
    pub fn new(
        config: &'a LanguageConfig,
        oracle: &'a dyn SchemaOracle,
        variables: &'a VariableTable,
    ) -> Self {
        Self {
            config,
            oracle,
            variables,
        }
    }

    /// Kind of the token at `index`.
    pub fn classify(&self, chain: &TokenChain, index: usize) -> TokenKind {
        let Some(token) = chain.get(index) else {
            return TokenKind::Plain;
        };
        let text = token.text.as_str();

        if token.in_comment() {
            TokenKind::Comment
        } else if token.in_string_before {
            TokenKind::String
        } else if token.in_date_before {
            TokenKind::Date
        } else if self.config.keywords.contains(text) {
            TokenKind::Keyword
        } else if self.config.functions.contains(text) {
            TokenKind::Function
        } else if self.is_field(chain, index) {
            TokenKind::Field
        } else if self.oracle.is_record_name(text) {
            TokenKind::Record
        } else if self.variables.contains_name(text) {
            TokenKind::Variable
        } else {
            TokenKind::Plain
        }
    }

    /// Classified tokens overlapping `range`.
    pub fn highlights(&self, chain: &TokenChain, range: TextRange) -> Vec<Highlight> {
        chain
            .indices_in(range)
            .map(|i| Highlight {
                range: chain[i].range(),
                kind: self.classify(chain, i),
            })
            .collect()
    }

    /// A merged `record:field` token, or the field after `record` `:`.
    fn is_field(&self, chain: &TokenChain, index: usize) -> bool {
        let text = chain[index].text.as_str();
        if text.contains(':') {
            return self.oracle.is_field_name(text);
        }

        let Some(colon) = chain.prev(index).filter(|&i| chain[i].text == ":") else {
            return false;
        };
        let Some(record) = chain.prev(colon).map(|i| &chain[i]) else {
            return false;
        };
        record.in_code()
            && self.oracle.is_record_name(&record.text)
            && self.oracle.is_field_name(&format!("{}:{}", record.text, text))
    }
}
