//! Character scanner for one window of a document.
//!
//! Identifier characters (`a-z`, `0-9`, `#`, `@`) accumulate into a pending
//! word. Any other character is a delimiter: it flushes the pending word and,
//! unless it is whitespace, becomes a single-character token. Before a word
//! is flushed the scanner looks one word ahead to merge two-word record names
//! (`account holder`) and `record:field` references into a single token.

use smol_str::SmolStr;
use text_size::TextSize;

use super::token::{END_KW, LexState, Token};
use crate::project::SchemaOracle;

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'#' || b == b'@'
}

/// Result of scanning a window.
#[derive(Debug)]
pub(crate) struct Scanned {
    pub tokens: Vec<Token>,
    /// State after the last token (the start state if nothing was emitted).
    pub state: LexState,
    /// An `end` keyword was seen outside strings and comments.
    pub saw_end: bool,
}

pub(crate) struct Scanner<'a> {
    /// Lower-cased window text.
    text: &'a str,
    /// Document offset of `text`.
    base: TextSize,
    oracle: &'a dyn SchemaOracle,
    state: LexState,
    saw_end: bool,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(
        text: &'a str,
        base: TextSize,
        state: LexState,
        oracle: &'a dyn SchemaOracle,
    ) -> Self {
        Self {
            text,
            base,
            oracle,
            state,
            saw_end: false,
            tokens: Vec::new(),
        }
    }

    pub fn scan(mut self) -> Scanned {
        let text = self.text;
        let bytes = text.as_bytes();
        let len = bytes.len();
        let mut word_start: Option<usize> = None;
        let mut i = 0;

        while i < len {
            if is_ident_byte(bytes[i]) {
                word_start.get_or_insert(i);
                i += 1;
                continue;
            }

            if let Some(start) = word_start.take() {
                let end = self.lookahead(start, i);
                self.emit(start, end);
                i = end;
            }

            // `i` is on a delimiter: the original one, or the one after a merge
            let delim = match text[i..].chars().next() {
                Some(c) => c,
                None => break,
            };
            if !delim.is_whitespace() && !delim.is_control() {
                self.emit(i, i + delim.len_utf8());
            }
            i += delim.len_utf8();
        }

        if let Some(start) = word_start {
            self.emit(start, len);
        }

        Scanned {
            tokens: self.tokens,
            state: self.state,
            saw_end: self.saw_end,
        }
    }

    /// End of the token that starts with the word `start..end`, after trying
    /// the record-name and field-name merges.
    fn lookahead(&self, start: usize, end: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut end = end;

        if bytes.get(end) == Some(&b' ') {
            let next = word_end(bytes, end + 1);
            if next > end + 1 && self.oracle.is_record_name(&self.text[start..next]) {
                end = next;
            }
        }

        if bytes.get(end) == Some(&b':') {
            let next = word_end(bytes, end + 1);
            if next > end + 1 && self.oracle.is_field_name(&self.text[start..next]) {
                end = next;
            }
        }

        end
    }

    fn emit(&mut self, start: usize, end: usize) {
        let text = &self.text[start..end];
        if text == END_KW && self.state.outside_string_and_comment() {
            self.saw_end = true;
        }
        let offset = self.base + TextSize::from(start as u32);
        self.tokens
            .push(Token::lex(SmolStr::from(text), offset, &mut self.state));
    }
}

/// End of the identifier run starting at `from`.
fn word_end(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    end
}
