//! The token chain: an ordered sequence of tokens with index-based neighbors.
//!
//! Tokens do not link to each other. A token's neighbors are the tokens at
//! the adjacent indices, so splicing a window never leaves a stale link
//! behind and the chain has no ownership cycles.

use std::fmt;
use std::ops::{Index, Range, RangeBounds};

use text_size::{TextRange, TextSize};

use super::token::{LexState, Token};

/// Ordered tokens of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenChain {
    tokens: Vec<Token>,
}

impl TokenChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn insert(&mut self, index: usize, token: Token) {
        self.tokens.insert(index, token);
    }

    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) {
        self.tokens.drain(range);
    }

    /// Replace `range` with `tokens`, returning the indices the new tokens
    /// occupy.
    pub fn splice(&mut self, range: Range<usize>, tokens: Vec<Token>) -> Range<usize> {
        let start = range.start;
        let count = tokens.len();
        self.tokens.splice(range, tokens);
        start..start + count
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    /// Index of the token before `index`.
    pub fn prev(&self, index: usize) -> Option<usize> {
        index.checked_sub(1).filter(|&i| i < self.tokens.len())
    }

    /// Index of the token after `index`.
    pub fn next(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.tokens.len()).then_some(next)
    }

    /// A cursor positioned at `index`.
    pub fn cursor(&self, index: usize) -> Option<TokenCursor<'_>> {
        (index < self.tokens.len()).then_some(TokenCursor { chain: self, index })
    }

    /// Lexical state just before the token at `index` (the state after its
    /// predecessor).
    pub fn state_before(&self, index: usize) -> LexState {
        match self.prev(index) {
            Some(prev) => self.tokens[prev].state_after(),
            None => LexState::default(),
        }
    }

    /// Index of the token covering `offset`, if any.
    pub fn token_at(&self, offset: TextSize) -> Option<usize> {
        let index = self.tokens.partition_point(|t| t.end() <= offset);
        self.tokens
            .get(index)
            .filter(|t| t.start <= offset)
            .map(|_| index)
    }

    /// Indices of the tokens overlapping `range`.
    pub fn indices_in(&self, range: TextRange) -> Range<usize> {
        let first = self.tokens.partition_point(|t| t.end() <= range.start());
        let last = self.tokens.partition_point(|t| t.start < range.end());
        first..last.max(first)
    }
}

impl Index<usize> for TokenChain {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenChain {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for TokenChain {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TokenChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Sibling traversal over a chain.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    chain: &'a TokenChain,
    index: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn token(&self) -> &'a Token {
        &self.chain.tokens[self.index]
    }

    pub fn text(&self) -> &'a str {
        self.token().text.as_str()
    }

    pub fn next(&self) -> Option<Self> {
        self.chain.cursor(self.index + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index.checked_sub(1).and_then(|i| self.chain.cursor(i))
    }

    /// Text of the following token, if any.
    pub fn next_text(&self) -> Option<&'a str> {
        self.next().map(|c| c.text())
    }
}
