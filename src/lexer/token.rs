//! Tokens and the lexical state that flows between them.

use std::fmt;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

pub const DEFINE_KW: &str = "define";
pub const END_KW: &str = "end";
pub const INCLUDE_KW: &str = "#include";

/// Lexical state between two tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LexState {
    pub in_string: bool,
    pub comment_depth: u32,
    pub in_date: bool,
    pub in_define: bool,
}

impl LexState {
    /// Outside of any string and comment, where keywords and dates count.
    /// An open date does not matter here.
    pub fn outside_string_and_comment(&self) -> bool {
        !self.in_string && self.comment_depth == 0
    }
}

/// A lexical unit of a report source.
///
/// The `*_before` flags describe the region the unit itself belongs to and
/// the `*_after` flags the region that follows it. Delimiters belong to the
/// region they open or close, so both quotes of `"abc"` report
/// `in_string_before`, and both brackets of `[abc]` report a depth of 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Lower-cased text.
    pub text: SmolStr,
    pub start: TextSize,
    pub comment_depth_before: u32,
    pub comment_depth_after: u32,
    pub in_string_before: bool,
    pub in_string_after: bool,
    pub in_date_before: bool,
    pub in_date_after: bool,
    /// Define state after this unit: `define` itself is inside, `end` is not.
    pub in_define: bool,
}

impl Token {
    /// Lex `text` starting at `start` with the incoming `state`, advancing
    /// the state past it.
    pub fn lex(text: SmolStr, start: TextSize, state: &mut LexState) -> Self {
        let mut token = Self {
            text,
            start,
            comment_depth_before: 0,
            comment_depth_after: 0,
            in_string_before: false,
            in_string_after: false,
            in_date_before: false,
            in_date_after: false,
            in_define: false,
        };
        token.relex(state);
        token
    }

    /// Recompute this token's flags from the incoming `state`, advancing the
    /// state past it. Text and position are untouched.
    pub fn relex(&mut self, state: &mut LexState) {
        let before = *state;
        match self.text.as_str() {
            "\"" if state.comment_depth == 0 => {
                state.in_string = !state.in_string;
                self.set_flags(before, *state);
                self.in_string_before = true;
            }
            "[" if !state.in_string => {
                state.comment_depth += 1;
                self.set_flags(*state, *state);
            }
            "]" if !state.in_string => {
                state.comment_depth = state.comment_depth.saturating_sub(1);
                self.set_flags(*state, *state);
                self.comment_depth_before = state.comment_depth + 1;
            }
            "'" if state.outside_string_and_comment() => {
                state.in_date = !state.in_date;
                self.set_flags(before, *state);
                self.in_date_before = true;
            }
            DEFINE_KW if state.outside_string_and_comment() => {
                state.in_define = true;
                self.set_flags(*state, *state);
            }
            END_KW if state.outside_string_and_comment() => {
                state.in_define = false;
                self.set_flags(*state, *state);
            }
            _ => self.set_flags(before, before),
        }
    }

    fn set_flags(&mut self, before: LexState, after: LexState) {
        self.comment_depth_before = before.comment_depth;
        self.comment_depth_after = after.comment_depth;
        self.in_string_before = before.in_string;
        self.in_string_after = after.in_string;
        self.in_date_before = before.in_date;
        self.in_date_after = after.in_date;
        self.in_define = after.in_define;
    }

    pub fn end(&self) -> TextSize {
        self.start + self.len()
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(self.start, self.len())
    }

    /// The lexical state that follows this token.
    pub fn state_after(&self) -> LexState {
        LexState {
            in_string: self.in_string_after,
            comment_depth: self.comment_depth_after,
            in_date: self.in_date_after,
            in_define: self.in_define,
        }
    }

    /// In plain code: not inside a string, comment or date.
    pub fn in_code(&self) -> bool {
        !self.in_string_before && self.comment_depth_before == 0 && !self.in_date_before
    }

    pub fn in_comment(&self) -> bool {
        self.comment_depth_before > 0
    }

    /// `define`/`end` recognized as keywords (outside strings and comments).
    pub fn is_define_keyword(&self) -> bool {
        !self.in_string_before && self.comment_depth_before == 0 && self.text == DEFINE_KW
    }

    pub fn is_end_keyword(&self) -> bool {
        !self.in_string_before && self.comment_depth_before == 0 && self.text == END_KW
    }

    /// Whole-number text such as `12` or `0500`.
    pub fn is_number(&self) -> bool {
        !self.text.is_empty() && self.text.bytes().all(|b| b.is_ascii_digit())
    }

    pub(crate) fn shift(&mut self, delta: i64) {
        let moved = i64::from(u32::from(self.start)) + delta;
        self.start = TextSize::from(moved.max(0) as u32);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}({},{},{})",
            u32::from(self.start),
            self.text,
            self.comment_depth_before,
            self.in_string_before,
            self.in_define
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(words: &[&str]) -> Vec<Token> {
        let mut state = LexState::default();
        let mut offset = 0u32;
        words
            .iter()
            .map(|w| {
                let token = Token::lex(SmolStr::from(*w), offset.into(), &mut state);
                offset += w.len() as u32 + 1;
                token
            })
            .collect()
    }

    #[test]
    fn test_quotes_belong_to_the_string() {
        let tokens = lex_all(&["\"", "abc", "\"", "def"]);
        assert!(tokens[0].in_string_before && tokens[0].in_string_after);
        assert!(tokens[1].in_string_before && tokens[1].in_string_after);
        assert!(tokens[2].in_string_before && !tokens[2].in_string_after);
        assert!(!tokens[3].in_string_before);
    }

    #[test]
    fn test_unbalanced_close_bracket_is_floored() {
        let tokens = lex_all(&["]", "a"]);
        assert_eq!(tokens[0].comment_depth_before, 1);
        assert_eq!(tokens[0].comment_depth_after, 0);
        assert_eq!(tokens[1].comment_depth_before, 0);
    }

    #[test]
    fn test_define_inside_comment_is_ignored() {
        let tokens = lex_all(&["[", "define", "]", "x"]);
        assert!(!tokens[1].in_define);
        assert!(!tokens[3].in_define);
    }

    #[test]
    fn test_define_and_end() {
        let tokens = lex_all(&["define", "x", "end", "y"]);
        assert!(tokens[0].in_define);
        assert!(tokens[1].in_define);
        assert!(!tokens[2].in_define);
        assert!(!tokens[3].in_define);
        assert!(tokens[0].is_define_keyword());
        assert!(tokens[2].is_end_keyword());
    }

    #[test]
    fn test_date_not_opened_inside_string() {
        let tokens = lex_all(&["\"", "'", "\"", "'"]);
        assert!(!tokens[1].in_date_before);
        assert!(tokens[3].in_date_before && tokens[3].in_date_after);
    }

    #[test]
    fn test_open_date_is_outside_string_and_comment() {
        let date = LexState {
            in_date: true,
            ..LexState::default()
        };
        assert!(date.outside_string_and_comment());

        let comment = LexState {
            comment_depth: 1,
            ..LexState::default()
        };
        assert!(!comment.outside_string_and_comment());
    }

    #[test]
    fn test_relex_is_consistent_with_lex() {
        let mut state = LexState {
            in_string: true,
            ..LexState::default()
        };
        let mut token = Token::lex("x".into(), 0.into(), &mut LexState::default());
        token.relex(&mut state);
        assert!(token.in_string_before && token.in_string_after);
        assert!(state.in_string);
    }

    #[test]
    fn test_display() {
        let tokens = lex_all(&["define"]);
        assert_eq!(tokens[0].to_string(), "0:define(0,false,true)");
    }

    #[test]
    fn test_shift() {
        let mut tokens = lex_all(&["a", "b"]);
        tokens[1].shift(-1);
        assert_eq!(tokens[1].start, TextSize::from(1));
        assert_eq!(tokens[1].end(), TextSize::from(2));
    }
}
