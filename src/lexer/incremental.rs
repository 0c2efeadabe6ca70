//! Incremental re-tokenization.
//!
//! After an edit only a window of the chain is rescanned:
//!
//! ```text
//!   kept tokens │ window (rescanned)                     │ tail (shifted)
//!               │ 2 back · edited tokens · 3 ahead · rest │
//!               │         of the string run               │
//! ```
//!
//! The tail keeps its text and moves by the edit's delta. If the lexical
//! state at the end of the window changed, the tail's flags are recomputed
//! forward until the state matches what was recorded before (the fixed
//! point). Edits that touch an open define block are re-tokenized in full.

use std::ops::Range;

use text_size::{TextRange, TextSize};

use super::chain::TokenChain;
use super::scanner::Scanner;
use crate::base::{AnalysisError, Result, TextEdit};
use crate::project::SchemaOracle;

/// Tokens kept ahead of the edit to re-absorb multi-word schema names.
const LOOKAHEAD_TOKENS: usize = 3;
/// Tokens re-absorbed behind the edit: the first word of a record name, or a
/// record and its `:` in a field reference.
const LOOKBEHIND_TOKENS: usize = 2;
/// Tokens past a `record` `:` pair that a field reference can span.
const FIELD_REDRAW_TOKENS: usize = 2;

/// Outcome of a (re)tokenize pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retokenized {
    /// Characters whose highlighting may have changed.
    pub dirty: TextRange,
    /// No `end` keyword was scanned, so a define block opened before the
    /// window is still open after it.
    pub all_in_define: bool,
    /// Indices of the tokens emitted by the scan.
    pub rescanned: Range<usize>,
    /// Define-scope changed materially: a rescanned or removed token was in
    /// define scope, reconciliation changed the flags of a token in define
    /// scope, or the whole document was re-tokenized.
    pub define_changed: bool,
    /// The whole document was re-tokenized.
    pub full: bool,
}

/// Tokenize a whole document into a fresh chain.
pub fn tokenize(text: &str, oracle: &dyn SchemaOracle) -> Result<TokenChain> {
    let mut chain = TokenChain::new();
    retokenize_full(text, &mut chain, oracle)?;
    Ok(chain)
}

/// Re-tokenize the whole document, replacing `chain`.
pub fn retokenize_full(
    text: &str,
    chain: &mut TokenChain,
    oracle: &dyn SchemaOracle,
) -> Result<Retokenized> {
    let len = TextSize::of(text);
    let mut fresh = TokenChain::new();
    let mut outcome = rescan(text, TextEdit::whole(len), &mut fresh, oracle)?;

    outcome.full = true;
    outcome.define_changed = true;
    outcome.dirty = TextRange::up_to(len);
    *chain = fresh;

    tracing::debug!("Full re-tokenize: {} tokens", chain.len());
    Ok(outcome)
}

/// Re-tokenize the part of `chain` affected by `edit`; `text` is the
/// document after the edit.
///
/// On error the chain is left exactly as it was.
pub fn retokenize(
    text: &str,
    edit: TextEdit,
    chain: &mut TokenChain,
    oracle: &dyn SchemaOracle,
) -> Result<Retokenized> {
    rescan(text, edit, chain, oracle)
}

/// Token bounds of the rescan window, before any mutation.
#[derive(Debug, Clone, Copy)]
struct Window {
    first: usize,
    /// Last old token in the window (inclusive); `None` for an empty chain.
    last: Option<usize>,
}

impl Window {
    fn select(chain: &TokenChain, edit: TextEdit) -> Self {
        let tokens = chain.as_slice();
        let count = tokens.len();
        if count == 0 {
            return Self {
                first: 0,
                last: None,
            };
        }

        let touched = tokens.partition_point(|t| t.end() < edit.start);
        let past_edit = tokens
            .partition_point(|t| t.start <= edit.old_end)
            .max(touched);

        let first = touched.saturating_sub(LOOKBEHIND_TOKENS);
        let mut last = (past_edit + LOOKAHEAD_TOKENS).min(count - 1);

        // A string literal is rescanned as a whole
        let in_string = tokens[last].in_string_before;
        while tokens[last].in_string_before == in_string && last + 1 < count {
            last += 1;
        }

        Self {
            first,
            last: Some(last),
        }
    }
}

fn rescan(
    text: &str,
    edit: TextEdit,
    chain: &mut TokenChain,
    oracle: &dyn SchemaOracle,
) -> Result<Retokenized> {
    let len = TextSize::of(text);
    check_edit(text, edit)?;

    if text.is_empty() {
        let define_changed = chain.iter().any(|t| t.in_define);
        chain.clear();
        return Ok(Retokenized {
            dirty: TextRange::empty(0.into()),
            all_in_define: true,
            rescanned: 0..0,
            define_changed,
            full: false,
        });
    }

    let window = Window::select(chain, edit);
    let delta = edit.delta();

    let char_start = match chain.get(window.first) {
        Some(token) => edit.start.min(token.start),
        None => edit.start,
    };
    let char_end = match window.last {
        Some(last) => {
            let shifted_end = i64::from(u32::from(chain[last].end())) + delta;
            let end = shifted_end
                .max(i64::from(u32::from(edit.end)))
                .min(i64::from(u32::from(len)));
            TextSize::from(end as u32)
        }
        None => len,
    };
    check_window(text, char_start, char_end)?;

    let start_state = chain.state_before(window.first);
    let old_end = window.last.map(|last| chain[last].state_after());

    if start_state.in_define || old_end.is_some_and(|state| state.in_define) {
        tracing::debug!(
            "Edit at {:?} touches an open define block, re-tokenizing everything",
            edit.start
        );
        return retokenize_full(text, chain, oracle);
    }

    let removed = match window.last {
        Some(last) => window.first..last + 1,
        None => window.first..window.first,
    };
    check_tail(chain, removed.end, delta, char_end, len)?;

    tracing::trace!(
        "Rescanning tokens {:?} over {:?}..{:?}",
        removed,
        char_start,
        char_end
    );

    let lowered = text[usize::from(char_start)..usize::from(char_end)].to_ascii_lowercase();
    let scanned = Scanner::new(&lowered, char_start, start_state, oracle).scan();

    // Nothing below can fail: the chain is only mutated from here on.
    let removed_define = chain.as_slice()[removed.clone()].iter().any(|t| t.in_define);
    let added_define = scanned.tokens.iter().any(|t| t.in_define);
    let rescanned = chain.splice(removed, scanned.tokens);
    let tail = rescanned.end;

    if delta != 0 {
        for token in &mut chain.tokens_mut()[tail..] {
            token.shift(delta);
        }
    }

    let mut fix = tail;
    let mut define_touched = false;
    if let Some(old_end) = old_end {
        let mut state = scanned.state;
        if state != old_end {
            tracing::trace!(
                "State changed at window end ({:?} -> {:?}), reconciling tail",
                old_end,
                state
            );
            fix = chain.len();
            for (i, token) in chain.tokens_mut()[tail..].iter_mut().enumerate() {
                let recorded = token.clone();
                token.relex(&mut state);
                // A declaration can appear or vanish without its define flag moving
                define_touched |= (recorded.in_define || token.in_define) && recorded != *token;
                if state == recorded.state_after() {
                    fix = tail + i + 1;
                    break;
                }
            }
        }
    }

    // A record followed by `:` also repaints the field reference after it
    if !rescanned.is_empty() {
        let followed_by_colon = chain.get(tail).is_some_and(|t| t.text == ":");
        if chain[tail - 1].in_code() && followed_by_colon {
            fix = fix.max(tail + FIELD_REDRAW_TOKENS).min(chain.len());
        }
    }

    let dirty_start = char_start.min(edit.start);
    let dirty_end = chain.get(fix).map_or(len, |t| t.start).max(edit.end);

    Ok(Retokenized {
        dirty: TextRange::new(dirty_start, dirty_end.max(dirty_start)),
        all_in_define: !scanned.saw_end,
        rescanned,
        define_changed: removed_define || added_define || define_touched,
        full: false,
    })
}

fn check_edit(text: &str, edit: TextEdit) -> Result<()> {
    let len = TextSize::of(text);
    if edit.start > edit.end || edit.end > len || edit.start > edit.old_end {
        return Err(AnalysisError::tokenize(format!(
            "edit {:?}..{:?} (was ..{:?}) does not fit a document of {:?} bytes",
            edit.start, edit.end, edit.old_end, len
        )));
    }
    if !text.is_char_boundary(edit.start.into()) || !text.is_char_boundary(edit.end.into()) {
        return Err(AnalysisError::tokenize(format!(
            "edit {:?}..{:?} splits a character",
            edit.start, edit.end
        )));
    }
    Ok(())
}

fn check_window(text: &str, start: TextSize, end: TextSize) -> Result<()> {
    if start > end || !text.is_char_boundary(start.into()) || !text.is_char_boundary(end.into()) {
        return Err(AnalysisError::tokenize(format!(
            "window {:?}..{:?} is not a valid slice of the document",
            start, end
        )));
    }
    Ok(())
}

/// The tail must land after the window and inside the document once shifted.
fn check_tail(
    chain: &TokenChain,
    tail: usize,
    delta: i64,
    window_end: TextSize,
    len: TextSize,
) -> Result<()> {
    let (Some(first), Some(last)) = (chain.get(tail), chain.as_slice().last()) else {
        return Ok(());
    };
    let first_start = i64::from(u32::from(first.start)) + delta;
    let last_end = i64::from(u32::from(last.end())) + delta;
    if first_start < i64::from(u32::from(window_end)) || last_end > i64::from(u32::from(len)) {
        return Err(AnalysisError::tokenize(format!(
            "chain does not match the document: tail {first_start}..{last_end}, \
             window end {window_end:?}, length {len:?}"
        )));
    }
    Ok(())
}
