//! Incremental lexer for report sources.
//!
//! ## Structure
//!
//! ```text
//! incremental → window selection, rescan, state reconciliation
//!   ↓
//! scanner     → characters to tokens, record/field lookahead
//!   ↓
//! chain       → ordered tokens, index-based neighbors
//!   ↓
//! token       → a unit and the lexical state around it
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use repdev::base::TextEdit;
//! use repdev::lexer::{retokenize, tokenize};
//!
//! let mut chain = tokenize("print x", &schema)?;
//! let outcome = retokenize("print xy", TextEdit::insert(7, 1), &mut chain, &schema)?;
//! repaint(outcome.dirty);
//! ```

mod chain;
mod incremental;
mod scanner;
mod token;

pub use chain::{TokenChain, TokenCursor};
pub use incremental::{Retokenized, retokenize, retokenize_full, tokenize};
pub use token::{DEFINE_KW, END_KW, INCLUDE_KW, LexState, Token};
