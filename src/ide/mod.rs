//! Editor-facing layer: the document session and what it reports.
//!
//! ## Design Principles
//!
//! 1. **Single writer**: a [`DocumentSession`] is the only thing that mutates
//!    its chain; background passes hand back immutable results
//! 2. **No rendering**: highlights and diagnostics are data for the caller
//!
//! ## Usage
//!
//! ```ignore
//! use repdev::ide::{DocumentSession, SessionEnv};
//!
//! let mut session = DocumentSession::open("letter.rg", text, env)?;
//! let outcome = session.edit(start, removed_len, inserted)?;
//! let highlights = session.highlights(outcome.dirty);
//! ```

mod diagnostics;
mod highlight;
mod session;

pub use diagnostics::{Diagnostic, Severity, codes, duplicate_variable_warnings};
pub use highlight::{Highlight, Highlighter, TokenKind};
pub use session::{DocumentSession, EditOutcome, SessionEnv};
