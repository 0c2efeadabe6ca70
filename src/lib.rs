//! # repdev-base
//!
//! Incremental lexing and light semantic analysis for RepGen report sources.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Document session, highlighting, diagnostics
//!   ↓
//! semantic  → Variable extraction, include resolution
//!   ↓
//! lexer     → Token chain, incremental re-tokenizer
//!   ↓
//! project   → Schema oracle, source providers, word lists
//!   ↓
//! base      → Primitives (TextEdit, TextRange, LineIndex, errors)
//! ```

// ============================================================================
// MODULES (dependency order: base → project → lexer → semantic → ide)
// ============================================================================

/// Foundation types: edits, offsets, line index, errors
pub mod base;

/// External collaborators: schema oracle, include sources, configuration
pub mod project;

/// Lexer: token chain and incremental re-tokenizer
pub mod lexer;

/// Semantic passes: variables and includes
pub mod semantic;

/// Editor-facing layer: document session, highlights, diagnostics
pub mod ide;

// Re-export foundation types
pub use base::{AnalysisError, LineCol, LineIndex, Result, TextEdit, TextRange, TextSize};
pub use ide::{DocumentSession, EditOutcome, SessionEnv};
pub use lexer::{Token, TokenChain, retokenize, tokenize};
pub use project::{LanguageConfig, SchemaLayout, SchemaOracle, SourceProvider};
