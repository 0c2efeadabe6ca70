//! Error types shared by the lexer, the variable extractor and the include resolver.
//!
//! Every kind is recoverable by the caller; none of them leaves shared state
//! half-updated.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors that can occur while analysing a report source.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An internal invariant did not hold during a scan. The token chain is
    /// left untouched; callers fall back to a full re-tokenize.
    #[error("Tokenize failure: {reason}")]
    TokenizeFailure { reason: String },

    /// The source provider had no text for an included file.
    #[error("Include unavailable: {file_name}")]
    IncludeUnavailable { file_name: SmolStr },

    /// A declared variable's type could not be inferred from the tokens.
    #[error("Malformed type expression for '{variable}': {reason}")]
    MalformedTypeExpression { variable: SmolStr, reason: String },

    /// A background pass died before producing a result.
    #[error("Background pass '{pass}' panicked")]
    BackgroundPanicked { pass: &'static str },

    /// IO error while loading configuration or sources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Create a tokenize failure.
    pub fn tokenize(reason: impl Into<String>) -> Self {
        Self::TokenizeFailure {
            reason: reason.into(),
        }
    }

    /// Create an include-unavailable error.
    pub fn include_unavailable(file_name: impl Into<SmolStr>) -> Self {
        Self::IncludeUnavailable {
            file_name: file_name.into(),
        }
    }

    /// Create a malformed type expression error.
    pub fn malformed_type(variable: impl Into<SmolStr>, reason: impl Into<String>) -> Self {
        Self::MalformedTypeExpression {
            variable: variable.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
