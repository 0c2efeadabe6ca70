//! Foundation types for the RepDev toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextEdit`] - Description of a just-applied document edit
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`AnalysisError`] - The error kinds every pass can report
//!
//! This module has NO dependencies on other repdev modules.

mod edit;
mod error;
mod position;

pub use edit::TextEdit;
pub use error::{AnalysisError, Result};
pub use position::{LineCol, LineIndex};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
