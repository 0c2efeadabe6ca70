//! Diagnostics: warnings derived from the variable table.

use std::sync::Arc;

use crate::base::LineIndex;
use crate::semantic::VariableTable;

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: Arc<str>,
    /// Line (0-indexed).
    pub line: u32,
    /// Column (0-indexed, bytes).
    pub col: u32,
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn warning(
        file: impl Into<Arc<str>>,
        line: u32,
        col: u32,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            col,
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

pub mod codes {
    /// A name declared more than once in the same file.
    pub const DUPLICATE_VARIABLE: &str = "W0001";
}

/// One warning per declaration of a name that `file` declares more than once.
pub fn duplicate_variable_warnings(
    table: &VariableTable,
    file: &str,
    lines: &LineIndex,
) -> Vec<Diagnostic> {
    let file: Arc<str> = Arc::from(file);
    table
        .duplicates_in(&file)
        .into_iter()
        .map(|var| {
            let pos = lines.line_col(var.position);
            Diagnostic::warning(
                file.clone(),
                pos.line,
                pos.col,
                format!("Duplicate variable name: {}", var.name),
            )
            .with_code(codes::DUPLICATE_VARIABLE)
        })
        .collect()
}
