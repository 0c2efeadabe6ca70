//! Include resolution.
//!
//! `#include "name"` inside a define block pulls the declarations of another
//! file into scope. Resolution finds the distinct includes of a document,
//! fetches each one through a [`SourceProvider`], tokenizes it into a fresh
//! chain and extracts its variables. Only first-level includes are followed.
//!
//! Resolution is all-or-nothing: the first file the provider cannot supply
//! aborts the pass and nothing is applied.

use std::sync::Arc;
use std::thread::JoinHandle;

use indexmap::IndexSet;
use rayon::prelude::*;
use smol_str::SmolStr;

use crate::base::{AnalysisError, Result};
use crate::lexer::{INCLUDE_KW, TokenChain, tokenize};
use crate::project::{LanguageConfig, SchemaOracle, SourceProvider};

use super::extract::{extract_variables, full_string};
use super::variable::{Variable, VariableTable};

/// Division of the report an include was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeScope {
    Define,
}

/// A distinct external reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Include {
    pub file_name: SmolStr,
    pub scope: IncludeScope,
}

impl Include {
    pub fn define(file_name: impl Into<SmolStr>) -> Self {
        Self {
            file_name: file_name.into(),
            scope: IncludeScope::Define,
        }
    }
}

/// An included file and the variables it declares.
#[derive(Debug, Clone)]
pub struct ResolvedInclude {
    pub include: Include,
    pub variables: Vec<Variable>,
}

/// Result of a complete resolution pass.
#[derive(Debug, Clone, Default)]
pub struct IncludeResolution {
    /// Distinct includes in document order.
    pub includes: IndexSet<Include>,
    pub files: Vec<ResolvedInclude>,
}

impl IncludeResolution {
    /// Replace each included file's variables in `table`.
    ///
    /// Returns whether any file's visible set changed.
    pub fn apply(self, table: &mut VariableTable) -> bool {
        let mut changed = false;
        for file in self.files {
            changed |= table.replace_file(&file.include.file_name, file.variables);
        }
        changed
    }
}

/// Distinct `#include` directives of a document, in order of appearance.
pub fn discover_includes(chain: &TokenChain, text: &str) -> IndexSet<Include> {
    let tokens = chain.as_slice();
    let mut includes = IndexSet::new();

    for (i, token) in tokens.iter().enumerate() {
        let is_directive = token.text == INCLUDE_KW && token.in_define && token.in_code();
        if !is_directive || !tokens.get(i + 1).is_some_and(|t| t.in_string_before) {
            continue;
        }
        match full_string(tokens, i + 1, text) {
            Some(name) if !name.trim().is_empty() => {
                includes.insert(Include::define(name.trim()));
            }
            Some(_) => tracing::debug!("Ignoring empty include at {:?}", token.start),
            None => tracing::debug!("Include at {:?} does not fit the document", token.start),
        }
    }

    includes
}

/// Resolve the includes of a document.
pub fn resolve_includes(
    chain: &TokenChain,
    text: &str,
    sources: &dyn SourceProvider,
    oracle: &dyn SchemaOracle,
    config: &LanguageConfig,
) -> Result<IncludeResolution> {
    let includes = discover_includes(chain, text);
    let pending: Vec<&Include> = includes.iter().collect();

    let files = pending
        .par_iter()
        .map(|include| resolve_one(include, sources, oracle, config))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Resolved {} includes ({} variables)",
        files.len(),
        files.iter().map(|f| f.variables.len()).sum::<usize>()
    );
    Ok(IncludeResolution { includes, files })
}

fn resolve_one(
    include: &Include,
    sources: &dyn SourceProvider,
    oracle: &dyn SchemaOracle,
    config: &LanguageConfig,
) -> Result<ResolvedInclude> {
    let text = sources
        .get_file(&include.file_name)
        .ok_or_else(|| AnalysisError::include_unavailable(include.file_name.clone()))?;

    let mut chain = tokenize(&text, oracle)?;
    // Included files are only ever pulled into a define block
    for token in chain.tokens_mut() {
        token.in_define = true;
    }

    let variables = extract_variables(&include.file_name, &text, &chain, config);
    tracing::trace!("{}: {} variables", include.file_name, variables.len());
    Ok(ResolvedInclude {
        include: include.clone(),
        variables,
    })
}

/// A resolution pass running on its own thread.
///
/// The pass works on a snapshot of the chain and text, so the document may
/// keep changing while it runs. The generation identifies the document
/// state it was started from; a coordinator discards a result whose
/// generation is no longer current.
#[derive(Debug)]
pub struct IncludePass {
    generation: u64,
    handle: JoinHandle<Result<IncludeResolution>>,
}

impl IncludePass {
    const THREAD_NAME: &'static str = "include-resolver";

    pub fn spawn(
        generation: u64,
        chain: TokenChain,
        text: String,
        sources: Arc<dyn SourceProvider>,
        oracle: Arc<dyn SchemaOracle>,
        config: Arc<LanguageConfig>,
    ) -> Result<Self> {
        let handle = std::thread::Builder::new()
            .name(Self::THREAD_NAME.into())
            .spawn(move || {
                resolve_includes(&chain, &text, sources.as_ref(), oracle.as_ref(), &config)
            })?;
        tracing::debug!("Started include pass {generation}");
        Ok(Self { generation, handle })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the pass to finish.
    pub fn join(self) -> Result<IncludeResolution> {
        self.handle
            .join()
            .map_err(|_| AnalysisError::BackgroundPanicked {
                pass: Self::THREAD_NAME,
            })?
    }
}
