//! DocumentSession: the single writer for one open report.
//!
//! The session owns the document text and its token chain, applies edits,
//! keeps the file's variables current and runs include resolution in the
//! background. Background results are applied only through
//! [`DocumentSession::poll_includes`] or [`DocumentSession::wait_for_includes`],
//! and only when they come from the latest pass.
//!
//! ## Usage
//!
//! ```ignore
//! let env = SessionEnv::new(config, schema, sources);
//! let mut session = DocumentSession::open("letter.rg", text, env)?;
//!
//! let outcome = session.edit(120, 0, "x")?;
//! repaint(session.highlights(outcome.dirty));
//!
//! if session.poll_includes()? {
//!     repaint_all();
//! }
//! ```

use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use crate::base::{AnalysisError, LineIndex, Result, TextEdit};
use crate::lexer::{Retokenized, TokenChain, retokenize, retokenize_full, tokenize};
use crate::project::{LanguageConfig, SchemaOracle, SourceProvider};
use crate::semantic::{Include, IncludePass, VariableTable, discover_includes, rebuild_variables};

use super::diagnostics::{self, Diagnostic};
use super::highlight::{Highlight, Highlighter};

/// Shared, immutable collaborators of a session.
#[derive(Clone)]
pub struct SessionEnv {
    pub config: Arc<LanguageConfig>,
    pub oracle: Arc<dyn SchemaOracle>,
    pub sources: Arc<dyn SourceProvider>,
}

impl SessionEnv {
    pub fn new(
        config: Arc<LanguageConfig>,
        oracle: Arc<dyn SchemaOracle>,
        sources: Arc<dyn SourceProvider>,
    ) -> Self {
        Self {
            config,
            oracle,
            sources,
        }
    }
}

/// What an edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Characters to repaint. The whole document when variables changed.
    pub dirty: TextRange,
    pub variables_changed: bool,
    /// Define-scope changed materially.
    pub define_changed: bool,
    /// The document was re-tokenized in full.
    pub full: bool,
}

/// Owns all mutable state of one open document.
pub struct DocumentSession {
    file_name: SmolStr,
    text: String,
    chain: TokenChain,
    /// Shared with other sessions and readers; written only here.
    variables: Arc<RwLock<VariableTable>>,
    /// Includes applied by the last successful resolution pass.
    includes: IndexSet<Include>,
    env: SessionEnv,
    /// Re-tokenize on edit. Off during bulk replacement.
    reparse: bool,
    /// Edits arrived while `reparse` was off.
    stale: bool,
    /// Resolve includes on the next edit.
    refresh_includes: bool,
    pending: Vec<IncludePass>,
    /// Generation of the latest include pass.
    generation: u64,
}

impl DocumentSession {
    /// Open a document with a fresh variable table.
    pub fn open(file_name: &str, text: impl Into<String>, env: SessionEnv) -> Result<Self> {
        Self::open_with_table(file_name, text, env, Arc::new(RwLock::new(VariableTable::new())))
    }

    /// Open a document writing into an existing variable table.
    pub fn open_with_table(
        file_name: &str,
        text: impl Into<String>,
        env: SessionEnv,
        variables: Arc<RwLock<VariableTable>>,
    ) -> Result<Self> {
        let text = text.into();
        let chain = tokenize(&text, env.oracle.as_ref())?;

        let mut session = Self {
            file_name: SmolStr::from(file_name),
            text,
            chain,
            variables,
            includes: IndexSet::new(),
            env,
            reparse: true,
            stale: false,
            refresh_includes: true,
            pending: Vec::new(),
            generation: 0,
        };
        session.rebuild_variables();
        session.schedule_includes()?;

        tracing::debug!(
            "Opened {} ({} tokens)",
            session.file_name,
            session.chain.len()
        );
        Ok(session)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chain(&self) -> &TokenChain {
        &self.chain
    }

    pub fn variables(&self) -> Arc<RwLock<VariableTable>> {
        Arc::clone(&self.variables)
    }

    pub fn includes(&self) -> &IndexSet<Include> {
        &self.includes
    }

    pub fn is_reparse(&self) -> bool {
        self.reparse
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of include passes not yet applied or discarded.
    pub fn pending_passes(&self) -> usize {
        self.pending.len()
    }

    /// Replace `removed_len` bytes at `start` with `inserted`.
    ///
    /// The text is left unchanged when the edit does not fit it. A failed
    /// incremental pass falls back to a full re-tokenize.
    pub fn edit(&mut self, start: u32, removed_len: u32, inserted: &str) -> Result<EditOutcome> {
        let from = start as usize;
        let to = from + removed_len as usize;
        if to > self.text.len()
            || !self.text.is_char_boundary(from)
            || !self.text.is_char_boundary(to)
        {
            return Err(AnalysisError::tokenize(format!(
                "edit {from}..{to} does not fit {} ({} bytes)",
                self.file_name,
                self.text.len()
            )));
        }
        self.text.replace_range(from..to, inserted);

        let inserted_len = TextSize::of(inserted);
        let edit = TextEdit::new(start, TextSize::from(start) + inserted_len, start + removed_len);

        if !self.reparse {
            self.stale = true;
            return Ok(EditOutcome {
                dirty: edit.new_range(),
                variables_changed: false,
                define_changed: false,
                full: false,
            });
        }

        let oracle = self.env.oracle.as_ref();
        let outcome = match retokenize(&self.text, edit, &mut self.chain, oracle) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("{err}; re-tokenizing {} in full", self.file_name);
                retokenize_full(&self.text, &mut self.chain, oracle)?
            }
        };

        let outcome = self.after_tokenize(outcome);
        self.reschedule_includes(outcome.define_changed);
        Ok(outcome)
    }

    /// Re-tokenize the whole document and rebuild its variables.
    pub fn reparse_all(&mut self) -> Result<EditOutcome> {
        let outcome = retokenize_full(&self.text, &mut self.chain, self.env.oracle.as_ref())?;
        self.stale = false;
        tracing::debug!("Reparsed {}", self.file_name);
        let outcome = self.after_tokenize(outcome);
        self.reschedule_includes(outcome.define_changed);
        Ok(outcome)
    }

    /// Turn re-tokenizing on edit on or off. Turning it back on after edits
    /// were skipped re-tokenizes the whole document.
    pub fn set_reparse(&mut self, reparse: bool) -> Result<Option<EditOutcome>> {
        self.reparse = reparse;
        if reparse && self.stale {
            return self.reparse_all().map(Some);
        }
        Ok(None)
    }

    /// Apply finished include passes without blocking.
    ///
    /// Returns whether the variable table changed.
    pub fn poll_includes(&mut self) -> Result<bool> {
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(IncludePass::is_finished);
        self.pending = running;
        self.finish_passes(finished)
    }

    /// Block until every include pass has finished and apply the latest.
    pub fn wait_for_includes(&mut self) -> Result<bool> {
        let passes = std::mem::take(&mut self.pending);
        self.finish_passes(passes)
    }

    /// Warnings for names this document declares more than once.
    pub fn duplicate_variable_warnings(&self) -> Vec<Diagnostic> {
        let lines = LineIndex::new(&self.text);
        diagnostics::duplicate_variable_warnings(&self.variables.read(), &self.file_name, &lines)
    }

    /// Classified tokens overlapping `range`.
    pub fn highlights(&self, range: TextRange) -> Vec<Highlight> {
        let table = self.variables.read();
        Highlighter::new(&self.env.config, self.env.oracle.as_ref(), &table)
            .highlights(&self.chain, range)
    }

    fn after_tokenize(&mut self, outcome: Retokenized) -> EditOutcome {
        let variables_changed = outcome.define_changed && self.rebuild_variables();
        let dirty = if variables_changed {
            TextRange::up_to(TextSize::of(self.text.as_str()))
        } else {
            outcome.dirty
        };
        EditOutcome {
            dirty,
            variables_changed,
            define_changed: outcome.define_changed,
            full: outcome.full,
        }
    }

    fn rebuild_variables(&mut self) -> bool {
        rebuild_variables(
            &mut self.variables.write(),
            &self.file_name,
            &self.text,
            &self.chain,
            &self.env.config,
        )
    }

    /// Start an include pass on the first change, or when the define block
    /// changed and its includes no longer match the applied ones.
    fn reschedule_includes(&mut self, define_changed: bool) {
        if !self.refresh_includes && !(define_changed && self.includes_moved()) {
            return;
        }
        self.refresh_includes = false;
        if let Err(err) = self.schedule_includes() {
            tracing::warn!("Could not start include pass for {}: {err}", self.file_name);
        }
    }

    /// The document's includes differ from the applied ones.
    fn includes_moved(&self) -> bool {
        discover_includes(&self.chain, &self.text) != self.includes
    }

    fn schedule_includes(&mut self) -> Result<()> {
        self.generation += 1;
        let pass = IncludePass::spawn(
            self.generation,
            self.chain.clone(),
            self.text.clone(),
            Arc::clone(&self.env.sources),
            Arc::clone(&self.env.oracle),
            Arc::clone(&self.env.config),
        )?;
        self.pending.push(pass);
        Ok(())
    }

    fn finish_passes(&mut self, passes: Vec<IncludePass>) -> Result<bool> {
        let mut changed = false;
        for pass in passes {
            let generation = pass.generation();
            if generation != self.generation {
                tracing::debug!(
                    "Discarding include pass {generation}, superseded by {}",
                    self.generation
                );
                continue;
            }
            let resolution = pass.join()?;

            let mut table = self.variables.write();
            for dropped in self.includes.difference(&resolution.includes) {
                changed |= table.remove_file(&dropped.file_name) > 0;
            }
            self.includes = resolution.includes.clone();
            changed |= resolution.apply(&mut table);
        }
        Ok(changed)
    }
}
