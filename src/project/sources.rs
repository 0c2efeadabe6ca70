//! Source providers resolve an include name to its raw text.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Resolves an include file name to its text. `None` means the file is
/// unavailable. Calls may block; they are only made from background passes.
pub trait SourceProvider: Send + Sync {
    fn get_file(&self, name: &str) -> Option<String>;
}

/// Sources held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    files: FxHashMap<SmolStr, String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        self.files.insert(SmolStr::from(name), text.into());
    }
}

impl SourceProvider for MemorySources {
    fn get_file(&self, name: &str) -> Option<String> {
        self.files.get(name).cloned()
    }
}

/// Sources read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySources {
    root: PathBuf,
}

impl DirectorySources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for DirectorySources {
    fn get_file(&self, name: &str) -> Option<String> {
        // Include names are bare file names; refuse anything that walks out of the root.
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            tracing::warn!("Refusing include name '{}'", name);
            return None;
        }

        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}
