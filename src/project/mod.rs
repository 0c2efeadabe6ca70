//! External collaborators of the analysis: the schema oracle, source
//! providers for included files, and the language word lists.

pub mod config;
pub mod schema;
pub mod sources;

pub use config::{LanguageConfig, WordList};
pub use schema::{SchemaLayout, SchemaOracle};
pub use sources::{DirectorySources, MemorySources, SourceProvider};
