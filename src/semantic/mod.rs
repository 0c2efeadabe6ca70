//! # Semantic passes
//!
//! Projections derived from a token chain, rebuilt whole on every pass:
//!
//! - [`extract`]: declared variables and their inferred types
//! - [`includes`]: `#include` discovery and resolution of the included files
//! - [`variable`]: the per-file variable table the passes write into

pub mod extract;
pub mod includes;
pub mod variable;

pub use extract::{extract_variables, full_string, rebuild_variables};
pub use includes::{
    Include, IncludePass, IncludeResolution, IncludeScope, ResolvedInclude, discover_includes,
    resolve_includes,
};
pub use variable::{TypeKind, Variable, VariableTable};
