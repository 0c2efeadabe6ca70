//! Declared variables and the per-file variable table.

use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextSize;

/// How a variable's type text was inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A configured base type such as `number` or `money`.
    Base,
    /// A quoted string literal.
    String,
    /// An apostrophe-delimited date literal.
    Date,
    /// A rate literal (`12.50%`).
    Rate,
    /// A money literal (`$1,000.00`).
    Money,
    /// An array declarator (`number array (10)`).
    Array,
    /// Anything else: a literal value rather than a declared type.
    Constant,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Base => "base",
            TypeKind::String => "string",
            TypeKind::Date => "date",
            TypeKind::Rate => "rate",
            TypeKind::Money => "money",
            TypeKind::Array => "array",
            TypeKind::Constant => "constant",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name declared in a define block.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: SmolStr,
    pub file: SmolStr,
    /// Offset of the declaring token in its file.
    pub position: TextSize,
    /// Inferred type text, e.g. `number`, `"hello"`, `$1,000`.
    pub type_text: SmolStr,
    pub kind: TypeKind,
    pub is_constant: bool,
}

impl Variable {
    /// Same (name, file) pair: the duplicate-declaration relation.
    pub fn same_declaration(&self, other: &Variable) -> bool {
        self.name == other.name && self.file == other.file
    }
}

/// Equality ignores the declaration position, so moving a declaration
/// around does not count as a change.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.file == other.file
            && self.type_text == other.type_text
            && self.is_constant == other.is_constant
    }
}

impl Eq for Variable {}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.name, self.type_text, self.file)
    }
}

/// All known variables, grouped by the file that declares them.
///
/// A file's entries are only ever replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    by_file: FxHashMap<SmolStr, Vec<Variable>>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every variable of `file` with `variables`.
    ///
    /// Returns `true` when the visible set changed: the count differs, or
    /// some new variable has no equal counterpart among the old ones.
    pub fn replace_file(&mut self, file: &str, variables: Vec<Variable>) -> bool {
        let old = self.by_file.remove(file).unwrap_or_default();
        let changed = old.len() != variables.len()
            || variables.iter().any(|new| !old.iter().any(|o| o == new));

        if !variables.is_empty() {
            self.by_file.insert(SmolStr::from(file), variables);
        }
        changed
    }

    /// Drop every variable of `file`, returning how many were removed.
    pub fn remove_file(&mut self, file: &str) -> usize {
        self.by_file.remove(file).map_or(0, |vars| vars.len())
    }

    pub fn in_file(&self, file: &str) -> &[Variable] {
        self.by_file.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every variable named `name`, in any file.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Variable> + 'a {
        self.iter().filter(move |v| v.name == name)
    }

    /// Whether any file declares `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name(name).next().is_some()
    }

    /// Variables of `file` whose name is declared more than once in it.
    pub fn duplicates_in(&self, file: &str) -> Vec<&Variable> {
        let vars = self.in_file(file);
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for var in vars {
            *counts.entry(var.name.as_str()).or_default() += 1;
        }
        vars.iter()
            .filter(|v| counts.get(v.name.as_str()).is_some_and(|&n| n > 1))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.by_file.values().flatten()
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.by_file.keys().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_file.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, file: &str, at: u32, ty: &str) -> Variable {
        Variable {
            name: name.into(),
            file: file.into(),
            position: at.into(),
            type_text: ty.into(),
            kind: TypeKind::Base,
            is_constant: false,
        }
    }

    #[test]
    fn test_equality_ignores_position() {
        assert_eq!(var("x", "a", 1, "number"), var("x", "a", 40, "number"));
        assert_ne!(var("x", "a", 1, "number"), var("x", "a", 1, "money"));
        assert!(var("x", "a", 1, "number").same_declaration(&var("x", "a", 9, "date")));
    }

    #[test]
    fn test_replace_file_reports_changes() {
        let mut table = VariableTable::new();
        assert!(table.replace_file("a", vec![var("x", "a", 0, "number")]));
        // Moved but otherwise identical
        assert!(!table.replace_file("a", vec![var("x", "a", 12, "number")]));
        assert!(table.replace_file("a", vec![var("x", "a", 12, "money")]));
        assert!(table.replace_file("a", vec![]));
        assert!(table.is_empty());
        assert!(!table.replace_file("a", vec![]));
    }

    #[test]
    fn test_files_are_independent() {
        let mut table = VariableTable::new();
        table.replace_file("a", vec![var("x", "a", 0, "number")]);
        table.replace_file("b", vec![var("x", "b", 0, "date"), var("y", "b", 5, "date")]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.in_file("b").len(), 2);
        assert_eq!(table.by_name("x").count(), 2);
        assert!(table.contains_name("y"));

        assert_eq!(table.remove_file("b"), 2);
        assert!(!table.contains_name("y"));
        assert_eq!(table.files().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_duplicates_in() {
        let mut table = VariableTable::new();
        table.replace_file(
            "a",
            vec![
                var("x", "a", 0, "number"),
                var("y", "a", 10, "number"),
                var("x", "a", 20, "date"),
            ],
        );
        let dups = table.duplicates_in("a");
        assert_eq!(dups.len(), 2);
        assert!(dups.iter().all(|v| v.name == "x"));
        assert!(table.duplicates_in("b").is_empty());
    }
}
