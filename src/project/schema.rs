//! Schema oracle: answers whether a phrase names a database record or field.
//!
//! The lexer consults it to merge multi-word record names (`account holder`)
//! and `record:field` references into single tokens.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

/// Read-only lookup of record and field names. Implementations must be
/// case-insensitive.
pub trait SchemaOracle: Send + Sync {
    /// Is `text` the name of a record?
    fn is_record_name(&self, text: &str) -> bool;

    /// Is `text` (formatted `<record>:<field>`) a valid field reference?
    fn is_field_name(&self, text: &str) -> bool;
}

/// In-memory database layout: record names with their field names.
#[derive(Debug, Clone, Default)]
pub struct SchemaLayout {
    records: FxHashMap<SmolStr, FxHashSet<SmolStr>>,
}

impl SchemaLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a record with the given fields.
    pub fn with_record<'a>(
        mut self,
        name: &str,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.add_record(name, fields);
        self
    }

    pub fn add_record<'a>(&mut self, name: &str, fields: impl IntoIterator<Item = &'a str>) {
        let entry = self.records.entry(normalize(name)).or_default();
        entry.extend(fields.into_iter().map(normalize));
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Fields of a record, if the record exists.
    pub fn fields(&self, record: &str) -> Option<impl Iterator<Item = &str>> {
        self.records
            .get(normalize(record).as_str())
            .map(|fields| fields.iter().map(SmolStr::as_str))
    }

    /// Does `record` have a field called `field`?
    pub fn has_field(&self, record: &str, field: &str) -> bool {
        self.records
            .get(normalize(record).as_str())
            .is_some_and(|fields| fields.contains(normalize(field).as_str()))
    }
}

impl SchemaOracle for SchemaLayout {
    fn is_record_name(&self, text: &str) -> bool {
        self.records.contains_key(normalize(text).as_str())
    }

    fn is_field_name(&self, text: &str) -> bool {
        match text.rsplit_once(':') {
            Some((record, field)) => self.has_field(record, field),
            None => false,
        }
    }
}

fn normalize(name: &str) -> SmolStr {
    SmolStr::from(name.trim().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SchemaLayout {
        SchemaLayout::new()
            .with_record("Account", ["Balance", "Type"])
            .with_record("account holder", ["name"])
    }

    #[test]
    fn test_record_names_are_case_insensitive() {
        let schema = layout();
        assert!(schema.is_record_name("account"));
        assert!(schema.is_record_name("ACCOUNT HOLDER"));
        assert!(!schema.is_record_name("share"));
        assert_eq!(schema.record_count(), 2);
    }

    #[test]
    fn test_field_names() {
        let schema = layout();
        assert!(schema.is_field_name("account:balance"));
        assert!(schema.is_field_name("account holder:name"));
        assert!(!schema.is_field_name("account:name"));
        assert!(!schema.is_field_name("account"));
    }

    #[test]
    fn test_extending_a_record() {
        let mut schema = layout();
        schema.add_record("account", ["openDate"]);
        assert!(schema.has_field("account", "opendate"));
        assert!(schema.has_field("account", "balance"));
        assert_eq!(schema.fields("account").map(Iterator::count), Some(3));
    }
}
