//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use once_cell::sync::Lazy;
use repdev::base::TextEdit;
use repdev::lexer::{TokenChain, retokenize, tokenize};
use repdev::project::SchemaLayout;

/// A small schema with a two-word record name.
pub static SCHEMA: Lazy<SchemaLayout> = Lazy::new(|| {
    SchemaLayout::new()
        .with_record("account holder", ["name", "city"])
        .with_record("account", ["balance", "type"])
});

pub const LETTER: &str = "\
define
 total = money
 count = number
 greeting = \"Dear Member\"
 due = '01/31/99'
 rate1 = 12.50%
 fee = $1,000.00
 slots = number array (10)
end
print greeting
print account holder:name
[ closing [nested] remark ]
";

/// `before` with `removed` bytes at `start` replaced by `inserted`.
pub fn apply(before: &str, start: usize, removed: usize, inserted: &str) -> String {
    let mut after = before.to_string();
    after.replace_range(start..start + removed, inserted);
    after
}

/// Retokenize `before` incrementally and compare with a fresh tokenize.
pub fn assert_incremental_matches_full(
    before: &str,
    start: u32,
    removed: u32,
    inserted: &str,
) -> TokenChain {
    let mut chain = tokenize(before, &*SCHEMA).unwrap();
    let after = apply(before, start as usize, removed as usize, inserted);
    let edit = TextEdit::new(start, start + inserted.len() as u32, start + removed);

    let outcome = retokenize(&after, edit, &mut chain, &*SCHEMA).unwrap();
    let expected = tokenize(&after, &*SCHEMA).unwrap();
    assert_eq!(chain, expected, "incremental result differs for {after:?}:\n{chain}\n{expected}");

    assert!(outcome.dirty.start() <= edit.start);
    assert!(outcome.dirty.end() >= edit.end);
    chain
}
