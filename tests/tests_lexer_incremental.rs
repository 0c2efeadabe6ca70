#![allow(clippy::unwrap_used)]

mod common;

use common::{LETTER, SCHEMA, assert_incremental_matches_full};
use repdev::base::{TextEdit, TextSize};
use repdev::lexer::{TokenChain, retokenize, tokenize};
use rstest::rstest;

fn texts(chain: &TokenChain) -> Vec<&str> {
    chain.iter().map(|t| t.text.as_str()).collect()
}

#[rstest]
#[case::append("print x", 7, 0, "y")]
#[case::delete_word("print abc def ghi jkl", 6, 4, "")]
#[case::open_comment("a b c d e f g h", 4, 0, "[")]
#[case::close_comment_early("a [b c d e] f g h i j", 4, 0, "]")]
#[case::remove_open_bracket("a [b c] d e f g h i j", 2, 1, "")]
#[case::open_comment_before_string("a b c d e f \"s\" g h", 0, 0, "[")]
#[case::quote_flips_define("a b c d e \"s\" f define x = 1 end", 0, 0, "\"")]
#[case::double_quote("x = \"abc def\" y z w v u", 5, 0, "\"")]
#[case::remove_date_open("print 'x' a b c d e f", 6, 1, "")]
#[case::before_record("print account holder:name x y z", 6, 0, "the ")]
#[case::split_record("print account holder x y z", 13, 1, "  ")]
#[case::after_define_block("define x = 1 end print a b c d e f g", 30, 0, "q")]
#[case::replace_across_lines("print a\nb\nc\nd", 8, 1, "bb")]
#[case::into_empty("", 0, 0, "print x")]
#[case::delete_everything("print x", 0, 7, "")]
#[case::non_ascii("h\u{e9}llo w\u{f6}rld abc def", 7, 0, "z")]
#[case::in_letter_define(LETTER, 160, 0, " again")]
#[case::in_letter_comment(LETTER, 206, 0, "final ")]
fn test_incremental_matches_full(
    #[case] before: &str,
    #[case] start: u32,
    #[case] removed: u32,
    #[case] inserted: &str,
) {
    assert_incremental_matches_full(before, start, removed, inserted);
}

#[rstest]
#[case("print x y z")]
#[case("define\n x = \"hello\"\nend\nprint x")]
#[case("\"unterminated string [x] 'y'")]
#[case(LETTER)]
fn test_empty_edit_is_idempotent(#[case] text: &str) {
    let mut chain = tokenize(text, &*SCHEMA).unwrap();
    let fresh = chain.clone();
    retokenize(text, TextEdit::new(0u32, 0u32, 0u32), &mut chain, &*SCHEMA).unwrap();
    assert_eq!(chain, fresh);
}

#[test]
fn test_comment_nesting() {
    let chain = tokenize("a[b[c]d]e", &*SCHEMA).unwrap();
    let words: Vec<u32> = chain
        .iter()
        .filter(|t| t.text.bytes().all(|b| b.is_ascii_alphabetic()))
        .map(|t| t.comment_depth_before)
        .collect();
    assert_eq!(words, vec![0, 1, 2, 1, 0]);

    let chain = tokenize("]] a ] [ b", &*SCHEMA).unwrap();
    assert!(chain.iter().all(|t| t.comment_depth_after <= 1));
    assert_eq!(chain[2].comment_depth_before, 0);
    assert_eq!(chain[5].comment_depth_before, 1);
}

#[test]
fn test_string_toggling() {
    let chain = tokenize("\"abc\" def \"ghi\"", &*SCHEMA).unwrap();
    let flags: Vec<bool> = chain.iter().map(|t| t.in_string_before).collect();
    assert_eq!(flags, vec![true, true, true, false, true, true, true]);
    assert!(!chain.as_slice().last().unwrap().in_string_after);

    let chain = tokenize("\"abc\" \"def", &*SCHEMA).unwrap();
    assert!(chain.as_slice().last().unwrap().in_string_after);
}

#[test]
fn test_record_name_merging() {
    let chain = tokenize("account holder: name", &*SCHEMA).unwrap();
    assert_eq!(texts(&chain), vec!["account holder", ":", "name"]);

    let chain = tokenize("account holder:name", &*SCHEMA).unwrap();
    assert_eq!(texts(&chain), vec!["account holder:name"]);

    let chain = tokenize("Account Holder:City x", &*SCHEMA).unwrap();
    assert_eq!(texts(&chain), vec!["account holder:city", "x"]);
}

#[test]
fn test_typing_a_letter_at_a_time() {
    let target = "define\n x = \"Hi\"\nend\nprint account holder:name\n";
    let mut text = String::new();
    let mut chain = tokenize(&text, &*SCHEMA).unwrap();

    for (i, c) in target.char_indices() {
        text.push(c);
        let at = i as u32;
        let edit = TextEdit::new(at, at + c.len_utf8() as u32, at);
        retokenize(&text, edit, &mut chain, &*SCHEMA).unwrap();
        assert_eq!(chain, tokenize(&text, &*SCHEMA).unwrap(), "after typing {text:?}");
    }
}

#[test]
fn test_dirty_range_stops_at_fixed_point() {
    let text = "a b c d e \"s\" f g h i j k l m n o p";
    let mut chain = tokenize(text, &*SCHEMA).unwrap();

    let after = "ab b c d e \"s\" f g h i j k l m n o p";
    let outcome = retokenize(after, TextEdit::insert(1, 1), &mut chain, &*SCHEMA).unwrap();
    assert!(!outcome.full);
    assert!(outcome.dirty.end() < TextSize::of(after));
    assert_eq!(chain, tokenize(after, &*SCHEMA).unwrap());
}
