#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use common::SCHEMA;
use repdev::base::AnalysisError;
use repdev::lexer::tokenize;
use repdev::project::{DirectorySources, LanguageConfig, MemorySources, SourceProvider};
use repdev::semantic::{Include, IncludePass, IncludeResolution, VariableTable, resolve_includes};
use rstest::rstest;

fn resolve(text: &str, sources: &dyn SourceProvider) -> repdev::Result<IncludeResolution> {
    let chain = tokenize(text, &*SCHEMA).unwrap();
    resolve_includes(&chain, text, sources, &*SCHEMA, &LanguageConfig::default())
}

#[test]
fn test_duplicate_include_resolves_once() {
    let text = "define\n#include \"a.rg\"\n#include \"a.rg\"\nend";
    let sources = MemorySources::new().with_file("a.rg", "x = number");
    let resolution = resolve(text, &sources).unwrap();

    assert_eq!(resolution.includes.len(), 1);
    assert!(resolution.includes.contains(&Include::define("a.rg")));
    assert_eq!(resolution.files.len(), 1);
}

#[rstest]
#[case::outside_define("#include \"a.rg\"")]
#[case::in_comment("define [#include \"a.rg\"] end")]
#[case::in_string("define \"#include \" end")]
#[case::bare_name("define #include a end")]
fn test_no_include_found(#[case] text: &str) {
    let resolution = resolve(text, &MemorySources::new()).unwrap();
    assert!(resolution.includes.is_empty());
}

#[test]
fn test_nested_includes_are_not_followed() {
    let text = "define #include \"outer.rg\" end";
    let sources = MemorySources::new()
        .with_file("outer.rg", "#include \"inner.rg\"\nouter = number")
        .with_file("inner.rg", "inner = number");
    let resolution = resolve(text, &sources).unwrap();

    assert_eq!(resolution.files.len(), 1);
    let names: Vec<&str> = resolution.files[0].variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["outer"]);
}

#[test]
fn test_directory_sources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("common.rg"), "Rate1 = rate\nGreeting = \"Hi\"").unwrap();
    let sources = DirectorySources::new(dir.path());

    let text = "define #include \"common.rg\" end";
    let resolution = resolve(text, &sources).unwrap();
    let mut table = VariableTable::new();
    assert!(resolution.apply(&mut table));

    let vars = table.in_file("common.rg");
    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0].name, "rate1");
    assert!(!vars[0].is_constant);
    assert_eq!(vars[1].type_text, "\"Hi\"");

    let err = resolve("define #include \"../common.rg\" end", &sources).unwrap_err();
    assert!(matches!(err, AnalysisError::IncludeUnavailable { .. }));
}

#[test]
fn test_failed_pass_applies_nothing() {
    let text = "define #include \"a.rg\" #include \"b.rg\" end";
    let sources = MemorySources::new().with_file("a.rg", "x = number");
    assert!(resolve(text, &sources).is_err());
}

#[test]
fn test_background_pass_uses_snapshot() {
    let mut text = String::from("define #include \"a.rg\" end");
    let chain = tokenize(&text, &*SCHEMA).unwrap();
    let pass = IncludePass::spawn(
        1,
        chain.clone(),
        text.clone(),
        Arc::new(MemorySources::new().with_file("a.rg", "x = number")),
        Arc::new(SCHEMA.clone()),
        Arc::new(LanguageConfig::default()),
    )
    .unwrap();

    // The caller keeps editing its own copy
    text.clear();

    let resolution = pass.join().unwrap();
    assert_eq!(resolution.files[0].variables[0].name, "x");
    assert!(text.is_empty());
}
