//! Variable extraction from a token chain.
//!
//! A declaration is a token inside a define block, in plain code, followed
//! by `=` and at least one more token. The tokens after `=` are the type
//! expression, which is read in one of these shapes:
//!
//! | Shape    | Example                  |
//! |----------|--------------------------|
//! | string   | `x = "hello"`            |
//! | date     | `d = '01/31/99'`         |
//! | rate     | `r = 12.50%`             |
//! | money    | `m = $1,000.00`          |
//! | base     | `n = number`             |
//! | array    | `a = number array (10)`  |
//!
//! Anything else is kept as raw text and marked constant.

use smol_str::SmolStr;

use crate::base::{AnalysisError, Result};
use crate::lexer::{Token, TokenChain};
use crate::project::LanguageConfig;

use super::variable::{TypeKind, Variable, VariableTable};

/// Tokens following the opening apostrophe of a date literal.
const DATE_TOKENS: usize = 6;

/// Extract every variable declared in `chain` for `file`.
pub fn extract_variables(
    file: &str,
    text: &str,
    chain: &TokenChain,
    config: &LanguageConfig,
) -> Vec<Variable> {
    let tokens = chain.as_slice();
    let mut variables = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if !is_declaration(tokens, i) {
            continue;
        }
        let ty = match infer_type(tokens, i + 2, text, config) {
            Ok(ty) => ty,
            Err(err) => {
                tracing::warn!("{err}");
                InferredType::raw(&tokens[i + 2])
            }
        };
        variables.push(Variable {
            name: token.text.clone(),
            file: SmolStr::from(file),
            position: token.start,
            type_text: ty.text.into(),
            kind: ty.kind,
            is_constant: ty.is_constant,
        });
    }

    variables
}

/// Re-extract `file`'s variables into `table`, replacing the old ones.
///
/// Returns whether the visible set changed.
pub fn rebuild_variables(
    table: &mut VariableTable,
    file: &str,
    text: &str,
    chain: &TokenChain,
    config: &LanguageConfig,
) -> bool {
    let variables = extract_variables(file, text, chain, config);
    let count = variables.len();
    let changed = table.replace_file(file, variables);
    tracing::debug!("Rebuilt variables for {file}: {count} declared, changed: {changed}");
    changed
}

/// Original-case text between the quote at `quote` and its closing quote
/// (or the end of the chain when the string is unterminated).
///
/// Returns `None` when the tokens do not fit `text`.
pub fn full_string<'t>(tokens: &[Token], quote: usize, text: &'t str) -> Option<&'t str> {
    let content = string_content(tokens, quote);
    if content.is_empty() {
        return Some("");
    }
    let start = tokens[content.start].start;
    let end = tokens[content.end - 1].end();
    text.get(usize::from(start)..usize::from(end))
}

/// Indices of the tokens inside the string opened at `quote`.
fn string_content(tokens: &[Token], quote: usize) -> std::ops::Range<usize> {
    let first = quote + 1;
    let len = tokens
        .get(first..)
        .unwrap_or_default()
        .iter()
        .take_while(|t| t.in_string_before && t.text != "\"")
        .count();
    first..first + len
}

fn is_declaration(tokens: &[Token], i: usize) -> bool {
    let token = &tokens[i];
    token.in_define
        && token.comment_depth_before == 0
        && !token.in_string_before
        && !token.in_date_before
        && tokens.get(i + 1).is_some_and(|t| t.text == "=")
        && i + 2 < tokens.len()
}

#[derive(Debug)]
struct InferredType {
    text: String,
    kind: TypeKind,
    is_constant: bool,
}

impl InferredType {
    fn raw(token: &Token) -> Self {
        Self {
            text: token.text.to_string(),
            kind: TypeKind::Constant,
            is_constant: true,
        }
    }
}

fn infer_type(
    tokens: &[Token],
    at: usize,
    text: &str,
    config: &LanguageConfig,
) -> Result<InferredType> {
    let first = &tokens[at];
    let mut ty = first.text.to_string();
    // Last token of the type expression
    let mut last = at;
    let mut kind = None;

    if first.in_string_before {
        let content = full_string(tokens, at, text).ok_or_else(|| {
            AnalysisError::malformed_type(
                tokens[at - 2].text.clone(),
                format!("string at {:?} does not fit the document", first.start),
            )
        })?;
        ty = format!("\"{content}\"");
        last = string_content(tokens, at).end.min(tokens.len() - 1);
        kind = Some(TypeKind::String);
    } else if first.in_date_before {
        for token in tokens[at + 1..].iter().take(DATE_TOKENS) {
            ty.push_str(&token.text);
            last += 1;
        }
        kind = Some(TypeKind::Date);
    } else if is_rate(tokens, at) {
        ty.push('.');
        ty.push_str(&tokens[at + 2].text);
        last = at + 2;
        if tokens.get(at + 3).is_some_and(|t| t.text == "%") {
            ty.push('%');
            last = at + 3;
        }
        kind = Some(TypeKind::Rate);
    } else if first.text == "$" {
        for token in &tokens[at + 1..] {
            if !(token.is_number() || token.text == "," || token.text == ".") {
                break;
            }
            ty.push_str(&token.text);
            last += 1;
        }
        kind = Some(TypeKind::Money);
    }

    let is_base = config.base_types.contains(&ty);
    if is_base {
        kind = Some(TypeKind::Base);
    }

    if tokens.get(last + 1).is_some_and(|t| t.text == "array") {
        for token in &tokens[last + 1..] {
            let word = token.text.as_str();
            if !(token.is_number() || matches!(word, "(" | ")" | "array")) {
                break;
            }
            if !(token.is_number() || word == ")") {
                ty.push(' ');
            }
            ty.push_str(word);
        }
        kind = Some(TypeKind::Array);
    }

    Ok(InferredType {
        text: ty,
        kind: kind.unwrap_or(TypeKind::Constant),
        is_constant: !is_base,
    })
}

/// `12` `.` `50`
fn is_rate(tokens: &[Token], at: usize) -> bool {
    tokens[at].is_number()
        && tokens.get(at + 1).is_some_and(|t| t.text == ".")
        && tokens.get(at + 2).is_some_and(Token::is_number)
}
