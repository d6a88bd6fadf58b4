//! Token patterns shared by the sniffs
//!
//! Only global (unqualified or fully qualified `\name`) identifiers are
//! reported; namespaced names refer to user code.

use phpcompat_core::{TokenKind, TokenStream};
use std::collections::BTreeSet;

/// Tokens that turn `name(` into something other than a function call
const NOT_A_CALL_AFTER: &[TokenKind] = &[
    TokenKind::ObjectOperator,
    TokenKind::NullsafeObjectOperator,
    TokenKind::DoubleColon,
    TokenKind::Function,
    TokenKind::New,
    TokenKind::Const,
];

/// Non-empty token before `index`
pub fn previous_significant(tokens: &TokenStream, index: usize) -> Option<usize> {
    index
        .checked_sub(1)
        .and_then(|p| tokens.previous_non_empty(p))
}

/// Non-empty token after `index`
pub fn next_significant(tokens: &TokenStream, index: usize) -> Option<usize> {
    tokens.next_non_empty(index + 1, tokens.len())
}

/// Whether the identifier at `index` is not part of a qualified name
pub fn is_global_name(tokens: &TokenStream, index: usize) -> bool {
    if tokens.kind(index) != Some(TokenKind::String) {
        return false;
    }
    if tokens.kind(index + 1) == Some(TokenKind::NsSeparator) {
        return false;
    }
    if index >= 1 && tokens.kind(index - 1) == Some(TokenKind::NsSeparator) {
        return !(index >= 2 && tokens.kind(index - 2) == Some(TokenKind::String));
    }
    true
}

/// Indices of identifiers used as global function calls: `name(`, `\name(`
pub fn function_calls(tokens: &TokenStream) -> Vec<usize> {
    (0..tokens.len())
        .filter(|&i| is_function_call(tokens, i))
        .collect()
}

fn is_function_call(tokens: &TokenStream, index: usize) -> bool {
    if !is_global_name(tokens, index) {
        return false;
    }
    let opens_call = next_significant(tokens, index)
        .and_then(|n| tokens.kind(n))
        .is_some_and(|k| k == TokenKind::OpenParenthesis);
    if !opens_call {
        return false;
    }

    let first = if index >= 1 && tokens.kind(index - 1) == Some(TokenKind::NsSeparator) {
        index - 1
    } else {
        index
    };
    let Some(before) = previous_significant(tokens, first) else {
        return true;
    };
    if is_by_reference_declaration(tokens, before) {
        return false;
    }
    !tokens
        .kind(before)
        .is_some_and(|k| NOT_A_CALL_AFTER.contains(&k))
}

/// `function &name(`
fn is_by_reference_declaration(tokens: &TokenStream, ampersand: usize) -> bool {
    tokens.get(ampersand).is_some_and(|t| t.content == "&")
        && previous_significant(tokens, ampersand)
            .and_then(|p| tokens.kind(p))
            .is_some_and(|k| k == TokenKind::Function)
}

/// Indices of global class names referenced by `new X`, `X::`,
/// `extends X`, `implements X, Y` and `catch (X | Y $e)`
pub fn class_references(tokens: &TokenStream) -> Vec<usize> {
    let mut found = BTreeSet::new();

    for i in 0..tokens.len() {
        let Some(kind) = tokens.kind(i) else { continue };
        match kind {
            TokenKind::New | TokenKind::Extends => {
                if let Some(name) = name_after(tokens, i) {
                    found.insert(name);
                }
            }
            TokenKind::Implements => {
                let end = tokens
                    .find_next(&[TokenKind::OpenCurlyBracket], i + 1, tokens.len(), false)
                    .unwrap_or(tokens.len());
                found.extend((i + 1..end).filter(|&j| is_global_name(tokens, j)));
            }
            TokenKind::Catch => {
                let Some(open) = next_significant(tokens, i)
                    .filter(|&o| tokens.kind(o) == Some(TokenKind::OpenParenthesis))
                else {
                    continue;
                };
                let end = tokens
                    .find_next(&[TokenKind::CloseParenthesis], open + 1, tokens.len(), false)
                    .unwrap_or(tokens.len());
                found.extend((open + 1..end).filter(|&j| is_global_name(tokens, j)));
            }
            TokenKind::String => {
                let static_access = next_significant(tokens, i)
                    .is_some_and(|n| tokens.kind(n) == Some(TokenKind::DoubleColon));
                if static_access && is_global_name(tokens, i) && !is_relative_class(tokens, i) {
                    found.insert(i);
                }
            }
            _ => {}
        }
    }

    found.into_iter().collect()
}

fn name_after(tokens: &TokenStream, index: usize) -> Option<usize> {
    let mut name = next_significant(tokens, index)?;
    if tokens.kind(name) == Some(TokenKind::NsSeparator) {
        name += 1;
    }
    is_global_name(tokens, name).then_some(name)
}

fn is_relative_class(tokens: &TokenStream, index: usize) -> bool {
    tokens.get(index).is_some_and(|t| {
        ["self", "static", "parent"]
            .iter()
            .any(|r| t.content.eq_ignore_ascii_case(r))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::tokenize;

    fn names(source: &str, find: fn(&TokenStream) -> Vec<usize>) -> Vec<String> {
        let tokens = tokenize(source);
        find(&tokens)
            .into_iter()
            .map(|i| tokens.get(i).unwrap().content.clone())
            .collect()
    }

    #[test]
    fn test_function_calls() {
        let found = names(
            "<?php foo(); \\bar(1); $o->baz(); A::qux(); new Quux(); function decl() {} Ns\\sub();",
            function_calls,
        );
        assert_eq!(found, vec!["foo", "bar"]);
    }

    #[test]
    fn test_function_call_with_space_and_comment() {
        let found = names("<?php each /* x */ ($a);", function_calls);
        assert_eq!(found, vec!["each"]);
    }

    #[test]
    fn test_by_reference_declaration_is_not_a_call() {
        let found = names(
            "<?php function &each() {} $r = &split(); $m = $a & mysql_query();",
            function_calls,
        );
        assert_eq!(found, vec!["split", "mysql_query"]);
    }

    #[test]
    fn test_class_references() {
        let source = "<?php
class A extends Error implements JsonSerializable, Ns\\Iface, \\Stringable {}
$x = new \\WeakMap();
Fiber::suspend();
static::make();
try {} catch (TypeError | ValueError $e) {}
new Vendor\\Thing();
";
        let found = names(source, class_references);
        assert_eq!(
            found,
            vec![
                "Error",
                "JsonSerializable",
                "Stringable",
                "WeakMap",
                "Fiber",
                "TypeError",
                "ValueError",
            ]
        );
    }
}
