//! Sniff: Calls to functions not yet available at the bottom of the tested range

use crate::classifier::{build_new_feature_message, not_in_version_within};
use crate::patterns::function_calls;
use crate::registry::{Sniff, SniffContext};
use crate::tables;
use phpcompat_core::{error_code_for, Diagnostic, TokenStream};

/// Check a token stream for calls to functions newer than the tested range
pub fn check_new_functions(tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
    let table = tables::new_functions();
    let mut diagnostics = Vec::new();

    for index in function_calls(tokens) {
        let Some(token) = tokens.get(index) else { continue };
        let Some(lifecycle) = table.get(&token.content) else { continue };

        let info = not_in_version_within(lifecycle, ctx.range);
        let code = error_code_for(&token.content);
        if let Some(message) = build_new_feature_message(&token.content, &code, &info) {
            diagnostics.push(
                message
                    .with_override(lifecycle.message_override())
                    .into_diagnostic(NewFunctionsSniff.name(), token),
            );
        }
    }

    diagnostics
}

pub struct NewFunctionsSniff;

impl Sniff for NewFunctionsSniff {
    fn name(&self) -> &'static str {
        "new_functions"
    }

    fn description(&self) -> &'static str {
        "Detect calls to functions missing from the lowest tested PHP version"
    }

    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
        check_new_functions(tokens, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, Severity, TestedVersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let range = TestedVersionRange::parse(test_version).unwrap();
        check_new_functions(&tokenize(source), &SniffContext::new(&range))
    }

    #[test]
    fn test_new_function_below_introduction() {
        let diagnostics = check_php("<?php if (str_contains($h, 'x')) {}", "7.4-8.2");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "str_containsFound");
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].render(),
            "str_contains is not present in PHP version 7.4 or earlier"
        );
    }

    #[test]
    fn test_available_throughout_range() {
        assert!(check_php("<?php str_contains($h, 'x');", "8.0-").is_empty());
    }

    #[test]
    fn test_reports_each_call() {
        let diagnostics = check_php("<?php intdiv(1, 2);\nintdiv(3, 4);", "5.6");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].line, 2);
    }

    #[test]
    fn test_method_named_like_function() {
        assert!(check_php("<?php $s->str_contains('x');", "7.0").is_empty());
    }

    #[test]
    fn test_no_lower_bound_disables() {
        let range = TestedVersionRange::unbounded();
        let diagnostics =
            check_new_functions(&tokenize("<?php array_find($a, $f);"), &SniffContext::new(&range));
        assert!(diagnostics.is_empty());
    }
}
