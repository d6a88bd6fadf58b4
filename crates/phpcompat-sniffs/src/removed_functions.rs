//! Sniff: Calls to functions deprecated or removed from PHP core
//!
//! A removal is reported as an error, a deprecation alone as a warning.
//! Only versions up to the top of the tested range are considered, so
//! `each()` with `testVersion = 7.2` is a deprecation, not a removal.

use crate::classifier::{build_deprecated_removed_message, deprecated_removed_within};
use crate::patterns::function_calls;
use crate::registry::{Sniff, SniffContext};
use crate::tables;
use phpcompat_core::{error_code_for, Diagnostic, TokenStream};

/// Check a token stream for calls to deprecated or removed functions
pub fn check_removed_functions(tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
    let table = tables::removed_functions();
    let mut diagnostics = Vec::new();

    for index in function_calls(tokens) {
        let Some(token) = tokens.get(index) else { continue };
        let Some(lifecycle) = table.get(&token.content) else { continue };

        let info = deprecated_removed_within(lifecycle, ctx.range);
        let code = error_code_for(&token.content);
        if let Some(message) = build_deprecated_removed_message(&token.content, &code, &info) {
            diagnostics.push(
                message
                    .with_override(lifecycle.message_override())
                    .into_diagnostic(RemovedFunctionsSniff.name(), token),
            );
        }
    }

    diagnostics
}

pub struct RemovedFunctionsSniff;

impl Sniff for RemovedFunctionsSniff {
    fn name(&self) -> &'static str {
        "removed_functions"
    }

    fn description(&self) -> &'static str {
        "Detect calls to functions deprecated or removed in the tested PHP versions"
    }

    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
        check_removed_functions(tokens, ctx)
    }
}
