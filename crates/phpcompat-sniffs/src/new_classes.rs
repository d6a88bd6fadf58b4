//! Sniff: References to classes and interfaces not yet available
//!
//! Covers `new X`, `X::member`, `extends X`, `implements X` and
//! `catch (X $e)`.

use crate::classifier::{build_new_feature_message, not_in_version_within};
use crate::patterns::class_references;
use crate::registry::{Sniff, SniffContext};
use crate::tables;
use phpcompat_core::{error_code_for, Diagnostic, TokenStream};

/// Check a token stream for references to classes newer than the tested range
pub fn check_new_classes(tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
    let table = tables::new_classes();
    let mut diagnostics = Vec::new();

    for index in class_references(tokens) {
        let Some(token) = tokens.get(index) else { continue };
        let Some(lifecycle) = table.get(&token.content) else { continue };
        let name = table.canonical_name(&token.content).unwrap_or(&token.content);

        let info = not_in_version_within(lifecycle, ctx.range);
        if let Some(message) = build_new_feature_message(name, &error_code_for(name), &info) {
            diagnostics.push(
                message
                    .with_override(lifecycle.message_override())
                    .into_diagnostic(NewClassesSniff.name(), token),
            );
        }
    }

    diagnostics
}

pub struct NewClassesSniff;

impl Sniff for NewClassesSniff {
    fn name(&self) -> &'static str {
        "new_classes"
    }

    fn description(&self) -> &'static str {
        "Detect references to classes and interfaces missing from the lowest tested PHP version"
    }

    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
        check_new_classes(tokens, ctx)
    }
}
