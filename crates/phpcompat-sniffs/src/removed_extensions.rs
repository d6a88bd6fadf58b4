//! Sniff: Calls into extensions deprecated or removed from the PHP distribution
//!
//! A call is attributed to an extension by function-name prefix (`mysql_`,
//! `mcrypt_`, ...). Functions with their own entry in the removed-functions
//! table are left to that sniff.

use crate::classifier::{build_deprecated_removed_message, deprecated_removed_within};
use crate::patterns::function_calls;
use crate::registry::{Sniff, SniffContext};
use crate::tables;
use phpcompat_core::{error_code_for, Diagnostic, TokenStream};

/// Check a token stream for calls into removed extensions
pub fn check_removed_extensions(tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
    let extensions = tables::removed_extensions();
    let functions = tables::removed_functions();
    let mut diagnostics = Vec::new();

    for index in function_calls(tokens) {
        let Some(token) = tokens.get(index) else { continue };
        let function = token.content.to_lowercase();
        if functions.contains(&function) {
            continue;
        }

        for (extension, lifecycle) in extensions.iter() {
            let prefix = lifecycle
                .extra("prefix")
                .map(str::to_lowercase)
                .unwrap_or_else(|| format!("{}_", extension.to_lowercase()));
            if !function.starts_with(&prefix) {
                continue;
            }

            let info = deprecated_removed_within(lifecycle, ctx.range);
            let label = format!("Extension '{}'", extension);
            if let Some(message) =
                build_deprecated_removed_message(&label, &error_code_for(extension), &info)
            {
                diagnostics.push(
                    message
                        .with_override(lifecycle.message_override())
                        .into_diagnostic(RemovedExtensionsSniff.name(), token),
                );
            }
            break;
        }
    }

    diagnostics
}

pub struct RemovedExtensionsSniff;

impl Sniff for RemovedExtensionsSniff {
    fn name(&self) -> &'static str {
        "removed_extensions"
    }

    fn description(&self) -> &'static str {
        "Detect use of PHP extensions deprecated or removed in the tested versions"
    }

    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
        check_removed_extensions(tokens, ctx)
    }
}
