//! Sniff trait and registry for phpcompat sniffs

use crate::numeric::NumericPolicy;
use phpcompat_core::{Diagnostic, TestedVersionRange, TokenStream};
use std::collections::HashSet;

/// Per-run settings handed to every sniff
#[derive(Debug, Clone, Copy)]
pub struct SniffContext<'r> {
    pub range: &'r TestedVersionRange,
}

impl<'r> SniffContext<'r> {
    pub fn new(range: &'r TestedVersionRange) -> Self {
        Self { range }
    }

    pub fn numeric_policy(&self) -> NumericPolicy {
        NumericPolicy::for_range(self.range)
    }
}

/// A compatibility check over one file's tokens
pub trait Sniff: Send + Sync {
    /// The unique identifier for this sniff (e.g., "removed_functions")
    fn name(&self) -> &'static str;

    /// A short description of what this sniff reports
    fn description(&self) -> &'static str;

    /// Check a token stream and return findings
    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic>;
}

/// Registry of all available sniffs
pub struct SniffRegistry {
    sniffs: Vec<Box<dyn Sniff>>,
}

impl SniffRegistry {
    /// Create a new registry with all built-in sniffs
    pub fn new() -> Self {
        let mut registry = Self { sniffs: Vec::new() };

        registry.register(Box::new(crate::removed_functions::RemovedFunctionsSniff));
        registry.register(Box::new(crate::new_functions::NewFunctionsSniff));
        registry.register(Box::new(crate::new_classes::NewClassesSniff));
        registry.register(Box::new(crate::removed_extensions::RemovedExtensionsSniff));
        registry.register(Box::new(
            crate::forbidden_negative_bitshift::ForbiddenNegativeBitshiftSniff,
        ));
        registry.register(Box::new(
            crate::constant_scalar_expressions::ConstantScalarExpressionsSniff,
        ));

        registry
    }

    /// Register a new sniff
    pub fn register(&mut self, sniff: Box<dyn Sniff>) {
        self.sniffs.push(sniff);
    }

    /// Get all sniff names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.name()).collect()
    }

    /// Get sniffs filtered by enabled names
    pub fn get_enabled(&self, enabled: &HashSet<String>) -> Vec<&dyn Sniff> {
        self.sniffs
            .iter()
            .filter(|s| enabled.contains(s.name()))
            .map(|s| s.as_ref())
            .collect()
    }

    /// Get all sniffs with their descriptions (for --list-sniffs)
    pub fn list_sniffs(&self) -> Vec<(&'static str, &'static str)> {
        self.sniffs
            .iter()
            .map(|s| (s.name(), s.description()))
            .collect()
    }

    /// Run all enabled sniffs, ordering findings by position
    pub fn check_all(
        &self,
        tokens: &TokenStream,
        ctx: &SniffContext<'_>,
        enabled: &HashSet<String>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for sniff in self.get_enabled(enabled) {
            diagnostics.extend(sniff.check(tokens, ctx));
        }
        diagnostics.sort_by_key(|d| (d.line, d.column));
        diagnostics
    }
}

impl Default for SniffRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::tokenize;

    fn all_enabled(registry: &SniffRegistry) -> HashSet<String> {
        registry.all_names().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let registry = SniffRegistry::new();
        let names = registry.all_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), 6);
        assert_eq!(unique.len(), names.len());
        assert!(registry
            .list_sniffs()
            .iter()
            .all(|(_, description)| !description.is_empty()));
    }

    #[test]
    fn test_get_enabled_filters() {
        let registry = SniffRegistry::new();
        let enabled: HashSet<String> = ["new_functions".to_string()].into_iter().collect();
        let sniffs = registry.get_enabled(&enabled);
        assert_eq!(sniffs.len(), 1);
        assert_eq!(sniffs[0].name(), "new_functions");
    }

    #[test]
    fn test_check_all_sorts_by_position() {
        let registry = SniffRegistry::new();
        let tokens = tokenize("<?php\n$a = array_key_first($b);\n$c = each($d);\n");
        let range = TestedVersionRange::parse("7.0-8.0").unwrap();
        let ctx = SniffContext::new(&range);

        let diagnostics = registry.check_all(&tokens, &ctx, &all_enabled(&registry));
        let lines: Vec<_> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 3]);
        assert_eq!(diagnostics[0].code, "array_key_firstFound");
        assert_eq!(diagnostics[1].code, "eachDeprecatedRemoved");
    }

    #[test]
    fn test_unbounded_range_reports_only_removals() {
        let registry = SniffRegistry::new();
        let tokens = tokenize("<?php array_key_first($b); each($d);");
        let range = TestedVersionRange::unbounded();
        let diagnostics =
            registry.check_all(&tokens, &SniffContext::new(&range), &all_enabled(&registry));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].sniff, "removed_functions");
    }
}
