//! Sniff: Arithmetic in `const` declarations
//!
//! `const A = 1 + 2;` requires PHP 5.6. Only values made of numeric literals
//! and arithmetic operators are recognised.

use crate::numeric::NumericEvaluator;
use crate::patterns::previous_significant;
use crate::registry::{Sniff, SniffContext};
use phpcompat_core::{Diagnostic, Severity, TokenKind, TokenStream};

/// Check a token stream for constant declarations with calculated values
pub fn check_constant_scalar_expressions(
    tokens: &TokenStream,
    ctx: &SniffContext<'_>,
) -> Vec<Diagnostic> {
    if !ctx.range.supports_below("5.5") {
        return Vec::new();
    }

    let evaluator = NumericEvaluator::new(tokens, ctx.numeric_policy());
    let mut diagnostics = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Const {
            continue;
        }
        // `use const Foo\BAR;`
        if previous_significant(tokens, index).and_then(|p| tokens.kind(p)) == Some(TokenKind::Use)
        {
            continue;
        }

        let statement_end = tokens
            .find_next(&[TokenKind::Semicolon], index + 1, tokens.len(), false)
            .unwrap_or(tokens.len());
        let mut cursor = index + 1;

        while let Some(equal) = tokens.find_next(&[TokenKind::Equal], cursor, statement_end, false) {
            let start = equal + 1;
            let terminator = tokens.find_end_of_statement(start).min(statement_end);
            cursor = terminator + 1;
            if terminator <= start || !evaluator.is_numeric_calculation(start, terminator - 1) {
                continue;
            }

            let Some(name) = previous_significant(tokens, equal).and_then(|n| tokens.get(n))
            else {
                continue;
            };
            let value: String = tokens.tokens()[start..terminator]
                .iter()
                .map(|t| t.content.as_str())
                .collect();

            diagnostics.push(
                Diagnostic::new(
                    ConstantScalarExpressionsSniff.name(),
                    Severity::Error,
                    "Constant scalar expressions are not allowed when defining constants using the const keyword in PHP 5.5 or earlier. Found: %s = %s",
                    "constFound",
                )
                .with_data(vec![name.content.clone(), value.trim().to_string()])
                .at(name.line, name.column),
            );
        }
    }

    diagnostics
}

pub struct ConstantScalarExpressionsSniff;

impl Sniff for ConstantScalarExpressionsSniff {
    fn name(&self) -> &'static str {
        "constant_scalar_expressions"
    }

    fn description(&self) -> &'static str {
        "Detect arithmetic in const declarations (requires PHP 5.6)"
    }

    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
        check_constant_scalar_expressions(tokens, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, TestedVersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let range = TestedVersionRange::parse(test_version).unwrap();
        check_constant_scalar_expressions(&tokenize(source), &SniffContext::new(&range))
    }

    #[test]
    fn test_global_and_class_constants() {
        let source = "<?php\nconst A = 1 + 2, B = 3;\nclass C {\n    const D = 2 ** -8;\n}\n";
        let diagnostics = check_php(source, "5.4-7.0");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].data, vec!["A".to_string(), "1 + 2".to_string()]);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[1].data, vec!["D".to_string(), "2 ** -8".to_string()]);
        assert_eq!(diagnostics[1].line, 4);
        assert_eq!(diagnostics[1].code, "constFound");
    }

    #[test]
    fn test_non_numeric_values() {
        let source = "<?php const A = 'a' . 'b'; const B = OTHER + 1; use const Foo\\BAR;";
        assert!(check_php(source, "5.3").is_empty());
    }

    #[test]
    fn test_range_starting_at_php56() {
        assert!(check_php("<?php const A = 1 + 2;", "5.6-").is_empty());
    }
}
