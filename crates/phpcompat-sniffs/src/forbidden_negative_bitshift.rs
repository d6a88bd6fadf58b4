//! Sniff: Bitwise shifts by a negative constant
//!
//! `1 << -1` throws an ArithmeticError as of PHP 7.0. Only right operands
//! that fold to a definite negative number are reported.

use crate::numeric::NumericEvaluator;
use crate::registry::{Sniff, SniffContext};
use phpcompat_core::{Diagnostic, Severity, TokenKind, TokenStream};

const SHIFT_OPERATORS: &[TokenKind] = &[
    TokenKind::ShiftLeft,
    TokenKind::ShiftRight,
    TokenKind::ShiftLeftEqual,
    TokenKind::ShiftRightEqual,
];

/// Check a token stream for shifts by a negative number
pub fn check_forbidden_negative_bitshift(
    tokens: &TokenStream,
    ctx: &SniffContext<'_>,
) -> Vec<Diagnostic> {
    if !ctx.range.supports_above("7.0") {
        return Vec::new();
    }

    let evaluator = NumericEvaluator::new(tokens, ctx.numeric_policy());
    let mut diagnostics = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if !SHIFT_OPERATORS.contains(&token.kind) {
            continue;
        }

        let start = index + 1;
        let terminator = tokens.find_end_of_statement(start);
        if terminator <= start {
            continue;
        }
        let end = terminator - 1;
        if !evaluator.is_negative(start, end, true) {
            continue;
        }

        let operand: String = tokens.tokens()[start..=end]
            .iter()
            .map(|t| t.content.as_str())
            .collect();

        diagnostics.push(
            Diagnostic::new(
                ForbiddenNegativeBitshiftSniff.name(),
                Severity::Error,
                "Bitwise shifts by negative number will throw an ArithmeticError in PHP 7.0. Found: %s",
                "Found",
            )
            .with_data(vec![operand.trim().to_string()])
            .at(token.line, token.column),
        );
    }

    diagnostics
}

pub struct ForbiddenNegativeBitshiftSniff;

impl Sniff for ForbiddenNegativeBitshiftSniff {
    fn name(&self) -> &'static str {
        "forbidden_negative_bitshift"
    }

    fn description(&self) -> &'static str {
        "Detect bitwise shifts by a negative number (ArithmeticError since PHP 7.0)"
    }

    fn check(&self, tokens: &TokenStream, ctx: &SniffContext<'_>) -> Vec<Diagnostic> {
        check_forbidden_negative_bitshift(tokens, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, TestedVersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<String> {
        let range = TestedVersionRange::parse(test_version).unwrap();
        check_forbidden_negative_bitshift(&tokenize(source), &SniffContext::new(&range))
            .iter()
            .map(|d| d.render())
            .collect()
    }

    #[test]
    fn test_negative_shift() {
        let found = check_php("<?php $a = 1 << -1;", "5.6-7.0");
        assert_eq!(
            found,
            vec!["Bitwise shifts by negative number will throw an ArithmeticError in PHP 7.0. Found: -1"]
        );
    }

    #[test]
    fn test_all_shift_forms() {
        let source = "<?php $a >>= -2; $b <<= - 3; foo($c >> -'4', 1);";
        assert_eq!(check_php(source, "7.0").len(), 3);
    }

    #[test]
    fn test_non_negative_or_unknown_operands() {
        let source = "<?php $a = 1 << 2; $b = 1 << - -2; $c = 1 << -$n; $d = 1 << -0; $e = 1 << -1 + 3;";
        assert!(check_php(source, "7.0").is_empty());
    }

    #[test]
    fn test_range_entirely_before_php7() {
        assert!(check_php("<?php $a = 1 << -1;", "5.3-5.6").is_empty());
    }
}
