//! Detection of constant arithmetic such as `1 + 2 * -3`

use crate::numeric::NumericEvaluator;
use phpcompat_core::TokenKind;

/// Tokens skipped when looking for the operand before an operator
const OPERAND_SKIP: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Comment,
    TokenKind::DocComment,
    TokenKind::Plus,
    TokenKind::Minus,
];

impl<'t> NumericEvaluator<'t> {
    /// Whether `start..=end` consists only of numeric literals joined by
    /// arithmetic operators. Unary signs belong to the following literal.
    pub fn is_numeric_calculation(&self, start: usize, end: usize) -> bool {
        if start > end || end >= self.tokens.len() {
            return false;
        }
        let search_end = end + 1;

        let Some(mut operator) = self.next_binary_operator(start, search_end) else {
            return false;
        };
        let mut segment_start = start;
        let mut segment_end = operator - 1;

        while self.evaluate(segment_start, segment_end, true).is_some() {
            segment_start = operator + 1;
            match self.next_binary_operator(segment_start, search_end) {
                Some(next) => {
                    operator = next;
                    segment_end = next - 1;
                }
                None => return self.evaluate(segment_start, end, true).is_some(),
            }
        }

        false
    }

    /// Next arithmetic operator that follows an operand, skipping the sign
    /// run that may lead the operand.
    fn next_binary_operator(&self, from: usize, search_end: usize) -> Option<usize> {
        let operand = self.tokens.find_next(OPERAND_SKIP, from, search_end, true)?;
        self.tokens
            .find_next(TokenKind::ARITHMETIC, operand + 1, search_end, false)
    }

    /// Whole-stream convenience
    pub fn is_numeric_calculation_all(&self) -> bool {
        match self.tokens.len().checked_sub(1) {
            Some(last) => self.is_numeric_calculation(0, last),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::numeric::{NumericEvaluator, NumericPolicy};
    use phpcompat_core::tokenize_snippet;

    fn is_calculation(source: &str) -> bool {
        let tokens = tokenize_snippet(source);
        NumericEvaluator::new(&tokens, NumericPolicy::default()).is_numeric_calculation_all()
    }

    #[test]
    fn test_simple_calculations() {
        assert!(is_calculation("1 + 2"));
        assert!(is_calculation("2 ** 3"));
        assert!(is_calculation("10 % 3 * 4 / 2"));
        assert!(is_calculation("1.5 * 2"));
        assert!(is_calculation("'5' - true"));
    }

    #[test]
    fn test_signed_operands() {
        assert!(is_calculation("-1 * 3"));
        assert!(is_calculation("1 - -2"));
        assert!(is_calculation("- 1 + + 2"));
    }

    #[test]
    fn test_single_literal_is_not_a_calculation() {
        assert!(!is_calculation("42"));
        assert!(!is_calculation("-42"));
        assert!(!is_calculation("- - 42"));
    }

    #[test]
    fn test_non_literal_operands() {
        assert!(!is_calculation("1 + $a"));
        assert!(!is_calculation("$a * 2"));
        assert!(!is_calculation("1 + foo()"));
        assert!(!is_calculation("1 +"));
        assert!(!is_calculation("'a' . 'b'"));
    }

    #[test]
    fn test_sub_range() {
        let tokens = tokenize_snippet("$x = 1 + 2;");
        let evaluator = NumericEvaluator::new(&tokens, NumericPolicy::default());
        // "$x", " ", "=", " ", "1", " ", "+", " ", "2", ";"
        assert!(evaluator.is_numeric_calculation(3, 8));
        assert!(!evaluator.is_numeric_calculation(0, 8));
        assert!(!evaluator.is_numeric_calculation(3, 9));
    }
}
