//! Constant numeric evaluation of short token runs
//!
//! Folds a token run such as `- -'12abc'` or `<<<EOT 0x1A EOT` to a number
//! when it is a single (possibly signed) literal. Anything else yields
//! `None`, which callers must treat as "undetermined", never as "not a number".

use phpcompat_core::{TestedVersionRange, TokenKind, TokenStream};
use regex::Regex;
use std::sync::OnceLock;

/// A definite numeric result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Truncating conversion; out-of-range floats saturate
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Int(i) => i,
            Number::Float(f) => f as i64,
        }
    }

    pub fn is_positive(self) -> bool {
        match self {
            Number::Int(i) => i > 0,
            Number::Float(f) => f > 0.0,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Number::Int(i) => i < 0,
            Number::Float(f) => f < 0.0,
        }
    }

    fn negate(self) -> Self {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map(Number::Int)
                .unwrap_or(Number::Float(-(i as f64))),
            Number::Float(f) => Number::Float(-f),
        }
    }
}

/// Coercion rules that depend on the targeted PHP versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumericPolicy {
    /// `"0x1A"` coerces to 26 rather than 0
    pub legacy_hex_strings: bool,
}

impl NumericPolicy {
    /// Hex numeric strings stopped being numeric in PHP 7.0
    pub fn for_range(range: &TestedVersionRange) -> Self {
        Self {
            legacy_hex_strings: range.supports_below("5.6"),
        }
    }
}

fn int_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[0-9]+").unwrap())
}

fn float_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:[+-]?(?:[0-9]+|[0-9]*\.[0-9]+|[0-9]+\.[0-9]*)[eE][+-]?[0-9]+|[0-9]*\.[0-9]+|[0-9]+\.[0-9]*)",
        )
        .unwrap()
    })
}

fn hex_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*0[xX]([A-Fa-f0-9]+)").unwrap())
}

/// Evaluates literal runs within one token stream
pub struct NumericEvaluator<'t> {
    pub(crate) tokens: &'t TokenStream,
    policy: NumericPolicy,
}

impl<'t> NumericEvaluator<'t> {
    pub fn new(tokens: &'t TokenStream, policy: NumericPolicy) -> Self {
        Self { tokens, policy }
    }

    /// Evaluate `start..=end` as a single signed literal.
    ///
    /// Integer mode truncates and refuses float literals and float-looking
    /// strings; float mode always yields [`Number::Float`].
    pub fn evaluate(&self, start: usize, end: usize, allow_float: bool) -> Option<Number> {
        let tokens = self.tokens;
        if start > end || end >= tokens.len() {
            return None;
        }
        let search_end = end + 1;

        let mut negative = false;
        let mut cursor = tokens.next_non_empty(start, search_end);
        while let Some(i) = cursor {
            match tokens.kind(i)? {
                TokenKind::Minus => negative = !negative,
                TokenKind::Plus => {}
                _ => break,
            }
            cursor = tokens.next_non_empty(i + 1, search_end);
        }
        let literal = cursor?;
        let token = tokens.get(literal)?;

        let (value, last) = match token.kind {
            TokenKind::LNumber => (parse_int_literal(&token.content)?, literal),
            TokenKind::DNumber if allow_float => (parse_float_literal(&token.content)?, literal),
            TokenKind::True => (Number::Int(1), literal),
            TokenKind::False | TokenKind::Null => (Number::Int(0), literal),
            TokenKind::StartHeredoc | TokenKind::StartNowdoc => {
                let body = tokens.find_next(
                    &[TokenKind::Heredoc, TokenKind::Nowdoc],
                    literal + 1,
                    search_end,
                    false,
                )?;
                let closer = tokens.find_next(
                    &[TokenKind::EndHeredoc, TokenKind::EndNowdoc],
                    body + 1,
                    search_end,
                    false,
                )?;
                let content = &tokens.get(body)?.content;
                (self.coerce_string(content, allow_float)?, closer)
            }
            kind if kind.is_string() => {
                let mut content = String::new();
                let mut last = literal;
                for i in literal..search_end {
                    match tokens.get(i) {
                        Some(t) if t.kind == kind => {
                            content.push_str(&t.content);
                            last = i;
                        }
                        _ => break,
                    }
                }
                (self.coerce_string(strip_quotes(&content), allow_float)?, last)
            }
            _ => return None,
        };

        if tokens.next_non_empty(last + 1, search_end).is_some() {
            return None;
        }

        let value = if negative { value.negate() } else { value };
        Some(if allow_float {
            Number::Float(value.as_f64())
        } else {
            Number::Int(value.as_i64())
        })
    }

    /// Evaluate the whole stream
    pub fn evaluate_all(&self, allow_float: bool) -> Option<Number> {
        let last = self.tokens.len().checked_sub(1)?;
        self.evaluate(0, last, allow_float)
    }

    pub fn is_positive(&self, start: usize, end: usize, allow_float: bool) -> bool {
        self.evaluate(start, end, allow_float)
            .is_some_and(Number::is_positive)
    }

    pub fn is_negative(&self, start: usize, end: usize, allow_float: bool) -> bool {
        self.evaluate(start, end, allow_float)
            .is_some_and(Number::is_negative)
    }

    /// Numeric-string coercion of a string literal's text
    fn coerce_string(&self, content: &str, allow_float: bool) -> Option<Number> {
        let int_prefix = int_prefix_regex().find(content).map(|m| m.as_str().trim());
        let float_prefix = float_prefix_regex().find(content).map(|m| m.as_str().trim());

        let mut value = if allow_float {
            match (float_prefix, int_prefix) {
                (Some(f), _) => Number::Float(f.parse::<f64>().unwrap_or(0.0)),
                (None, Some(i)) => Number::Float(i.parse::<f64>().unwrap_or(0.0)),
                (None, None) => Number::Float(0.0),
            }
        } else {
            if float_prefix.is_some() {
                return None;
            }
            match int_prefix {
                Some(i) => parse_decimal(i),
                None => Number::Int(0),
            }
        };

        if self.policy.legacy_hex_strings && int_prefix == Some("0") {
            if let Some(caps) = hex_prefix_regex().captures(content) {
                if let Ok(hex) = i64::from_str_radix(&caps[1], 16) {
                    value = if allow_float {
                        Number::Float(hex as f64)
                    } else {
                        Number::Int(hex)
                    };
                }
            }
        }

        Some(value)
    }
}

/// Strip one pair of matching surrounding quotes
fn strip_quotes(content: &str) -> &str {
    let bytes = content.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return &content[1..content.len() - 1];
        }
    }
    content
}

fn parse_decimal(digits: &str) -> Number {
    match digits.parse::<i64>() {
        Ok(i) => Number::Int(i),
        Err(_) => Number::Float(digits.parse::<f64>().unwrap_or(f64::INFINITY)),
    }
}

/// Integer literal in any PHP notation; overflow becomes a float like PHP does
fn parse_int_literal(content: &str) -> Option<Number> {
    let cleaned: String = content.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (oct, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        return Some(parse_decimal(&lower));
    };

    if digits.is_empty() {
        return None;
    }
    match i64::from_str_radix(digits, radix) {
        Ok(i) => Some(Number::Int(i)),
        Err(_) => {
            let mut acc = 0f64;
            for c in digits.chars() {
                acc = acc * f64::from(radix) + f64::from(c.to_digit(radix)?);
            }
            Some(Number::Float(acc))
        }
    }
}

fn parse_float_literal(content: &str) -> Option<Number> {
    let cleaned: String = content.chars().filter(|&c| c != '_').collect();
    cleaned.parse::<f64>().ok().map(Number::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::tokenize_snippet;

    fn eval_with(source: &str, allow_float: bool, policy: NumericPolicy) -> Option<Number> {
        let tokens = tokenize_snippet(source);
        NumericEvaluator::new(&tokens, policy).evaluate_all(allow_float)
    }

    fn eval(source: &str, allow_float: bool) -> Option<Number> {
        eval_with(source, allow_float, NumericPolicy::default())
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(eval("42", false), Some(Number::Int(42)));
        assert_eq!(eval("0x1A", false), Some(Number::Int(26)));
        assert_eq!(eval("0b101", false), Some(Number::Int(5)));
        assert_eq!(eval("017", false), Some(Number::Int(15)));
        assert_eq!(eval("0o17", false), Some(Number::Int(15)));
        assert_eq!(eval("1_000", false), Some(Number::Int(1000)));
        assert_eq!(eval("0", false), Some(Number::Int(0)));
    }

    #[test]
    fn test_sign_runs() {
        assert_eq!(eval("-5", false), Some(Number::Int(-5)));
        assert_eq!(eval("- -5", false), Some(Number::Int(5)));
        assert_eq!(eval("+ - /* c */ + 5", false), Some(Number::Int(-5)));
        assert_eq!(eval("-", false), None);
    }

    #[test]
    fn test_float_literals_need_allow_float() {
        assert_eq!(eval("1.5", false), None);
        assert_eq!(eval("1.5", true), Some(Number::Float(1.5)));
        assert_eq!(eval("-1e3", true), Some(Number::Float(-1000.0)));
        assert_eq!(eval("3", true), Some(Number::Float(3.0)));
    }

    #[test]
    fn test_keyword_literals() {
        assert_eq!(eval("true", false), Some(Number::Int(1)));
        assert_eq!(eval("-TRUE", false), Some(Number::Int(-1)));
        assert_eq!(eval("false", false), Some(Number::Int(0)));
        assert_eq!(eval("null", true), Some(Number::Float(0.0)));
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(eval("'12abc'", false), Some(Number::Int(12)));
        assert_eq!(eval("' 7'", false), Some(Number::Int(7)));
        assert_eq!(eval("'abc'", false), Some(Number::Int(0)));
        assert_eq!(eval("\"1.5\"", false), None);
        assert_eq!(eval("\"1.5\"", true), Some(Number::Float(1.5)));
        assert_eq!(eval("'2e2'", true), Some(Number::Float(200.0)));
        assert_eq!(eval("-'3'", false), Some(Number::Int(-3)));
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        assert_eq!(eval("<<<EOT\n42\nEOT", false), Some(Number::Int(42)));
        assert_eq!(eval("-<<<'EOT'\n1.25\nEOT", true), Some(Number::Float(-1.25)));
    }

    #[test]
    fn test_legacy_hex_strings() {
        let legacy = NumericPolicy {
            legacy_hex_strings: true,
        };
        assert_eq!(eval_with("'0x1A'", false, legacy), Some(Number::Int(26)));
        assert_eq!(eval("'0x1A'", false), Some(Number::Int(0)));
        assert_eq!(eval_with("'10x1A'", false, legacy), Some(Number::Int(10)));
    }

    #[test]
    fn test_policy_for_range() {
        let old = TestedVersionRange::parse("5.3-7.4").unwrap();
        assert!(NumericPolicy::for_range(&old).legacy_hex_strings);
        let new = TestedVersionRange::parse("7.0-").unwrap();
        assert!(!NumericPolicy::for_range(&new).legacy_hex_strings);
        assert!(!NumericPolicy::for_range(&TestedVersionRange::unbounded()).legacy_hex_strings);
    }

    #[test]
    fn test_trailing_tokens_are_undetermined() {
        assert_eq!(eval("1 + 2", false), None);
        assert_eq!(eval("'1' . '2'", false), None);
        assert_eq!(eval("$a", false), None);
        assert_eq!(eval("foo()", false), None);
        assert_eq!(eval("5 // trailing comment", false), Some(Number::Int(5)));
    }

    #[test]
    fn test_zero_is_distinct_from_undetermined() {
        let tokens = tokenize_snippet("-0");
        let evaluator = NumericEvaluator::new(&tokens, NumericPolicy::default());
        assert_eq!(evaluator.evaluate_all(false), Some(Number::Int(0)));
        assert!(!evaluator.is_negative(0, 1, false));
        assert!(!evaluator.is_positive(0, 1, false));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let tokens = tokenize_snippet("1 + -2");
        let evaluator = NumericEvaluator::new(&tokens, NumericPolicy::default());
        // "1", " ", "+", " ", "-", "2"
        assert!(evaluator.is_positive(0, 0, false));
        assert!(evaluator.is_negative(4, 5, false));
        assert!(!evaluator.is_negative(4, 4, false));
        assert_eq!(evaluator.evaluate(5, 9, false), None);
        assert_eq!(evaluator.evaluate(3, 2, false), None);
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let tokens = tokenize_snippet("- -'0x1A' ");
        let evaluator = NumericEvaluator::new(
            &tokens,
            NumericPolicy {
                legacy_hex_strings: true,
            },
        );
        let last = tokens.len() - 1;

        let first = evaluator.evaluate(0, last, false);
        assert_eq!(first, Some(Number::Int(26)));
        assert_eq!(evaluator.evaluate(0, last, false), first);
        assert_eq!(evaluator.evaluate(0, last, true), Some(Number::Float(26.0)));
        assert_eq!(evaluator.evaluate(0, last, false), first);
    }
}
