//! Diagnostics produced by sniffs
//!
//! A diagnostic carries a `%s` message template plus the values to
//! interpolate, mirroring what a host diagnostic sink receives. Rendering is
//! left to the consumer via [`Diagnostic::render`].

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The construct does not work on a version in the tested range
    Error,
    /// The construct still works but is deprecated in the tested range
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding at a token position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Sniff that produced the finding (e.g. "removed_functions")
    pub sniff: String,
    /// Error code, e.g. "mysql_queryRemoved"
    pub code: String,
    pub severity: Severity,
    /// Message template with `%s` placeholders
    pub message: String,
    /// Values for the placeholders, in order
    pub data: Vec<String>,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl Diagnostic {
    pub fn new(
        sniff: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            sniff: sniff.into(),
            code: code.into(),
            severity,
            message: message.into(),
            data: Vec::new(),
            line: 1,
            column: 1,
        }
    }

    pub fn with_data(mut self, data: Vec<String>) -> Self {
        self.data = data;
        self
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Interpolate `data` into the `%s` placeholders of `message`.
    ///
    /// Missing values leave the placeholder empty; surplus values are ignored.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.message.len());
        let mut values = self.data.iter();
        let mut rest = self.message.as_str();

        while let Some(idx) = rest.find("%s") {
            out.push_str(&rest[..idx]);
            if let Some(value) = values.next() {
                out.push_str(value);
            }
            rest = &rest[idx + 2..];
        }
        out.push_str(rest);
        out
    }
}

/// Normalise an arbitrary name into an error-code fragment:
/// lowercase, with every character outside `[a-z0-9_]` replaced by `_`.
pub fn error_code_for(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_interpolates_in_order() {
        let diagnostic = Diagnostic::new(
            "removed_functions",
            Severity::Error,
            "%s is deprecated since PHP %s and removed since PHP %s",
            "eachDeprecatedRemoved",
        )
        .with_data(vec!["each".into(), "7.2".into(), "8.0".into()]);

        assert_eq!(
            diagnostic.render(),
            "each is deprecated since PHP 7.2 and removed since PHP 8.0"
        );
    }

    #[test]
    fn test_render_with_missing_values() {
        let diagnostic = Diagnostic::new("x", Severity::Warning, "%s and %s", "x");
        assert_eq!(diagnostic.render(), " and ");
    }

    #[test]
    fn test_error_code_for() {
        assert_eq!(error_code_for("mysql_query"), "mysql_query");
        assert_eq!(error_code_for("Foo\\Bar::baz"), "foo_bar__baz");
        assert_eq!(error_code_for("ArgumentCountError"), "argumentcounterror");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
