//! Output formatting for phpcompat
//!
//! Supports text (colored terminal) and JSON output formats.

use anyhow::Result;
use colored::*;
use phpcompat_core::{Diagnostic, Severity};
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// A rendered diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticInfo {
    pub sniff: String,
    pub code: String,
    pub severity: Severity,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticInfo {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            sniff: diagnostic.sniff.clone(),
            code: diagnostic.code.clone(),
            severity: diagnostic.severity,
            line: diagnostic.line,
            column: diagnostic.column,
            message: diagnostic.render(),
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, diagnostics: Vec<DiagnosticInfo>) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_issues: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    /// Files that could not be read
    pub failures: usize,
}

impl Summary {
    pub fn total_diagnostics(&self) -> usize {
        self.total_errors + self.total_warnings
    }
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub test_version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    test_version: String,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool, test_version: String) -> Self {
        Self {
            format,
            verbose,
            test_version,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report the findings for one file
    pub fn report_file(&mut self, path: &Path, diagnostics: Vec<DiagnosticInfo>) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            if self.verbose && self.format == OutputFormat::Text {
                println!("{}: No issues found", path.display());
            }
            self.results.push(FileResult::success(path, diagnostics));
            return;
        }

        self.summary.files_with_issues += 1;
        for diagnostic in &diagnostics {
            match diagnostic.severity {
                Severity::Error => self.summary.total_errors += 1,
                Severity::Warning => self.summary.total_warnings += 1,
            }
        }

        if self.format == OutputFormat::Text {
            println!("{}", path.display().to_string().bold());
            for diagnostic in &diagnostics {
                println!("  {}", format_diagnostic(diagnostic));
            }
            println!();
        }

        self.results.push(FileResult::success(path, diagnostics));
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.failures += 1;

        if self.format == OutputFormat::Text {
            eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), error);
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!("{}", "Summary".bold().underline());
                println!("  Test version: {}", self.test_version);
                println!("  Files processed: {}", self.summary.files_processed);
                println!("  Files with issues: {}", self.summary.files_with_issues);
                println!("  Errors: {}", self.summary.total_errors);
                println!("  Warnings: {}", self.summary.total_warnings);
                if self.summary.failures > 0 {
                    println!("  Unreadable files: {}", self.summary.failures);
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    test_version: self.test_version,
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// `12:5 ERROR each is deprecated ... (removed_functions.eachDeprecated)`
fn format_diagnostic(diagnostic: &DiagnosticInfo) -> String {
    let severity = match diagnostic.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARNING".yellow().bold(),
    };
    format!(
        "{}:{} {} {} {}",
        diagnostic.line,
        diagnostic.column,
        severity,
        diagnostic.message,
        format!("({}.{})", diagnostic.sniff, diagnostic.code).dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(severity: Severity) -> DiagnosticInfo {
        DiagnosticInfo {
            sniff: "removed_functions".to_string(),
            code: "eachDeprecated".to_string(),
            severity,
            line: 12,
            column: 5,
            message: "each is deprecated since PHP 7.2".to_string(),
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_diagnostic_info_renders_message() {
        let diagnostic = Diagnostic::new(
            "new_functions",
            Severity::Error,
            "%s is not present in PHP version %s or earlier",
            "intdivFound",
        )
        .with_data(vec!["intdiv".to_string(), "5.6".to_string()])
        .at(3, 7);

        let info = DiagnosticInfo::from(&diagnostic);
        assert_eq!(info.message, "intdiv is not present in PHP version 5.6 or earlier");
        assert_eq!((info.line, info.column), (3, 7));
    }

    #[test]
    fn test_summary_counts_by_severity() {
        let mut reporter = Reporter::new(OutputFormat::Json, false, "7.2".to_string());
        reporter.report_file(
            Path::new("a.php"),
            vec![info(Severity::Error), info(Severity::Warning)],
        );
        reporter.report_file(Path::new("b.php"), vec![]);
        reporter.report_error(Path::new("c.php"), "unreadable");

        let summary = reporter.summary();
        assert_eq!(summary.files_processed, 3);
        assert_eq!(summary.files_with_issues, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 1);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.total_diagnostics(), 2);
    }

    #[test]
    fn test_json_serialization() {
        let output = JsonOutput {
            version: "0.1.0".to_string(),
            test_version: "5.6-7.4".to_string(),
            summary: Summary {
                files_processed: 1,
                files_with_issues: 1,
                total_errors: 0,
                total_warnings: 1,
                failures: 0,
            },
            files: vec![FileResult::success(
                Path::new("test.php"),
                vec![info(Severity::Warning)],
            )],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"test_version\":\"5.6-7.4\""));
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"code\":\"eachDeprecated\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_format_diagnostic() {
        colored::control::set_override(false);
        assert_eq!(
            format_diagnostic(&info(Severity::Warning)),
            "12:5 WARNING each is deprecated since PHP 7.2 (removed_functions.eachDeprecated)"
        );
    }
}
