//! phpcompat CLI - PHP version compatibility checker
//!
//! Available sniffs:
//! - removed_functions: Calls to functions deprecated or removed in the tested versions
//! - new_functions: Calls to functions missing from the lowest tested version
//! - new_classes: Class references missing from the lowest tested version
//! - removed_extensions: Calls into deprecated or removed extensions
//! - forbidden_negative_bitshift: Shifts by a negative number (PHP 7.0+)
//! - constant_scalar_expressions: Arithmetic in const declarations (PHP 5.5-)

mod config;
mod output;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::*;
use phpcompat_core::logging;
use phpcompat_sniffs::{SniffContext, SniffRegistry};
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use output::{DiagnosticInfo, OutputFormat, Reporter};
use process::process_file;

#[derive(Parser)]
#[command(name = "phpcompat")]
#[command(version)]
#[command(about = "Check PHP code for compatibility with a range of PHP versions")]
struct Cli {
    /// Files or directories to check
    #[arg(required_unless_present = "list_sniffs")]
    paths: Vec<PathBuf>,

    /// PHP versions the code must run on: "7.2", "5.6-7.4", "-5.6" or "7.0-"
    #[arg(long, short = 't', value_name = "RANGE")]
    test_version: Option<String>,

    /// Sniffs to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 's', value_name = "SNIFF")]
    sniff: Vec<String>,

    /// Output format: text, json
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Write a debug log to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Path to config file (default: auto-detect .phpcompat.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// List available sniffs and exit
    #[arg(long)]
    list_sniffs: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let registry = SniffRegistry::new();

    if cli.list_sniffs {
        println!("{}", "Available sniffs:".bold());
        for (name, description) in registry.list_sniffs() {
            println!("  {} - {}", name.green(), description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(log_path) = &cli.log_file {
        let path = logging::init_logger(Some(log_path.as_path()))?;
        logging::section("PHPCOMPAT RUN");
        logging::log(&format!("Log file: {}", path.display()));
    }

    // Load config file
    let (config, config_path) = if cli.no_config {
        (Config::default(), None)
    } else if let Some(path) = &cli.config {
        (Config::load_path(path)?, Some(path.clone()))
    } else {
        match Config::load()? {
            Some((cfg, path)) => (cfg, Some(path)),
            None => (Config::default(), None),
        }
    };

    // CLI flag, then config, then text
    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        let format = cli
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text");
        OutputFormat::from_str(format).ok_or_else(|| {
            anyhow::anyhow!("Invalid output format '{}'. Valid options: text, json", format)
        })?
    };
    let verbose_text = cli.verbose && output_format == OutputFormat::Text;

    if let Some(path) = &config_path {
        logging::log(&format!("Using config: {}", path.display()));
        if verbose_text {
            println!("{}: {}", "Using config".bold(), path.display());
        }
    }

    let range = config.tested_range(cli.test_version.as_deref())?;
    let range_source = if cli.test_version.is_some() {
        "cli"
    } else if config_path.is_some() {
        "config"
    } else {
        "default"
    };
    logging::log_test_version(range_source, &range);

    let all_sniffs = registry.all_names();
    if let Some(sniff) = config.unknown_sniffs(&all_sniffs, &cli.sniff).first() {
        eprintln!(
            "{}: Unknown sniff '{}'. Use --list-sniffs to see available sniffs.",
            "Error".red(),
            sniff
        );
        return Ok(ExitCode::from(1));
    }

    let enabled_sniffs = config.effective_sniffs(&all_sniffs, &cli.sniff);
    if enabled_sniffs.is_empty() {
        eprintln!("{}: No sniffs enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }

    if verbose_text {
        println!("{}: {}", "Test version".bold(), range);
        let mut names: Vec<_> = enabled_sniffs.iter().cloned().collect();
        names.sort();
        println!("{}: {}", "Sniffs".bold(), names.join(", "));
        println!();
    }

    // Collect all file paths first
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in &cli.paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }
    file_paths.sort();

    let ctx = SniffContext::new(&range);
    let results: Vec<Result<Vec<DiagnosticInfo>, String>> = file_paths
        .par_iter()
        .map(|path| {
            process_file(path, &registry, &ctx, &enabled_sniffs).map_err(|e| format!("{:#}", e))
        })
        .collect();

    let mut reporter = Reporter::new(output_format, cli.verbose, range.to_string());

    for path in &missing_paths {
        if output_format == OutputFormat::Text {
            eprintln!(
                "{}: Path does not exist: {}",
                "Warning".yellow(),
                path.display()
            );
        }
    }

    for (path, result) in file_paths.iter().zip(results) {
        match result {
            Ok(diagnostics) => reporter.report_file(path, diagnostics),
            Err(message) => reporter.report_error(path, &message),
        }
    }

    let summary = reporter.summary();
    let exit_code = if summary.failures > 0 || !missing_paths.is_empty() {
        ExitCode::from(1)
    } else if summary.total_diagnostics() > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };
    logging::log(&format!(
        "Finished: {} file(s), {} error(s), {} warning(s)",
        summary.files_processed, summary.total_errors, summary.total_warnings
    ));

    reporter.finish()?;

    Ok(exit_code)
}
