//! File processing logic for phpcompat

use anyhow::{Context, Result};
use phpcompat_core::{logging, tokenize};
use phpcompat_sniffs::{SniffContext, SniffRegistry};
use std::collections::HashSet;
use std::path::Path;

use crate::output::DiagnosticInfo;

/// Lex a single PHP file and run the enabled sniffs over it
pub fn process_file(
    path: &Path,
    registry: &SniffRegistry,
    ctx: &SniffContext<'_>,
    enabled_sniffs: &HashSet<String>,
) -> Result<Vec<DiagnosticInfo>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    // Legacy sources are often Latin-1; only the ASCII structure matters here
    let source_code = String::from_utf8_lossy(&bytes);

    Ok(check_source(path, &source_code, registry, ctx, enabled_sniffs))
}

/// Run the enabled sniffs over already-loaded source
pub fn check_source(
    path: &Path,
    source_code: &str,
    registry: &SniffRegistry,
    ctx: &SniffContext<'_>,
    enabled_sniffs: &HashSet<String>,
) -> Vec<DiagnosticInfo> {
    let tokens = tokenize(source_code);

    let mut diagnostics = Vec::new();
    for sniff in registry.get_enabled(enabled_sniffs) {
        let found = sniff.check(&tokens, ctx);
        if !found.is_empty() {
            logging::log_sniff_run(sniff.name(), path, found.len());
        }
        diagnostics.extend(found);
    }
    diagnostics.sort_by_key(|d| (d.line, d.column));

    diagnostics.iter().map(DiagnosticInfo::from).collect()
}
