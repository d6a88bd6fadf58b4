//! Version-range classification of feature lifecycles and message construction
//!
//! The pure classifiers scan version entries in the order they were supplied
//! and never sort. The `_within` variants additionally apply the tested
//! range gates per entry, which is what the sniffs use.

use crate::lifecycle::FeatureLifecycle;
use phpcompat_core::{Diagnostic, Severity, TestedVersionRange, Token};

/// Verdict for a deprecated/removed feature; empty strings mean "not set"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeprecatedRemovedInfo {
    pub deprecated: String,
    pub removed: String,
    pub alternative: String,
}

impl DeprecatedRemovedInfo {
    pub fn applies(&self) -> bool {
        !self.deprecated.is_empty() || !self.removed.is_empty()
    }

    /// Removal is an error, deprecation alone a warning
    pub fn severity(&self) -> Severity {
        if self.removed.is_empty() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

/// Verdict for a new feature; empty when the feature is available throughout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFeatureInfo {
    pub not_in_version: String,
}

impl NewFeatureInfo {
    pub fn applies(&self) -> bool {
        !self.not_in_version.is_empty()
    }
}

/// First `true` entry is the removal, first `false` entry the deprecation.
pub fn classify_deprecated_removed(lifecycle: &FeatureLifecycle) -> DeprecatedRemovedInfo {
    scan_deprecated_removed(lifecycle, |_| true)
}

/// Like [`classify_deprecated_removed`], ignoring entries above the range maximum.
pub fn deprecated_removed_within(
    lifecycle: &FeatureLifecycle,
    range: &TestedVersionRange,
) -> DeprecatedRemovedInfo {
    scan_deprecated_removed(lifecycle, |version| range.supports_above(version))
}

fn scan_deprecated_removed(
    lifecycle: &FeatureLifecycle,
    relevant: impl Fn(&str) -> bool,
) -> DeprecatedRemovedInfo {
    let mut info = DeprecatedRemovedInfo {
        alternative: lifecycle.alternative().unwrap_or_default().to_string(),
        ..Default::default()
    };

    for (version, state) in lifecycle.versions() {
        let Some(state) = state else { continue };
        if !relevant(version) {
            continue;
        }
        let slot = if *state {
            &mut info.removed
        } else {
            &mut info.deprecated
        };
        if slot.is_empty() {
            *slot = version.clone();
        }
    }

    info
}

/// First `false` entry is the last version lacking the feature.
pub fn classify_new_feature(lifecycle: &FeatureLifecycle) -> NewFeatureInfo {
    let not_in_version = lifecycle
        .versions()
        .iter()
        .find(|(_, state)| *state == Some(false))
        .map(|(version, _)| version.clone())
        .unwrap_or_default();

    NewFeatureInfo { not_in_version }
}

/// Last `false` entry still inside the tested range.
///
/// With an ascending table this is the highest version the code must run
/// on that does not have the feature yet.
pub fn not_in_version_within(
    lifecycle: &FeatureLifecycle,
    range: &TestedVersionRange,
) -> NewFeatureInfo {
    let not_in_version = lifecycle
        .versions()
        .iter()
        .filter(|(version, state)| *state == Some(false) && range.supports_below(version))
        .last()
        .map(|(version, _)| version.clone())
        .unwrap_or_default();

    NewFeatureInfo { not_in_version }
}

/// Message template, error code and interpolation data for one finding
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMessage {
    pub message: String,
    pub code: String,
    pub data: Vec<String>,
    pub severity: Severity,
}

impl FeatureMessage {
    /// Replace the template, keeping code and data
    pub fn with_override(mut self, message_override: Option<&str>) -> Self {
        if let Some(message) = message_override.filter(|m| !m.is_empty()) {
            self.message = message.to_string();
        }
        self
    }

    pub fn into_diagnostic(self, sniff: &str, token: &Token) -> Diagnostic {
        Diagnostic::new(sniff, self.severity, self.message, self.code)
            .with_data(self.data)
            .at(token.line, token.column)
    }
}

/// `"%s is deprecated since PHP %s and removed since PHP %s; Use %s instead"`
/// and its shorter forms. `None` when neither deprecation nor removal applies.
pub fn build_deprecated_removed_message(
    item_name: &str,
    base_code: &str,
    info: &DeprecatedRemovedInfo,
) -> Option<FeatureMessage> {
    if !info.applies() {
        return None;
    }

    let mut message = String::from("%s is ");
    let mut code = base_code.to_string();
    let mut data = vec![item_name.to_string()];

    if !info.deprecated.is_empty() {
        message.push_str("deprecated since PHP %s and ");
        code.push_str("Deprecated");
        data.push(info.deprecated.clone());
    }

    if !info.removed.is_empty() {
        message.push_str("removed since PHP %s and ");
        code.push_str("Removed");
        data.push(info.removed.clone());
    }

    message.truncate(message.len() - " and ".len());

    if !info.alternative.is_empty() {
        message.push_str("; Use %s instead");
        data.push(info.alternative.clone());
    }

    Some(FeatureMessage {
        message,
        code,
        data,
        severity: info.severity(),
    })
}

/// `"%s is not present in PHP version %s or earlier"`
pub fn build_new_feature_message(
    item_name: &str,
    base_code: &str,
    info: &NewFeatureInfo,
) -> Option<FeatureMessage> {
    if !info.applies() {
        return None;
    }

    Some(FeatureMessage {
        message: "%s is not present in PHP version %s or earlier".to_string(),
        code: format!("{}Found", base_code),
        data: vec![item_name.to_string(), info.not_in_version.clone()],
        severity: Severity::Error,
    })
}
