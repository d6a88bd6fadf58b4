//! Feature lifecycle data: when a feature was deprecated, removed or introduced
//!
//! A lifecycle is an ordered list of `(version, state)` entries plus a few
//! reserved metadata keys. For deprecated/removed features `false` means
//! "deprecated as of" and `true` "removed as of"; for new features `false`
//! means "not yet present in" and `true` "present as of".
//!
//! Entry order is preserved exactly as supplied; the classifiers rely on it.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

/// Reserved key holding a suggested replacement
pub const KEY_ALTERNATIVE: &str = "alternative";
/// Reserved key replacing the whole message template
pub const KEY_MESSAGE: &str = "message";

fn version_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+(\.\d{1,2})?$").unwrap())
}

/// Whether a lifecycle key is a `major.minor[.patch]` version
pub fn is_version_key(key: &str) -> bool {
    version_key_regex().is_match(key)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureLifecycle {
    /// Version-keyed entries in input order; `None` for non-boolean values
    versions: Vec<(String, Option<bool>)>,
    alternative: Option<String>,
    message_override: Option<String>,
    /// Any other keys, passed through untouched
    extra: Vec<(String, String)>,
}

impl FeatureLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw key/value pairs, classifying each key.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut lifecycle = Self::new();
        for (key, value) in entries {
            if is_version_key(&key) {
                let state = match value {
                    Value::Bool(b) => Some(b),
                    _ => None,
                };
                lifecycle.versions.push((key, state));
                continue;
            }

            let text = scalar_to_string(&value);
            match key.as_str() {
                KEY_ALTERNATIVE => lifecycle.alternative = text,
                KEY_MESSAGE => lifecycle.message_override = text,
                _ => lifecycle.extra.push((key, text.unwrap_or_default())),
            }
        }
        lifecycle
    }

    /// Build from a YAML mapping. Keys must be strings; a bare YAML number
    /// key such as `5.10` would already have lost its meaning, so those are
    /// kept as extra data and never treated as versions.
    pub fn from_mapping(mapping: &Mapping) -> Self {
        Self::from_entries(mapping.iter().map(|(k, v)| {
            let key = match k {
                Value::String(s) => s.clone(),
                other => format!("#{}", scalar_to_string(other).unwrap_or_default()),
            };
            (key, v.clone())
        }))
    }

    pub fn deprecated(mut self, version: &str) -> Self {
        self.versions.push((version.to_string(), Some(false)));
        self
    }

    pub fn removed(mut self, version: &str) -> Self {
        self.versions.push((version.to_string(), Some(true)));
        self
    }

    /// New-feature tables: the feature is missing in `version`
    pub fn absent_in(self, version: &str) -> Self {
        self.deprecated(version)
    }

    /// New-feature tables: the feature exists as of `version`
    pub fn present_in(self, version: &str) -> Self {
        self.removed(version)
    }

    pub fn with_alternative(mut self, alternative: impl Into<String>) -> Self {
        self.alternative = Some(alternative.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message_override = Some(message.into());
        self
    }

    pub fn versions(&self) -> &[(String, Option<bool>)] {
        &self.versions
    }

    pub fn alternative(&self) -> Option<&str> {
        self.alternative.as_deref()
    }

    pub fn message_override(&self) -> Option<&str> {
        self.message_override.as_deref()
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Loose scalar-to-string cast; `null` and `false` become "no value"
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => None,
        _ => None,
    }
}
