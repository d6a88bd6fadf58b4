//! The configured `testVersion` range and the gates derived from it

use crate::version::compare;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Lower bound used when a range leaves its minimum blank (`-5.6`)
pub const RANGE_FLOOR: &str = "4.0";
/// Upper bound used when a range leaves its maximum blank (`7.0-`)
pub const RANGE_CEILING: &str = "99.9";

/// Setting names checked, in order, when reading the range from configuration
pub const TEST_VERSION_KEYS: &[&str] = &["testVersion", "testversion"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid testVersion setting: '{0}'")]
    InvalidVersion(String),

    #[error("Invalid range syntax in testVersion setting: '{0}'")]
    InvalidRangeSyntax(String),

    #[error("Invalid range in testVersion setting: '{setting}' (minimum {min} is above maximum {max})")]
    InvalidRange {
        setting: String,
        min: String,
        max: String,
    },
}

/// Anything that can hand out a named string setting
pub trait ConfigSource {
    fn get(&self, name: &str) -> Option<String>;
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Inclusive `[min, max]` window of PHP versions the checked code must run on.
///
/// `None` on either side means no bound was configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestedVersionRange {
    min: Option<String>,
    max: Option<String>,
}

fn single_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+$").unwrap())
}

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+\.\d+)?\s*-\s*(\d+\.\d+)?$").unwrap())
}

impl TestedVersionRange {
    /// No bounds: removals are always checked, new features never are
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse a `testVersion` value: empty, `7.2`, `5.6-7.4`, `-5.6` or `7.0-`
    pub fn parse(setting: &str) -> Result<Self, RangeError> {
        let setting = setting.trim();
        if setting.is_empty() {
            return Ok(Self::unbounded());
        }

        if single_version_regex().is_match(setting) {
            return Ok(Self {
                min: Some(setting.to_string()),
                max: Some(setting.to_string()),
            });
        }

        if !setting.contains('-') {
            return Err(RangeError::InvalidVersion(setting.to_string()));
        }

        let caps = range_regex()
            .captures(setting)
            .ok_or_else(|| RangeError::InvalidRangeSyntax(setting.to_string()))?;
        let min = caps.get(1).map(|m| m.as_str());
        let max = caps.get(2).map(|m| m.as_str());
        if min.is_none() && max.is_none() {
            return Err(RangeError::InvalidRangeSyntax(setting.to_string()));
        }

        let min = min.unwrap_or(RANGE_FLOOR);
        let max = max.unwrap_or(RANGE_CEILING);
        if compare(min, max) == Ordering::Greater {
            return Err(RangeError::InvalidRange {
                setting: setting.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }

        Ok(Self {
            min: Some(min.to_string()),
            max: Some(max.to_string()),
        })
    }

    /// Read `testVersion` (falling back to `testversion`) from a configuration source
    pub fn from_config(source: &impl ConfigSource) -> Result<Self, RangeError> {
        let value = TEST_VERSION_KEYS
            .iter()
            .find_map(|key| source.get(key).filter(|v| !v.trim().is_empty()));

        match value {
            Some(setting) => Self::parse(&setting),
            None => Ok(Self::unbounded()),
        }
    }

    pub fn min(&self) -> Option<&str> {
        self.min.as_deref()
    }

    pub fn max(&self) -> Option<&str> {
        self.max.as_deref()
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether the code must still run on `version` or later, making a
    /// deprecation or removal at `version` relevant.
    pub fn supports_above(&self, version: &str) -> bool {
        match &self.max {
            None => true,
            Some(max) => compare(max, version) != Ordering::Less,
        }
    }

    /// Whether the code must run on `version` or earlier, where a feature
    /// introduced after `version` is not yet available.
    pub fn supports_below(&self, version: &str) -> bool {
        match &self.min {
            None => false,
            Some(min) => compare(min, version) != Ordering::Greater,
        }
    }
}

impl fmt::Display for TestedVersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (None, None) => f.write_str("any"),
            (Some(min), Some(max)) if min == max => f.write_str(min),
            (min, max) => write!(
                f,
                "{}-{}",
                min.as_deref().unwrap_or(""),
                max.as_deref().unwrap_or("")
            ),
        }
    }
}
