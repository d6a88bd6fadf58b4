//! Configuration file support for phpcompat
//!
//! Loads `.phpcompat.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use phpcompat_core::{ConfigSource, RangeError, TestedVersionRange};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".phpcompat.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Free-form string settings, e.g. `testVersion = "5.6-7.4"`
    pub settings: HashMap<String, String>,
    pub sniffs: SniffsConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SniffsConfig {
    /// If set, only these sniffs will run
    pub enabled: Option<Vec<String>>,
    /// Sniffs to exclude (applied after enabled)
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text" or "json"
    pub format: Option<String>,
}

impl ConfigSource for Config {
    fn get(&self, name: &str) -> Option<String> {
        self.settings.get(name).cloned()
    }
}

impl Config {
    /// Load config from `.phpcompat.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the tested range; a CLI value wins over `settings.testVersion`
    pub fn tested_range(&self, cli_value: Option<&str>) -> Result<TestedVersionRange, RangeError> {
        match cli_value {
            Some(setting) => TestedVersionRange::parse(setting),
            None => TestedVersionRange::from_config(self),
        }
    }

    /// Compute the effective set of enabled sniffs
    pub fn effective_sniffs(&self, all_sniffs: &[&str], cli_sniffs: &[String]) -> HashSet<String> {
        // CLI sniffs override config completely
        if !cli_sniffs.is_empty() {
            return cli_sniffs.iter().cloned().collect();
        }

        let mut sniffs: HashSet<String> = match &self.sniffs.enabled {
            Some(enabled) => enabled.iter().cloned().collect(),
            None => all_sniffs.iter().map(|s| s.to_string()).collect(),
        };

        for disabled in &self.sniffs.disabled {
            sniffs.remove(disabled);
        }

        sniffs
    }

    /// Sniff names from the CLI or from `[sniffs]` that no registered sniff has
    pub fn unknown_sniffs(&self, all_sniffs: &[&str], cli_sniffs: &[String]) -> Vec<String> {
        let configured = self.sniffs.enabled.iter().flatten();
        cli_sniffs
            .iter()
            .chain(configured)
            .chain(&self.sniffs.disabled)
            .filter(|name| !all_sniffs.contains(&name.as_str()))
            .cloned()
            .collect()
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            // Directory patterns like "vendor/"
            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_basic_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[settings]
testVersion = "5.6-7.4"

[sniffs]
enabled = ["removed_functions", "new_functions"]
disabled = ["new_functions"]

[paths]
exclude = ["vendor/", "*.generated.php"]

[output]
format = "json"
"#,
        );

        let (config, path) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.get("testVersion"), Some("5.6-7.4".to_string()));
        assert_eq!(
            config.sniffs.enabled,
            Some(vec![
                "removed_functions".to_string(),
                "new_functions".to_string()
            ])
        );
        assert_eq!(config.sniffs.disabled, vec!["new_functions".to_string()]);
        assert_eq!(config.output.format, Some("json".to_string()));

        let range = config.tested_range(None).unwrap();
        assert_eq!((range.min(), range.max()), (Some("5.6"), Some("7.4")));
    }

    #[test]
    fn test_config_found_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[settings]\ntestversion = \"7.0-\"\n");
        let nested = temp.path().join("src").join("Legacy");
        fs::create_dir_all(&nested).unwrap();

        let (config, path) = Config::load_from(nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.tested_range(None).unwrap().min(), Some("7.0"));
    }

    #[test]
    fn test_no_config_found() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(temp.path().to_path_buf()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[settings\n");
        let err = Config::load_from(temp.path().to_path_buf()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_cli_test_version_overrides_config() {
        let mut config = Config::default();
        config
            .settings
            .insert("testVersion".to_string(), "5.3".to_string());

        let range = config.tested_range(Some("8.1")).unwrap();
        assert_eq!(range.min(), Some("8.1"));
        assert!(config.tested_range(Some("8")).is_err());
        assert!(Config::default().tested_range(None).unwrap().is_unbounded());
    }

    #[test]
    fn test_invalid_configured_range() {
        let mut config = Config::default();
        config
            .settings
            .insert("testVersion".to_string(), "7.4-5.6".to_string());
        assert!(matches!(
            config.tested_range(None),
            Err(RangeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_effective_sniffs() {
        let all = &["removed_functions", "new_functions", "new_classes"];

        let config = Config {
            sniffs: SniffsConfig {
                enabled: None,
                disabled: vec!["new_classes".to_string()],
            },
            ..Default::default()
        };
        let effective = config.effective_sniffs(all, &[]);
        assert_eq!(effective.len(), 2);
        assert!(!effective.contains("new_classes"));

        let effective = config.effective_sniffs(all, &["new_classes".to_string()]);
        assert_eq!(effective.len(), 1);
        assert!(effective.contains("new_classes"));
    }

    #[test]
    fn test_unknown_sniffs_from_cli_and_config() {
        let all = &["removed_functions", "new_functions"];

        let config = Config {
            sniffs: SniffsConfig {
                enabled: Some(vec!["removed_functions".to_string(), "new_fuctions".to_string()]),
                disabled: vec!["bogus".to_string()],
            },
            ..Default::default()
        };
        assert_eq!(
            config.unknown_sniffs(all, &["nope".to_string()]),
            vec!["nope", "new_fuctions", "bogus"]
        );

        assert!(Config::default()
            .unknown_sniffs(all, &["new_functions".to_string()])
            .is_empty());
    }

    #[test]
    fn test_should_exclude() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["vendor/".to_string(), "*.generated.php".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("project/vendor/autoload.php")));
        assert!(config.should_exclude(Path::new("vendor/package/file.php")));
        assert!(config.should_exclude(Path::new("foo.generated.php")));
        assert!(!config.should_exclude(Path::new("src/vendor.php")));
    }
}
