//! Project configuration for swiftfacts.
//!
//! A config file tunes which files are extracted and how facts are written.
//! Every field is optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::visitors::VisitorOptions;

/// File names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["swiftfacts.yaml", ".swiftfacts.yaml"];

/// Template written by `swiftfacts init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Report formats.
pub const OUTPUT_FORMATS: &[&str] = &["pretty", "json", "trap"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Whether to extract test sources (default: false)
    #[serde(default)]
    pub include_test_files: bool,
    /// Glob patterns for paths to skip (e.g. "**/Generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default = "default_true")]
    pub emit_locations: bool,
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// "pretty" (default), "json" or "trap"
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_true() -> bool {
    true
}

fn default_output() -> String {
    "pretty".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: String::new(),
            name: String::new(),
            include_test_files: false,
            excluded_paths: Vec::new(),
            emit_locations: true,
            parallel: true,
            output: default_output(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load the config at `path`, else the one discovered in `dir`, else
    /// defaults.
    pub fn load(path: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        match path.map(Path::to_path_buf).or_else(|| Self::discover(dir)) {
            Some(path) => Self::parse_file(&path)
                .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e)),
            None => Ok(Self::default()),
        }
    }

    pub fn visitor_options(&self) -> VisitorOptions {
        VisitorOptions {
            emit_locations: self.emit_locations,
        }
    }

    /// Compile `excluded_paths` into one matcher.
    pub fn excluded_matcher(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|e| {
                anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e)
            })?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Check a path against `excluded_paths`.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        match self.excluded_matcher() {
            Ok(matcher) => matcher.is_match(path),
            Err(_) => false,
        }
    }

    /// Reject unknown output formats and glob patterns that do not compile.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !OUTPUT_FORMATS.contains(&self.output.as_str()) {
            anyhow::bail!(
                "invalid output {:?}, must be one of {}",
                self.output,
                OUTPUT_FORMATS.join(", ")
            );
        }
        self.excluded_matcher()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1"
name: "App"
include_test_files: true
excluded_paths:
  - "**/Generated/**"
output: trap
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.name, "App");
        assert!(config.include_test_files);
        assert_eq!(config.output, "trap");
        // Unset fields keep their defaults
        assert!(config.emit_locations);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse_str("").unwrap();
        assert_eq!(config.output, "pretty");
        assert!(!config.include_test_files);
        assert_eq!(config.visitor_options(), VisitorOptions::default());
    }

    #[test]
    fn test_template_is_valid() {
        let config = Config::parse_str(DEFAULT_TEMPLATE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.output, "pretty");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            output: "xml".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            excluded_paths: vec!["src/[".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_excluded_paths() {
        let config = Config {
            excluded_paths: vec!["**/Generated/**".to_string()],
            ..Config::default()
        };
        assert!(config.is_path_excluded(Path::new("Sources/Generated/Api.swift")));
        assert!(!config.is_path_excluded(Path::new("Sources/App/main.swift")));
    }

    #[test]
    fn test_discover_and_load() {
        let dir = TempDir::new().unwrap();
        assert!(Config::discover(dir.path()).is_none());
        assert_eq!(Config::load(None, dir.path()).unwrap().output, "pretty");

        fs::write(dir.path().join(".swiftfacts.yaml"), "output: json\n").unwrap();
        assert!(Config::discover(dir.path()).is_some());
        assert_eq!(Config::load(None, dir.path()).unwrap().output, "json");

        let explicit = dir.path().join("other.yaml");
        fs::write(&explicit, "emit_locations: false\n").unwrap();
        let config = Config::load(Some(&explicit), dir.path()).unwrap();
        assert!(!config.emit_locations);
    }
}
