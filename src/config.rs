//! Settings loaded from `~/.config/pagesync/config.toml`.
//!
//! ```toml
//! pages_dir = "build/pages"
//! prefix = "page-"
//! extension = "svg"
//! pad_width = 3
//! target_width = 800.0
//! spacing = 32.0
//! synctex_path = "/Library/TeX/texbin/synctex"
//! timeout_secs = 10
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::geometry::{LayoutOptions, PageSource};
use crate::synctex::cli::DEFAULT_TIMEOUT;

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub pages_dir: PathBuf,
    pub prefix: String,
    pub extension: String,
    pub pad_width: usize,
    pub target_width: f64,
    pub spacing: f64,
    /// `None` searches PATH.
    pub synctex_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Self {
            pages_dir: PathBuf::from("."),
            prefix: "page-".to_string(),
            extension: "svg".to_string(),
            pad_width: 3,
            target_width: layout.target_width,
            spacing: layout.spacing,
            synctex_path: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file yields defaults; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    #[must_use]
    pub fn page_source(&self) -> PageSource {
        PageSource::new(&self.pages_dir)
            .with_prefix(&self.prefix)
            .with_extension(&self.extension)
            .with_pad_width(self.pad_width)
    }

    #[must_use]
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            target_width: self.target_width,
            spacing: self.spacing,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Return the path to the config file.
fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagesync")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!((settings.target_width - 800.0).abs() < f64::EPSILON);
        assert!((settings.spacing - 32.0).abs() < f64::EPSILON);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn parse_partial_config() {
        let settings = Settings::from_toml(
            r#"
pages_dir = "build/pages"
extension = "eps"
pad_width = 0
target_width = 1024.0
synctex_path = "/opt/tex/synctex"
"#,
        )
        .unwrap();

        assert_eq!(settings.pages_dir, PathBuf::from("build/pages"));
        assert_eq!(settings.prefix, "page-");
        assert_eq!(settings.synctex_path, Some(PathBuf::from("/opt/tex/synctex")));
        assert_eq!(settings.page_source().file_name(4), "page-4.eps");
        assert!((settings.layout_options().target_width - 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml("target_widht = 3.0").is_err());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagesync.toml");
        std::fs::write(&path, "spacing = 0.0\ntimeout_secs = 3\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert!(settings.spacing.abs() < f64::EPSILON);
        assert_eq!(settings.timeout(), Duration::from_secs(3));
    }
}
