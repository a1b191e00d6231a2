//! Changelog rewrite configuration.
//!
//! Configuration lives in `.changelog-sync.yaml` at the root of the target
//! repository (or any file passed with `--config`):
//!
//! ```yaml
//! source_url: https://github.com/org/monorepo   # or false, or true for auto
//! target_url: true
//! files:
//!   - CHANGELOG.md
//! remove_tag_prefix: "@org/pkg@"
//! add_tag_prefix: v
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the target working directory.
pub const CONFIG_FILE_NAME: &str = ".changelog-sync.yaml";

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file: {}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`ChangelogConfig`].
    #[error("Failed to parse config file: {}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// How a repository web URL is determined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUrlSetting", into = "RawUrlSetting")]
pub enum UrlSetting {
    /// Derived from the repository's `origin` remote.
    #[default]
    Auto,
    /// URL rewriting disabled for this side.
    Disabled,
    /// Fixed URL.
    Explicit(String),
}

impl UrlSetting {
    /// Builds a setting from CLI flags: an explicit URL wins, then the
    /// disable flag, then automatic detection.
    pub fn from_flags(url: Option<String>, disabled: bool) -> Option<Self> {
        match (url, disabled) {
            (Some(url), _) => Some(Self::from(RawUrlSetting::Url(url))),
            (None, true) => Some(Self::Disabled),
            (None, false) => None,
        }
    }
}

/// On-disk shape of [`UrlSetting`]: a boolean or a URL string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawUrlSetting {
    Flag(bool),
    Url(String),
}

impl From<RawUrlSetting> for UrlSetting {
    fn from(raw: RawUrlSetting) -> Self {
        match raw {
            RawUrlSetting::Flag(true) => Self::Auto,
            RawUrlSetting::Flag(false) => Self::Disabled,
            RawUrlSetting::Url(url) if url.trim().is_empty() => Self::Disabled,
            RawUrlSetting::Url(url) => Self::Explicit(url),
        }
    }
}

impl From<UrlSetting> for RawUrlSetting {
    fn from(setting: UrlSetting) -> Self {
        match setting {
            UrlSetting::Auto => Self::Flag(true),
            UrlSetting::Disabled => Self::Flag(false),
            UrlSetting::Explicit(url) => Self::Url(url),
        }
    }
}

/// Operator-facing rewrite configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangelogConfig {
    /// Web URL of the source repository.
    #[serde(default)]
    pub source_url: UrlSetting,

    /// Web URL of the target repository.
    #[serde(default)]
    pub target_url: UrlSetting,

    /// Files eligible for rewriting; `CHANGELOG.md` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Tag prefix used by the source repository, e.g. `@org/pkg@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_tag_prefix: Option<String>,

    /// Tag prefix used by the target repository, e.g. `v`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_tag_prefix: Option<String>,
}

impl ChangelogConfig {
    /// Loads configuration from a YAML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file is an empty configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, else [`CONFIG_FILE_NAME`] from `workdir`
    /// when it exists, else the defaults.
    pub fn discover(path: Option<&Path>, workdir: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        if let Some(candidate) = workdir.map(|dir| dir.join(CONFIG_FILE_NAME)) {
            if candidate.is_file() {
                debug!("Using config file {}", candidate.display());
                return Self::load_from_path(&candidate);
            }
        }

        Ok(Self::default())
    }
}
