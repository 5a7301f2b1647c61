//! Helm repository registry
//!
//! Reads the `repositories.yaml` maintained by `helm repo add`. Only the
//! fields needed to reach a repository are modelled; everything else in the
//! file is ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::env::EnvSource;
use crate::error::{RepoError, Result};

/// Explicit registry location (Helm 3)
pub const ENV_REPOSITORY_CONFIG: &str = "HELM_REPOSITORY_CONFIG";
/// Helm 2 home directory
pub const ENV_HELM_HOME: &str = "HELM_HOME";
/// Overrides the platform config directory, as in Helm 3
pub const ENV_XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Repository registry file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    #[serde(default)]
    pub api_version: Option<String>,

    /// Configured repositories
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

impl RepositoryConfig {
    /// Load the registry from the location Helm would use
    ///
    /// A missing file yields an empty registry.
    pub fn load(env: &impl EnvSource) -> Result<Self> {
        let path = Self::default_path(env)?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "repository registry not found");
            Ok(Self::default())
        }
    }

    /// Load the registry from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| RepoError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })
    }

    /// Registry path: `$HELM_REPOSITORY_CONFIG`, then
    /// `$HELM_HOME/repository/repositories.yaml`, then the Helm 3 default
    /// `helm/repositories.yaml` under `$XDG_CONFIG_HOME` or the platform
    /// preference directory (`~/.config` on Linux, `~/Library/Preferences`
    /// on macOS, `%APPDATA%` on Windows)
    pub fn default_path(env: &impl EnvSource) -> Result<PathBuf> {
        if let Some(path) = env.var(ENV_REPOSITORY_CONFIG).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(home) = env.var(ENV_HELM_HOME).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(home)
                .join("repository")
                .join("repositories.yaml"));
        }

        let config_dir = match env.var(ENV_XDG_CONFIG_HOME).filter(|p| !p.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::preference_dir().ok_or_else(|| RepoError::InvalidConfig {
                message: "Could not determine config directory".to_string(),
            })?,
        };
        Ok(config_dir.join("helm").join("repositories.yaml"))
    }

    /// Get a repository by name
    pub fn get(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Get a repository by name or fail with `RepositoryNotFound`
    pub fn require(&self, name: &str) -> Result<&Repository> {
        self.get(name).ok_or_else(|| RepoError::RepositoryNotFound {
            name: name.to_string(),
        })
    }
}

/// A registered repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,

    pub url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Treat a bare `http(s)://` argument as an anonymous repository
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Some(Self::new(url, url))
        } else {
            None
        }
    }
}
