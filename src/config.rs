// src/config.rs
//! Client configuration: defaults, then an optional TOML file, then
//! environment overrides. CLI flags are applied last by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_CONFIG_FILE: &str = "job-portal.toml";
pub const DEFAULT_CREDENTIALS_FILE: &str = ".job-portal/credentials.json";

pub const ENV_CONFIG: &str = "JOB_PORTAL_CONFIG";
pub const ENV_API_URL: &str = "JOB_PORTAL_API_URL";
pub const ENV_TIMEOUT: &str = "JOB_PORTAL_TIMEOUT_SECS";
pub const ENV_CREDENTIALS: &str = "JOB_PORTAL_CREDENTIALS";
pub const ENV_LOG: &str = "JOB_PORTAL_LOG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub api: ApiConfig,
    pub credentials: CredentialConfig,
    pub logging: LoggingConfig,
    /// File the settings were read from; logged once tracing is up.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout unless set.
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    pub path: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `job_portal=debug`.
    pub level: String,
    /// JSON log file, in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl PortalConfig {
    /// Load from the process environment and working directory.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if explicit.is_some() {
            anyhow::bail!("Config file {} not found", path.display());
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.resolve_paths()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Apply `JOB_PORTAL_*` overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(secs) = get(ENV_TIMEOUT) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of seconds", ENV_TIMEOUT))?;
            self.api.timeout_seconds = Some(secs);
        }
        if let Some(path) = get(ENV_CREDENTIALS) {
            self.credentials.path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG) {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }

    /// Make relative paths absolute against the current directory.
    pub fn resolve_paths(&mut self) -> Result<()> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        self.resolve_paths_from(&current_dir);
        Ok(())
    }

    fn resolve_paths_from(&mut self, base: &Path) {
        self.credentials.path = resolve(base, &self.credentials.path);
        if let Some(file) = &self.logging.file {
            self.logging.file = Some(resolve(base, file));
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
