// src/core/credentials.rs
//! Bearer-token storage. The client reads the token on every request and
//! never caches it.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::{PortalError, PortalResult};

/// Fixed key the token is stored under.
pub const TOKEN_KEY: &str = "token";

pub trait CredentialProvider: Send + Sync {
    /// Currently stored token, if any.
    fn token(&self) -> PortalResult<Option<String>>;
    fn store(&self, token: &str) -> PortalResult<()>;
    fn clear(&self) -> PortalResult<()>;
}

/// JSON file holding a flat key/value map, like browser local storage.
/// Other keys in the file are preserved on write.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> PortalResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            PortalError::Credentials(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(PortalError::Credentials(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(PortalError::Credentials(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> PortalResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PortalError::Credentials(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        let content = serde_json::to_string_pretty(map)
            .map_err(|e| PortalError::Credentials(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| {
            PortalError::Credentials(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl CredentialProvider for FileCredentialStore {
    fn token(&self) -> PortalResult<Option<String>> {
        let map = self.read_map()?;
        Ok(map
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    fn store(&self, token: &str) -> PortalResult<()> {
        let mut map = self.read_map()?;
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map)?;
        info!("Stored token in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> PortalResult<()> {
        let mut map = self.read_map()?;
        if map.remove(TOKEN_KEY).is_some() {
            self.write_map(&map)?;
            info!("Removed token from {}", self.path.display());
        } else {
            debug!("No token to remove in {}", self.path.display());
        }
        Ok(())
    }
}

/// Process-local provider, used by tests and embedders that manage the
/// token themselves.
#[derive(Default)]
pub struct MemoryCredentials {
    token: Mutex<Option<String>>,
}

impl MemoryCredentials {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialProvider for MemoryCredentials {
    fn token(&self) -> PortalResult<Option<String>> {
        let guard = self
            .token
            .lock()
            .map_err(|_| PortalError::Credentials("credential lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn store(&self, token: &str) -> PortalResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| PortalError::Credentials("credential lock poisoned".into()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> PortalResult<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| PortalError::Credentials("credential lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}
