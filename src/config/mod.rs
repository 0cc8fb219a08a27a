//! Session configuration.
//!
//! The host normally supplies the active project and user at init time;
//! for headless use the same values load from a YAML file, with
//! environment variable overrides taking precedence.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BugBashError, Result};
use crate::util::id::identity_string;

/// The current user, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: String,
    pub unique_name: String,
}

impl Identity {
    /// `"Display Name <unique.name>"`, the format stamped onto
    /// created-by fields.
    #[must_use]
    pub fn as_identity_string(&self) -> String {
        identity_string(&self.display_name, &self.unique_name)
    }
}

/// Per-session configuration: scope and identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Active project; documents outside it are invisible.
    pub project_id: String,
    pub identity: Identity,
}

impl SessionConfig {
    #[must_use]
    pub fn new(project_id: impl Into<String>, identity: Identity) -> Self {
        Self {
            project_id: project_id.into(),
            identity,
        }
    }

    /// Load from a YAML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read or `Config` if it does
    /// not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the YAML does not parse.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| BugBashError::Config(e.to_string()))
    }

    /// `BUGBASH_PROJECT_ID` overrides the configured project.
    fn apply_env_overrides(&mut self) {
        if let Ok(project_id) = std::env::var("BUGBASH_PROJECT_ID") {
            if !project_id.is_empty() {
                self.project_id = project_id;
            }
        }
    }
}
