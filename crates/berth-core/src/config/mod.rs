//! Credential and endpoint configuration.
//!
//! Credentials live in `~/.config/berth/berth.toml`. A missing file is not
//! an error; environment variables override file values either way.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default platform endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.berth.dev";

/// Stored credentials and account identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Platform access token.
    pub token: Option<String>,
    /// Team slug the token operates under, when set.
    pub team: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    /// API endpoint override.
    pub api_base: Option<String>,
}

impl Credentials {
    /// Default config file location (`~/.config/berth/berth.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("berth").join("berth.toml"))
    }

    /// Load credentials from the default location with env overrides applied.
    pub fn load() -> Result<Self> {
        let mut credentials = match Self::default_path() {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        credentials.overlay_env();
        Ok(credentials)
    }

    /// Load credentials from a specific file; a missing file yields defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("invalid config {}: {e}", path.display())))
    }

    /// Apply `BERTH_TOKEN`, `BERTH_TEAM`, and `BERTH_API` overrides.
    pub fn overlay_env(&mut self) {
        self.overlay_env_from(|name| std::env::var(name).ok());
    }

    fn overlay_env_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = get("BERTH_TOKEN") {
            self.token = Some(token);
        }
        if let Some(team) = get("BERTH_TEAM") {
            self.team = Some(team);
        }
        if let Some(base) = get("BERTH_API") {
            self.api_base = Some(base);
        }
    }

    /// Scope name shown in the report summary: team slug, else username,
    /// else email.
    pub fn scope_name(&self) -> &str {
        self.team
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("unknown")
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// The access token, or a configuration error telling the user how to
    /// set one. Checked before any network access.
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::config(
                    "no access token configured; set BERTH_TOKEN or add `token` to berth.toml",
                )
            })
    }
}
