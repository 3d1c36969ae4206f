// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration loading.
//!
//! Settings come from a TOML file (`abacus.toml`, overridable via
//! `ABACUS_CONFIG`). Every field has a default, so a missing file yields a
//! runnable daemon; a present-but-broken file is an error rather than a
//! silent fallback.

use abacus_core::OrchestratorConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file path.
pub const CONFIG_ENV: &str = "ABACUS_CONFIG";

const DEFAULT_PATH: &str = "abacus.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Auth collaborator settings: a static token → user id table. Stands in
/// for the external token-validation service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub tokens: HashMap<String, String>,
}

/// Full daemon settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub orchestrator: OrchestratorConfig,
    pub auth: AuthSettings,
}

impl Settings {
    /// Load settings from `ABACUS_CONFIG` or the default path. A missing
    /// file is fine; a malformed one is not.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
