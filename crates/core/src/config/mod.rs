//! Configuration for the reflection core
//!
//! This module provides:
//! - A serde-backed [`CoreConfig`] stored as TOML
//! - Auto-generation of the default config on first load
//! - Manual reload capability
//!
//! # Example
//!
//! ```ignore
//! use conobject_core::{ClassRegistry, CoreConfig};
//!
//! let config = CoreConfig::load().unwrap_or_default();
//! let registry = ClassRegistry::with_config(&config);
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use crate::callbacks::ConnectPolicy;
pub use loader::{base_dir, configs_dir, core_config_path};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from the executable location
    #[error("Config directory not available - could not resolve executable path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Core configuration.
///
/// Loaded from `<exe dir>/configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// How callback connection treats implementations of undeclared callbacks
    pub connect_policy: ConnectPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            connect_policy: ConnectPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Load core config from the default path, creating it if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&core_config_path()?)
    }

    /// Load core config from `path`, creating a default file if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Save core config to the default path.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&core_config_path()?)
    }

    /// Save core config to `path`.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload core config from the default path.
    pub fn reload(&mut self) -> ConfigResult<()> {
        self.reload_from(&core_config_path()?)
    }

    /// Reload core config from `path`.
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }
}
