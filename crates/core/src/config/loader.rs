//! Config path resolution
//!
//! Configs live next to the running executable.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Returns the directory holding the running executable
pub fn base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;
    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the configs directory.
///
/// Path: `<exe dir>/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(base_dir()?.join("configs"))
}

/// Returns the core config path.
///
/// Path: `<exe dir>/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}
