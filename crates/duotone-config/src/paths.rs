//! Platform-specific paths for presets and configuration.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/duotone/` (Linux), `~/Library/Application Support/duotone/` (macOS), `%APPDATA%\duotone\` (Windows)
//! - **User presets**: the `presets/` subdirectory of the config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use duotone_config::paths;
//!
//! let path = paths::preset_path("warm-pad").unwrap();
//! println!("preset file: {:?}", path);
//!
//! for name in paths::list_presets() {
//!     println!("{name}");
//! }
//! ```

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "duotone";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific configuration directory.
///
/// Fails with [`ConfigError::NoConfigDir`] on systems where no user
/// configuration directory can be determined.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Returns the user-specific presets directory.
pub fn presets_dir() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(PRESETS_SUBDIR))
}

/// Resolve a preset name to its path in the user presets directory.
///
/// Appends the `.toml` extension unless the name already carries it.
pub fn preset_path(name: &str) -> Result<PathBuf, ConfigError> {
    Ok(presets_dir()?.join(preset_filename(name)))
}

/// Ensure the user presets directory exists, creating it if needed.
pub fn ensure_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = presets_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Find a preset file by name or path.
///
/// An existing file path wins; otherwise the name is looked up in the user
/// presets directory with the `.toml` extension appended as needed.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let user_path = presets_dir().ok()?.join(preset_filename(name));
    if user_path.is_file() {
        return Some(user_path);
    }

    None
}

/// List the preset names in the user presets directory, sorted.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_presets() -> Vec<String> {
    match presets_dir() {
        Ok(dir) => preset_names_in_dir(&dir),
        Err(_) => Vec::new(),
    }
}

fn preset_filename(name: &str) -> String {
    if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{}.toml", name)
    }
}

/// Helper to list preset names (file stems of `.toml` files) in a directory.
fn preset_names_in_dir(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().map(|ext| ext == "toml").unwrap_or(false)
        })
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(|stem| stem.to_string())
        })
        .collect();
    names.sort();
    names
}
