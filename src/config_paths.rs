//! Centralized configuration paths for syntax-storage
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/syntax-storage/`
//! - Windows: `%APPDATA%\syntax-storage\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "syntax-storage";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "syntax-storage.log";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/syntax-storage`
///   - Else: `~/.config/syntax-storage`
///
/// Windows:
///   - `%APPDATA%\syntax-storage`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/syntax-storage/themes/`
pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/syntax-storage/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/syntax-storage/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_nested_logs_dir() {
        let temp = tempfile::tempdir().unwrap();
        let logs = temp.path().join(APP_DIR).join("logs");
        ensure_dir(&logs).unwrap();
        assert!(logs.is_dir());
        // Existing directories are fine
        ensure_dir(&logs).unwrap();
    }

    #[test]
    fn test_logs_dir_matches_ensure_logs_dir_layout() {
        if let Some(logs) = logs_dir() {
            assert_eq!(logs.file_name().and_then(|n| n.to_str()), Some("logs"));
            assert_eq!(logs.parent().map(Path::to_path_buf), config_dir());
        }
    }
}
