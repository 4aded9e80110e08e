//! Configuration system tests
//!
//! Tests for config paths and storage config loading/saving.

use syntax_storage::config::StorageConfig;
use syntax_storage::config_paths;
use syntax_storage::runtime::ExecutionMode;
use syntax_storage::syntax::LanguageId;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("syntax-storage"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_themes_and_logs_are_subdirs_of_config() {
    if let Some(config) = config_paths::config_dir() {
        assert!(config_paths::themes_dir().unwrap().starts_with(&config));
        assert!(config_paths::logs_dir().unwrap().starts_with(&config));
    }
}

// ========================================================================
// Storage Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = StorageConfig::default();
    assert_eq!(config.theme, "default-dark");
    assert_eq!(config.execution, ExecutionMode::Background);
    assert_eq!(config.language, None);
    assert_eq!(config.idle_timeout_ms, 5000);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = StorageConfig {
        theme: "default-light".to_string(),
        execution: ExecutionMode::Queued,
        language: Some("python".to_string()),
        idle_timeout_ms: 1200,
    };
    config.save_to(&path).unwrap();

    let loaded = StorageConfig::load_from(&path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.default_language(), Some(LanguageId::Python));
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "execution: queued\n").unwrap();

    let loaded = StorageConfig::load_from(&path);
    assert_eq!(loaded.execution, ExecutionMode::Queued);
    assert_eq!(loaded.theme, "default-dark");
    assert_eq!(loaded.idle_timeout_ms, 5000);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = StorageConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(loaded, StorageConfig::default());
}

#[test]
fn test_invalid_yaml_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "execution: [not, a, mode\n").unwrap();

    assert_eq!(StorageConfig::load_from(&path), StorageConfig::default());
}

#[test]
fn test_unknown_execution_mode_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "execution: threadpool\n").unwrap();

    assert_eq!(StorageConfig::load_from(&path).execution, ExecutionMode::Background);
}
