//! Unit tests for configuration and graceful degradation
//!
//! Tests:
//! - Missing TOML files fall back to defaults instead of failing
//! - Malformed or invalid TOML files are rejected
//! - Data directory priority: CLI > environment > TOML > compiled default
//! - Data layout creation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate TIERBOARD_DATA_DIR are marked with #[serial].

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tierboard_common::config::{
    default_data_dir, resolve_data_dir, DataLayout, TomlConfig, DATA_DIR_ENV,
};
use tierboard_common::Error;

#[test]
fn test_defaults() {
    let config = TomlConfig::default();
    assert_eq!(config.port, 3000);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.max_upload_files, 12);
    assert!(!config.reconcile_on_startup);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults_for_missing_keys() {
    let config = TomlConfig::parse(
        r#"
        port = 8080
        data_dir = "/srv/tiers"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.data_dir, Some(PathBuf::from("/srv/tiers")));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.max_upload_files, 12);
    assert_eq!(config.host, "0.0.0.0");
}

#[test]
fn test_malformed_toml_is_an_error() {
    let err = TomlConfig::parse("port = \"not a number\"").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_invalid_values_rejected() {
    assert!(matches!(
        TomlConfig::parse("max_upload_files = 0"),
        Err(Error::Config(_))
    ));
    assert!(matches!(TomlConfig::parse("host = \"  \""), Err(Error::Config(_))));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_existing_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 4100\nreconcile_on_startup = true\n").unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.port, 4100);
    assert!(config.reconcile_on_startup);
}

#[test]
fn test_existing_but_broken_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[[[").unwrap();

    assert!(TomlConfig::load_or_default(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(DATA_DIR_ENV, "/tmp/tierboard-env");
    let config = TomlConfig {
        data_dir: Some(PathBuf::from("/tmp/tierboard-toml")),
        ..TomlConfig::default()
    };

    let resolved = resolve_data_dir(Some(Path::new("/tmp/tierboard-cli")), &config);
    assert_eq!(resolved, PathBuf::from("/tmp/tierboard-cli"));

    env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(DATA_DIR_ENV, "/tmp/tierboard-env");
    let config = TomlConfig {
        data_dir: Some(PathBuf::from("/tmp/tierboard-toml")),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_data_dir(None, &config), PathBuf::from("/tmp/tierboard-env"));

    env::remove_var(DATA_DIR_ENV);
}

#[test]
#[serial]
fn test_toml_then_compiled_default() {
    env::remove_var(DATA_DIR_ENV);

    let config = TomlConfig {
        data_dir: Some(PathBuf::from("/tmp/tierboard-toml")),
        ..TomlConfig::default()
    };
    assert_eq!(resolve_data_dir(None, &config), PathBuf::from("/tmp/tierboard-toml"));

    assert_eq!(resolve_data_dir(None, &TomlConfig::default()), default_data_dir());
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(DATA_DIR_ENV, "");
    assert_eq!(resolve_data_dir(None, &TomlConfig::default()), default_data_dir());
    env::remove_var(DATA_DIR_ENV);
}

#[test]
fn test_data_layout_paths() {
    let layout = DataLayout::new("/srv/tiers");
    assert_eq!(layout.images_dir, PathBuf::from("/srv/tiers/images"));
    assert_eq!(layout.state_file, PathBuf::from("/srv/tiers/data/state.json"));
}

#[test]
fn test_data_layout_creation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path().join("nested"));

    layout.ensure_directories().unwrap();
    layout.ensure_directories().unwrap();

    assert!(layout.images_dir.is_dir());
    assert!(layout.state_file.parent().unwrap().is_dir());
    assert!(!layout.state_file.exists());
}
