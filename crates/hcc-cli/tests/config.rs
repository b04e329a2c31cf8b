use std::fs;

use hcc_cli::config::{ConfigOverrides, load_engine_config, resolve_standards_dir};
use hcc_model::{EngineConfig, ModelVersion, PayerModel};

#[test]
fn file_values_fill_missing_keys_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    fs::write(&path, "version = \"v24\"\nbase_rate = 900.5\n").unwrap();

    let config = load_engine_config(Some(&path), ConfigOverrides::default()).unwrap();
    assert_eq!(
        config,
        EngineConfig::default()
            .with_version(ModelVersion::V24)
            .with_base_rate(900.5)
    );
}

#[test]
fn flags_override_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    fs::write(&path, "version = \"v24\"\nmodel = \"CFA\"\nnever_trump = true\n").unwrap();

    let overrides = ConfigOverrides {
        version: Some(ModelVersion::V22),
        model: None,
        base_rate: Some(1000.0),
    };
    let config = load_engine_config(Some(&path), overrides).unwrap();
    assert_eq!(config.version, ModelVersion::V22);
    assert_eq!(config.model, PayerModel::CommunityFullDualAged);
    assert_eq!(config.base_rate, 1000.0);
    assert!(config.never_trump);
}

#[test]
fn no_file_means_defaults() {
    let config = load_engine_config(None, ConfigOverrides::default()).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn unknown_version_in_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    fs::write(&path, "version = \"v21\"\n").unwrap();

    let error = load_engine_config(Some(&path), ConfigOverrides::default()).unwrap_err();
    assert!(error.to_string().starts_with("parse config"));
}

#[test]
fn explicit_standards_dir_wins() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(resolve_standards_dir(Some(dir.path())), dir.path());
}
