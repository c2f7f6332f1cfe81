#![cfg(feature = "config")]

use std::fs;
use std::path::{Path, PathBuf};
use terr_core::config::{ConfigError, ConfigLoader, RenderConfig};
use terr_core::{MissingPolicy, RenderOptions};

const NO_ENV: [(&str, &str); 0] = [];

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("errors.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn render_config_defaults_are_strict() {
    let cfg = RenderConfig::default();
    assert!(cfg.strict);
    assert_eq!(cfg.missing_marker, "...");
    assert!(RenderOptions::from(&cfg).is_strict());
}

#[test]
fn loads_lenient_settings_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), "strict = false\nmissing_marker = \"<unset>\"\n");

    let cfg = ConfigLoader::new().file(&path).env(NO_ENV).load().expect("config loads");
    assert!(!cfg.strict);
    assert_eq!(cfg.missing_marker, "<unset>");

    let options = RenderOptions::from(cfg);
    assert_eq!(options.missing(), &MissingPolicy::Marker("<unset>".into()));
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), "strict = false\n");

    let options = ConfigLoader::new().file(&path).env(NO_ENV).load_options().expect("config loads");
    assert_eq!(options, RenderOptions::lenient());
}

#[test]
fn missing_file_reports_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = ConfigLoader::new().file(path).env(NO_ENV).load().expect_err("file is required");
    let ConfigError::Config { context, .. } = &err;
    assert_eq!(context.as_deref(), Some("Failed to build config"));
    assert!(err.to_string().starts_with("Config error (Failed to build config): "));
}

#[test]
fn environment_alone_switches_to_lenient() {
    let options = ConfigLoader::new()
        .env([("TERR__STRICT", "false")])
        .load_options()
        .expect("config loads");
    assert_eq!(options, RenderOptions::lenient());
}

#[test]
fn environment_overrides_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), "strict = false\nmissing_marker = \"<unset>\"\n");

    let cfg = ConfigLoader::new()
        .file(&path)
        .env([("TERR__MISSING_MARKER", "??"), ("OTHER__STRICT", "true")])
        .load()
        .expect("config loads");
    assert!(!cfg.strict);
    assert_eq!(cfg.missing_marker, "??");
}

#[test]
fn unparsable_setting_reports_deserialize_context() {
    let err = ConfigLoader::new()
        .env([("TERR__STRICT", "sometimes")])
        .load()
        .expect_err("not a boolean");
    let ConfigError::Config { context, .. } = &err;
    assert_eq!(context.as_deref(), Some("Failed to deserialize config"));
}
