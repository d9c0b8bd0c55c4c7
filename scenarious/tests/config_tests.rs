use pretty_assertions::assert_eq;
use scenarious::{ConfigError, ScenarioConfig};
use std::io::Write;

#[test]
fn defaults() {
    let config = ScenarioConfig::default();
    assert_eq!(config.id_field, "id");
    assert_eq!(config.alias_field, "_alias");
    assert_eq!(config.reference_sigil, "$");
    assert!(config.load_priority.is_empty());
}

#[test]
fn partial_toml_keeps_defaults() {
    let config = ScenarioConfig::from_toml_str("load_priority = [\"genre\", \"actor\"]").unwrap();
    assert_eq!(
        config,
        ScenarioConfig {
            load_priority: vec!["genre".into(), "actor".into()],
            ..Default::default()
        }
    );
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(ScenarioConfig::from_toml_str("").unwrap(), ScenarioConfig::default());
}

#[test]
fn invalid_toml() {
    let err = ScenarioConfig::from_toml_str("load_priority = 3").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "alias_field = \"nick\"").unwrap();

    let config = ScenarioConfig::from_file(file.path()).unwrap();
    assert_eq!(config.alias_field, "nick");
    assert_eq!(config.id_field, "id");
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ScenarioConfig::from_file(dir.path().join("scenario.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn empty_sigil_is_rejected() {
    let err = ScenarioConfig::from_toml_str("reference_sigil = \"\"").unwrap_err();
    assert!(matches!(err, ConfigError::EmptyField("reference_sigil")));
    assert_eq!(err.to_string(), "config field 'reference_sigil' must not be empty");
}

#[test]
fn empty_reserved_field_is_rejected() {
    let err = ScenarioConfig::from_toml_str("alias_field = \"\"").unwrap_err();
    assert!(matches!(err, ConfigError::EmptyField("alias_field")));
}

#[test]
fn validate_accepts_defaults() {
    assert!(ScenarioConfig::default().validate().is_ok());
}
