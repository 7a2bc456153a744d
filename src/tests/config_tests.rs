//! Tests for the configuration module.

use crate::config::{ConfigLoader, NaluConfig, Validate};
use crate::data_structures::collision_resolver::ResolutionStrategy;
use crate::error::config::ConfigError;
use crate::tests::TestFixture;
use std::path::PathBuf;
use test_case::test_case;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = NaluConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.structures.hash_table_capacity, 1000);
    assert_eq!(config.structures.lru_capacity, 100);
    assert_eq!(config.structures.top_k, 10);
    assert_eq!(config.structures.max_collision_attempts, 10);
    assert_eq!(config.structures.default_strategy, ResolutionStrategy::Linear);
}

#[test_case(|c: &mut NaluConfig| c.structures.hash_table_capacity = 0 ; "zero table capacity")]
#[test_case(|c: &mut NaluConfig| c.structures.lru_capacity = 0 ; "zero cache capacity")]
#[test_case(|c: &mut NaluConfig| c.structures.top_k = 0 ; "zero top k")]
#[test_case(|c: &mut NaluConfig| c.structures.max_collision_attempts = 0 ; "zero attempts")]
#[test_case(|c: &mut NaluConfig| c.structures.max_url_length = 0 ; "zero url length")]
#[test_case(|c: &mut NaluConfig| c.service.base_url = "not a url".to_string() ; "bad base url")]
#[test_case(|c: &mut NaluConfig| c.service.base_url = "ftp://files.example.com".to_string() ; "non http base url")]
#[test_case(|c: &mut NaluConfig| c.log.level = "verbose".to_string() ; "bad log level")]
fn test_config_validation(mutate: fn(&mut NaluConfig)) {
    let mut config = NaluConfig::default();
    mutate(&mut config);
    assert!(config.validate().is_err());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .write_file(
            "nalu.toml",
            r#"
            [structures]
            lru_capacity = 2
            default_strategy = "append"

            [service]
            base_url = "https://nalu.example"
            "#,
        )
        .unwrap();

    let config = ConfigLoader::new(Some(&path), "TEST_NALU_FILE").load().unwrap();

    assert_eq!(config.structures.lru_capacity, 2);
    assert_eq!(config.structures.default_strategy, ResolutionStrategy::Append);
    assert_eq!(config.service.base_url, "https://nalu.example");
    // Untouched values keep their defaults
    assert_eq!(config.structures.top_k, 10);
    assert_eq!(config.log.level, "info");
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let path = fixture
        .write_file("nalu.toml", "[structures]\ntop_k = 3\n")
        .unwrap();

    fixture.set_env("TEST_NALU_ENV__STRUCTURES__TOP_K", "7");
    fixture.set_env("TEST_NALU_ENV__LOG__LEVEL", "debug");

    let config = ConfigLoader::new(Some(&path), "TEST_NALU_ENV").load().unwrap();

    assert_eq!(config.structures.top_k, 7);
    assert_eq!(config.log.level, "debug");
}

#[test]
fn test_missing_file() {
    let loader = ConfigLoader::new(Some("/definitely/not/here/nalu.toml"), "TEST_NALU_MISSING");

    assert!(matches!(loader.load(), Err(ConfigError::FileNotFound(_))));
    assert_eq!(loader.load_or_default().unwrap(), NaluConfig::default());
}

#[test]
fn test_default_location_is_optional() {
    // No config/nalu.toml ships with the crate.
    assert!(!std::path::Path::new(crate::config::DEFAULT_CONFIG_PATH).exists());
    assert!(matches!(
        ConfigLoader::default().load(),
        Err(ConfigError::FileNotFound(_))
    ));

    let config = ConfigLoader::default().load_or_default().unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.structures, NaluConfig::default().structures);
}

#[test]
fn test_unsupported_extension() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.write_file("nalu.ini", "lru_capacity = 2").unwrap();

    assert!(matches!(
        ConfigLoader::new(Some(&path), "TEST_NALU_INI").load(),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .write_file("invalid.toml", "[structures\nlru_capacity = \"two\"")
        .unwrap();

    assert!(ConfigLoader::new(Some(&path), "TEST_NALU_INVALID").load().is_err());
}

#[test]
fn test_values_failing_validation_are_rejected_on_load() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .write_file("nalu.json", r#"{ "structures": { "lru_capacity": 0 } }"#)
        .unwrap();

    assert!(matches!(
        ConfigLoader::new(Some(&path), "TEST_NALU_JSON").load(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_generated_toml_loads_back() {
    let fixture = TestFixture::new().unwrap();
    let mut config = NaluConfig::default();
    config.service.snapshot_path = Some(PathBuf::from("links.json"));

    let path = fixture
        .write_file("generated.toml", config.to_toml().unwrap())
        .unwrap();
    let loaded = ConfigLoader::new(Some(&path), "TEST_NALU_GEN").load().unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_short_url_joins_base() {
    let mut config = NaluConfig::default();
    config.service.base_url = "https://nalu.example/".to_string();
    assert_eq!(config.service.short_url("g8"), "https://nalu.example/g8");
}
