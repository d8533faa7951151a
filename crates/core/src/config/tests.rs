//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str, suffix: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

const CUSTOM_TOML: &str = r#"
    active_profile = "Forms"

    [formatting]
    indent_size = 2

    [[profiles]]
    name = "Forms"
    class_grouping = "StackLayout"
    fallback_output = "<Label Text=\"{Binding $name$}\" />"
    sub_property_output = "<Label Text=\"{Binding $name$}\" />"
    enum_member_output = "<Label Text=\"$element$\" />"

    [[profiles.mappings]]
    type = "string"
    name_contains = "password|pwd"
    output = "<Entry IsPassword=\"True\" Text=\"{Binding $name$}\" />"

    [[profiles.mappings]]
    type = "string"
    output = "<Entry Text=\"{Binding $name$}\" />"

    [[profiles.mappings]]
    type = "string"
    if_read_only = true
    output = "<Label Text=\"{Binding $name$}\" />"
"#;

#[test]
fn test_defaults_are_valid() {
    let settings = Settings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.active_profile, "UWP");
    assert_eq!(settings.formatting.indent_size, 4);
    assert_eq!(settings.generation.max_sub_property_depth, 5);
    assert_eq!(settings.generation.excluded_properties, vec!["IsInDesignMode*"]);
    assert_eq!(settings.profile_names(), vec!["UWP", "UWP Grid"]);
}

#[test]
fn test_from_toml_str_custom_profile() {
    let settings = Settings::from_toml_str(CUSTOM_TOML).expect("Failed to parse valid TOML");
    assert_eq!(settings.active_profile, "Forms");
    assert_eq!(settings.formatting.indent_size, 2);

    let profile = settings.active().expect("active profile should exist");
    assert_eq!(profile.class_grouping, "StackLayout");
    assert_eq!(profile.mappings.len(), 3);
    assert_eq!(profile.mappings[0].name_contains, "password|pwd");
    assert!(!profile.mappings[1].if_read_only);
    assert!(profile.mappings[2].if_read_only);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_from_toml_str_minimal_uses_default_profiles() {
    let settings = Settings::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_from_toml_str_invalid_syntax() {
    let result = Settings::from_toml_str("[formatting\nindent_size = 2");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse TOML"));
}

#[test]
fn test_profile_lookup_is_case_insensitive() {
    let settings = Settings::default();
    assert!(settings.profile("uwp grid").is_some());
    assert!(settings.profile("WPF").is_none());
}

#[test]
fn test_validate_missing_active_profile() {
    let settings = Settings {
        active_profile: "WPF".to_string(),
        ..Settings::default()
    };
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("Active profile 'WPF' not found"));
}

#[test]
fn test_validate_duplicate_profile_names() {
    let mut settings = Settings::default();
    settings.profiles.push(Profile::new("uwp"));
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("Duplicate profile name"));
}

#[test]
fn test_validate_no_profiles() {
    let settings = Settings {
        profiles: Vec::new(),
        ..Settings::default()
    };
    assert!(settings.validate().is_err());
}

#[test]
fn test_validate_indent_and_depth_limits() {
    let mut settings = Settings::default();
    settings.formatting.indent_size = 40;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.generation.max_sub_property_depth = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_validate_unknown_placeholder() {
    let mut settings = Settings::default();
    settings.profiles[0]
        .mappings
        .push(Mapping::new("Guid", "<TextBlock Text=\"$nmae$\" />"));
    let err = settings.validate().unwrap_err().to_string();
    assert!(err.contains("unknown placeholder $nmae$"), "{err}");
}

#[test]
fn test_profile_validation_errors_collects_all() {
    let mut profile = Profile::new("Broken");
    profile.fallback_output = "<X A=\"$bogus$\" />".to_string();
    profile.mappings.push(Mapping::new("", "<X />"));
    profile.mappings.push(Mapping::new("List<int", "<X />"));
    profile.mappings.push(Mapping::new("enum|Array", ""));

    let errors = profile.validation_errors();
    assert_eq!(errors.len(), 4, "{errors:?}");
    assert!(errors[0].contains("$bogus$"));
    assert!(errors[1].contains("mapping 0 has no type"));
    assert!(errors[2].contains("invalid type 'List<int'"));
    assert!(errors[3].contains("mapping 2 (enum|Array) has no output"));
}

#[test]
fn test_mapping_alternatives_are_trimmed() {
    let mapping = Mapping::new(" string | int ||", "<X />").with_name_contains("Pass| |pwd");
    assert_eq!(mapping.type_alternatives().collect::<Vec<_>>(), vec!["string", "int"]);
    assert_eq!(mapping.name_alternatives().collect::<Vec<_>>(), vec!["Pass", "pwd"]);
}

#[test]
fn test_profile_from_json() {
    let json = r#"{
        "name": "WPF",
        "class_grouping": "StackPanel",
        "fallback_output": "<TextBlock Text=\"{Binding $name$}\" />",
        "mappings": [
            { "type": "bool", "output": "<CheckBox IsChecked=\"{Binding $name$}\" />" }
        ]
    }"#;
    let profile = Profile::from_json_str(json).expect("Failed to parse profile");
    assert_eq!(profile.name, "WPF");
    assert_eq!(profile.mappings[0].type_names, "bool");
    assert_eq!(profile.mappings[0].name_contains, "");
    assert_eq!(profile.sub_property_output, "");
}

#[test]
fn test_from_file_toml() {
    let file = create_temp_config_file(CUSTOM_TOML, ".toml").expect("temp file");
    let settings = Settings::from_file(file.path()).expect("Failed to load settings");
    assert_eq!(settings.active_profile, "Forms");
    assert_eq!(settings.formatting.indent_size, 2);
    assert_eq!(settings.profiles.len(), 1);
}

#[test]
fn test_from_file_json() {
    let json = r#"{ "active_profile": "UWP Grid", "formatting": { "indent_size": 3 } }"#;
    let file = create_temp_config_file(json, ".json").expect("temp file");
    let settings = Settings::from_file(file.path()).expect("Failed to load settings");
    assert_eq!(settings.active_profile, "UWP Grid");
    assert_eq!(settings.formatting.indent_size, 3);
    assert_eq!(settings.profiles.len(), 2);
}

#[test]
fn test_from_file_missing_uses_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings =
        Settings::from_file(&dir.path().join("absent.toml")).expect("Failed to load settings");
    assert_eq!(settings.formatting.indent_size, 4);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_defaults_round_trip_through_toml() {
    let settings = Settings::default();
    let text = settings.to_toml_string().expect("serialize");
    let parsed = Settings::from_toml_str(&text).expect("parse");
    assert_eq!(parsed, settings);
}
