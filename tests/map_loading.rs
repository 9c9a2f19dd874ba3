//! Integration tests for loading one entry of a map document.

use confident::prelude::*;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Deployment {
    title: String,
    host: String,
    port: u16,
    deployment: String,
}

impl Schema for Deployment {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("title", FieldKind::String),
            FieldSpec::required("host", FieldKind::String),
            FieldSpec::required("port", FieldKind::Integer),
            FieldSpec::optional("deployment", FieldKind::String, "dev"),
        ]
    }

    fn options() -> ConfigOptions {
        ConfigOptions {
            source_priority: Some(vec![
                ConfigSource::Init,
                ConfigSource::Map,
                ConfigSource::File,
                ConfigSource::ClassDefault,
            ]),
            ..Default::default()
        }
    }
}

/// Same fields, with `deployment` flagged as the map selector.
#[derive(Debug, Deserialize, PartialEq)]
struct SelectedDeployment {
    title: String,
    host: String,
    port: u16,
    deployment: String,
}

impl Schema for SelectedDeployment {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("title", FieldKind::String),
            FieldSpec::required("host", FieldKind::String),
            FieldSpec::required("port", FieldKind::Integer),
            FieldSpec::optional("deployment", FieldKind::String, "dev").map_selector(),
        ]
    }

    fn options() -> ConfigOptions {
        Deployment::options()
    }
}

fn deployments() -> serde_json::Value {
    json!({
        "dev": {"title": "dev app", "host": "0.0.0.0", "port": "5000"},
        "prod": {"title": "prod app", "host": "1.1.1.1", "port": 8080},
    })
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn test_map_name_from_document_file() {
    let temp_dir = TempDir::new().unwrap();
    let map_path = write_json(temp_dir.path(), "deployments.json", &deployments());

    let config = Confident::from_map(map_path.clone())
        .map_name("prod")
        .build::<Deployment>()
        .unwrap();

    assert_eq!(config.host, "1.1.1.1");
    assert_eq!(config.port, 8080);
    assert_eq!(config.deployment, "dev");

    let fields = config.full_fields();
    let host = &fields["host"];
    assert_eq!(host.source_type, ConfigSource::Map);
    assert_eq!(host.source_name, "prod");
    assert_eq!(host.source_location, SourceLocation::Path(map_path));
}

#[test]
fn test_inline_document_converts_values() {
    let config = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .map_name("dev")
        .build::<Deployment>()
        .unwrap();

    assert_eq!(config.port, 5000);
    let fields = config.full_fields();
    let port = &fields["port"];
    assert_eq!(port.origin_value, json!("5000"));
    assert_eq!(port.value, json!(5000));
}

#[test]
fn test_flagged_selector_reads_init_value() {
    let config = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .with_value("deployment", "prod")
        .build::<SelectedDeployment>()
        .unwrap();

    assert_eq!(config.title, "prod app");
    assert_eq!(config.deployment, "prod");
    assert_eq!(config.specs().map_field.as_deref(), Some("deployment"));
    assert_eq!(config.specs().map_name, None);
    assert_eq!(config.specs().resolved_map_name.as_deref(), Some("prod"));
}

#[test]
fn test_flagged_selector_falls_back_to_default() {
    let config = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .build::<SelectedDeployment>()
        .unwrap();

    assert_eq!(config.title, "dev app");
}

#[test]
fn test_explicit_selector_field() {
    let config = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .map_field("deployment")
        .with_value("deployment", "prod")
        .build::<Deployment>()
        .unwrap();

    assert_eq!(config.host, "1.1.1.1");
}

#[test]
fn test_entry_pointing_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let entry_path = temp_dir.path().join("prod.yaml");
    fs::write(&entry_path, "title: from entry file\nhost: 10.0.0.1\nport: 443\n").unwrap();
    let map_path = write_json(
        temp_dir.path(),
        "map.json",
        &json!({"prod": entry_path.display().to_string()}),
    );

    let config = Confident::from_map(map_path)
        .map_name("prod")
        .build::<Deployment>()
        .unwrap();

    assert_eq!(config.title, "from entry file");
    assert_eq!(config.port, 443);
}

#[test]
fn test_explicit_selector_conflicts_with_flag() {
    let result = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .map_field("title")
        .build::<SelectedDeployment>();

    match result {
        Err(ConfigError::Configuration(msg)) => {
            assert!(msg.contains("SelectedDeployment declaration"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("conflicting selectors must be rejected"),
    }
}

#[test]
fn test_map_name_and_field_conflict() {
    let result = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .map_name("prod")
        .map_field("deployment")
        .build::<Deployment>();

    assert!(matches!(result, Err(ConfigError::Configuration(_))));
}

#[test]
fn test_missing_document() {
    let result = Confident::builder().map_name("prod").build::<Deployment>();

    match result {
        Err(err) => assert!(err.to_string().contains("No `config_map` was provided.")),
        Ok(_) => panic!("a map name without a document must be rejected"),
    }
}

#[test]
fn test_missing_entry() {
    let result = Confident::from_map(ConfigMap::from_value(json!({"dev": {}})).unwrap())
        .map_name("prod")
        .build::<Deployment>();

    match result {
        Err(err @ ConfigError::MapEntryNotFound { .. }) => {
            assert!(err.to_string().contains("map_name='prod'"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("missing entry must be rejected"),
    }
}

#[test]
fn test_selector_value_must_be_a_string() {
    for value in [json!(true), json!(7)] {
        let result = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
            .map_field("deployment")
            .with_value("deployment", value)
            .build::<Deployment>();

        assert!(matches!(result, Err(ConfigError::InvalidSelector { .. })));
    }
}

#[test]
fn test_selector_inside_entry_is_rejected() {
    let document = json!({
        "prod": {"title": "t", "host": "h", "port": 1, "deployment": "dev"},
    });
    let result = Confident::from_map(ConfigMap::from_value(document).unwrap())
        .with_value("deployment", "prod")
        .build::<SelectedDeployment>();

    match result {
        Err(err) => assert!(err
            .to_string()
            .contains("map_field='deployment' cannot appear in the map config key 'prod'.")),
        Ok(_) => panic!("selector inside its own entry must be rejected"),
    }
}

#[test]
fn test_written_specs_with_selector_resolve_again() {
    let temp_dir = TempDir::new().unwrap();
    let original = Confident::from_map(ConfigMap::from_value(deployments()).unwrap())
        .build::<SelectedDeployment>()
        .unwrap();
    assert_eq!(original.specs().resolved_map_name.as_deref(), Some("dev"));

    let specs_path = temp_dir.path().join("frozen.json");
    original.specs().write_to(&specs_path).unwrap();

    let rebuilt = Confident::from_specs(&specs_path)
        .build::<SelectedDeployment>()
        .unwrap();
    assert_eq!(*rebuilt, *original);
    assert_eq!(rebuilt.specs().map_name, None);
    assert_eq!(rebuilt.specs().resolved_map_name.as_deref(), Some("dev"));

    let switched = Confident::from_specs(&specs_path)
        .with_value("deployment", "prod")
        .build::<SelectedDeployment>()
        .unwrap();
    assert_eq!(switched.title, "prod app");
    assert_eq!(switched.specs().resolved_map_name.as_deref(), Some("prod"));
}
