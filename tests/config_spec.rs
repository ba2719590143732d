use std::fs;

use incident_desk::config::ServerConfig;
use incident_desk::service::ResolvePolicy;
use tempfile::TempDir;

#[test]
fn loads_settings_from_json_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "admin_token": "from-file",
            "cors_origins": ["https://desk.example"],
            "resolve_policy": "strict"
        }"#,
    )
    .expect("Failed to write config");

    let config = ServerConfig::from_file(&path).expect("Failed to load config");

    assert_eq!(config.admin_token.as_deref(), Some("from-file"));
    assert!(config.tenant_token.is_none());
    assert_eq!(
        config.cors_origins,
        Some(vec!["https://desk.example".to_string()])
    );
    assert_eq!(config.resolve_policy, ResolvePolicy::Strict);
    assert!(!config.permissive_auth);
}

#[test]
fn environment_overrides_file_values() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "admin_token": "from-file" }"#).expect("Failed to write config");

    let config = ServerConfig::from_file(&path)
        .and_then(|c| {
            c.with_overrides(|key| {
                (key == "INCIDENT_DESK_ADMIN_TOKEN").then(|| "from-env".to_string())
            })
        })
        .expect("Failed to load config");

    assert_eq!(config.admin_token.as_deref(), Some("from-env"));
}

#[test]
fn rejects_malformed_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").expect("Failed to write config");

    let err = ServerConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn load_tolerates_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("absent.json");

    assert!(ServerConfig::from_file(&path).is_err());
    assert!(ServerConfig::load(Some(&path)).is_ok());
}
