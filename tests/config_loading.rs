//! Integration tests for configuration files and client construction

use orientador::commands::build_controller;
use orientador::config::{Config, DEFAULT_BASE_URL};
use orientador::error::ChatError;
use orientador::llm::GeminiClient;
use tempfile::TempDir;

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(matches!(err.downcast_ref::<ChatError>(), Some(ChatError::Config(_))));
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "api_key = \"abc\"\nhistory_window = 4\n\n[ui]\nshow_sidebar = true\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.api_key.as_deref(), Some("abc"));
    assert_eq!(config.history_window, 4);
    assert!(config.ui.show_sidebar);
    assert_eq!(config.ui.tick_rate_ms, 50);
    assert_eq!(config.model, "gemini-2.5-flash");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "history_window = 0\n").unwrap();
    assert!(Config::load(Some(&path)).is_err());

    std::fs::write(&path, "model = [1, 2]\n").unwrap();
    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_configured_key_builds_client() {
    let config = Config {
        api_key: Some("abc".to_string()),
        model: "gemini-2.5-pro".to_string(),
        ..Config::default()
    };
    let client = GeminiClient::from_config(&config).unwrap().unwrap();
    assert_eq!(client.model(), "gemini-2.5-pro");

    let controller = build_controller(&config).unwrap();
    assert!(controller.can_send());
}

#[test]
fn test_blank_key_falls_back_to_lookup() {
    let config = Config {
        api_key: Some("   ".to_string()),
        ..Config::default()
    };
    let key = config.credential_from(|name| (name == "API_KEY").then(|| "from-env".to_string()));
    assert_eq!(key.as_deref(), Some("from-env"));

    let none = config.credential_from(|_| Some(String::new()));
    assert!(none.is_none());
}
