use mcp_setup::app_config::{AppConfig, SecretManagerType};
use mcp_setup::secrets::SecretProvider;
use serial_test::serial;
use std::fs;

/// Point `XDG_CONFIG_HOME` at a temp dir holding `content` as config.toml.
fn with_config<F: FnOnce()>(content: Option<&str>, test: F) {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    if let Some(content) = content {
        let dir = temp_dir.path().join("mcp-setup");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), content).unwrap();
    }

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    test();

    match original {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
}

#[test]
#[serial]
fn test_load_missing_config() {
    with_config(None, || {
        assert_eq!(AppConfig::load().unwrap(), None);
    });
}

#[test]
#[serial]
fn test_load_full_config() {
    let content = r#"
[secret-manager]
type = "env"

[default]
workspace = "/home/me/code"
documents-path = "/home/me/Notes"
"#;
    with_config(Some(content), || {
        let config = AppConfig::load().unwrap().unwrap();
        assert_eq!(
            config.secret_manager.map(|s| s.manager_type),
            Some(SecretManagerType::Env)
        );
        assert_eq!(config.default_workspace(), Some("/home/me/code"));
        assert_eq!(config.documents_path(), Some("/home/me/Notes"));
    });
}

#[test]
#[serial]
fn test_load_invalid_config_fails() {
    with_config(Some("[secret-manager]\ntype = \"vault\"\n"), || {
        let error = AppConfig::load().unwrap_err();
        assert!(format!("{error:#}").contains("Failed to parse TOML config"));
    });
}

#[test]
#[serial]
fn test_disabled_secret_manager_ignores_environment() {
    with_config(Some("[secret-manager]\ntype = \"none\"\n"), || {
        std::env::set_var("MCP_SETUP_APP_CONFIG_SECRET", "value");
        let config = AppConfig::load().unwrap().unwrap();

        assert_eq!(config.secret_chain().lookup("MCP_SETUP_APP_CONFIG_SECRET"), None);
        std::env::remove_var("MCP_SETUP_APP_CONFIG_SECRET");
    });
}

#[test]
#[serial]
fn test_env_secret_manager_reads_environment() {
    with_config(Some("[secret-manager]\ntype = \"env\"\n"), || {
        std::env::set_var("MCP_SETUP_APP_CONFIG_SECRET", "value");
        let config = AppConfig::load().unwrap().unwrap();

        assert_eq!(
            config.secret_chain().lookup("MCP_SETUP_APP_CONFIG_SECRET"),
            Some("value".to_string())
        );
        std::env::remove_var("MCP_SETUP_APP_CONFIG_SECRET");
    });
}
