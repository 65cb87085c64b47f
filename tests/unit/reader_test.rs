use assert_fs::prelude::*;
use mcp_setup::config::reader::{read_config_document, ExistingDocument};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_read_absent_file() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let existing = read_config_document(temp_dir.path().join("settings.json")).unwrap();

    assert_eq!(existing, ExistingDocument::Absent);
    assert!(!existing.exists());
}

#[test]
fn test_read_settings_with_servers() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let file = temp_dir.child("settings.json");
    file.write_str(
        r#"{
  "editor.fontSize": 14,
  "workbench.colorTheme": "Solarized Dark",
  "mcpServers": {
    "remote": {"type": "sse", "url": "https://example.com/sse"},
    "local": {"command": "node", "args": ["server.js"], "env": {"DEBUG": "1"}}
  }
}"#,
    )
    .unwrap();

    let ExistingDocument::Parsed(document) = read_config_document(file.path()).unwrap() else {
        panic!("expected a parsed document");
    };

    assert_eq!(document.other.get("editor.fontSize"), Some(&json!(14)));
    assert_eq!(document.server_names(), vec!["remote", "local"]);

    let servers = document.mcp_servers.unwrap();
    assert_eq!(servers["remote"].extra.get("url"), Some(&json!("https://example.com/sse")));
    assert_eq!(servers["local"].env.get("DEBUG").map(String::as_str), Some("1"));
}

#[test]
fn test_read_malformed_file() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let file = temp_dir.child("settings.json");
    file.write_str("{\"editor.fontSize\": 14,").unwrap();

    let existing = read_config_document(file.path()).unwrap();

    assert!(existing.exists());
    assert!(matches!(existing, ExistingDocument::Malformed(_)));
    assert_eq!(existing.into_document(), None);
}

#[test]
fn test_unusable_servers_value_keeps_other_keys() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let file = temp_dir.child("settings.json");
    file.write_str(r#"{"theme": "dark", "mcpServers": ["not", "a", "map"]}"#).unwrap();

    let document = read_config_document(file.path()).unwrap().into_document().unwrap();

    assert_eq!(document.mcp_servers, None);
    assert_eq!(document.other.get("theme"), Some(&json!("dark")));
}
