use mcp_setup::catalog::{ServerCatalog, ServerGroup};
use mcp_setup::config::ServerEntry;
use mcp_setup::prerequisites::{install_hints, missing_prerequisites};
use pretty_assertions::assert_eq;

#[test]
fn test_standard_catalog_launchers() {
    let catalog = ServerCatalog::standard();

    assert!(catalog.group(ServerGroup::Node).values().all(|entry| entry.command == "npx"));
    assert!(catalog.group(ServerGroup::Python).values().all(|entry| entry.command == "uvx"));
    assert_eq!(
        catalog.group(ServerGroup::Python)["time"],
        ServerEntry::new("uvx", ["mcp-server-time"])
    );
}

#[test]
fn test_secret_backed_entry_carries_token() {
    let catalog = ServerCatalog::standard();
    let github = &catalog.secret_backed()[0];

    let entry = github.entry_with_secret("ghp_test");

    assert_eq!(entry.args, github.template.args);
    assert_eq!(
        entry.env.get("GITHUB_PERSONAL_ACCESS_TOKEN").map(String::as_str),
        Some("ghp_test")
    );
}

#[test]
fn test_catalog_without_python_needs_no_uv() {
    let mut node = indexmap::IndexMap::new();
    node.insert("memory".to_string(), ServerEntry::new("npx", ["-y", "server-memory"]));
    let catalog = ServerCatalog::new(node, indexmap::IndexMap::new(), Vec::new());

    assert_eq!(catalog.active_groups(), vec![ServerGroup::Node]);
    assert_eq!(missing_prerequisites(&catalog, |name| name == "npx"), Vec::<String>::new());
    assert_eq!(install_hints(&catalog).len(), 1);
}
