//! The fixed set of MCP servers written to every target.

use crate::config::{ServerEntry, ServerMap};
use indexmap::IndexMap;

/// Server given a filesystem root to expose.
pub const FILESYSTEM_SERVER: &str = "filesystem";
/// Server given a `--repository` to operate on.
pub const GIT_SERVER: &str = "git";
/// Placeholder VS Code-like editors expand to the open folder.
pub const WORKSPACE_PLACEHOLDER: &str = "${workspaceFolder}";

/// External runtime a group of servers is launched through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerGroup {
    /// Packages run with `npx`.
    Node,
    /// Packages run with `uvx`.
    Python,
}

impl ServerGroup {
    /// Executables that can launch this group, any one of which suffices.
    pub const fn launchers(self) -> &'static [&'static str] {
        match self {
            Self::Node => &["npx"],
            Self::Python => &["uvx", "uv"],
        }
    }

    /// How the runtime is described to the user when missing.
    pub const fn requirement(self) -> &'static str {
        match self {
            Self::Node => "npx (Node.js)",
            Self::Python => "uv/uvx (Python package manager)",
        }
    }

    pub const fn install_hint(self) -> &'static str {
        match self {
            Self::Node => "npx: Install Node.js from https://nodejs.org/",
            Self::Python => "uv: Install with: curl -LsSf https://astral.sh/uv/install.sh | sh",
        }
    }
}

/// A server that is only written when a secret can be found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretBackedServer {
    pub name: String,
    pub template: ServerEntry,
    /// Name looked up in the secret provider.
    pub secret_name: String,
    /// Environment variable the secret is passed in.
    pub env_var: String,
}

impl SecretBackedServer {
    /// The entry with `secret` injected, leaving the template untouched.
    pub fn entry_with_secret(&self, secret: &str) -> ServerEntry {
        self.template.with_env(&self.env_var, secret)
    }
}

/// Server templates grouped by launcher, in the order they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCatalog {
    node: ServerMap,
    python: ServerMap,
    secret_backed: Vec<SecretBackedServer>,
}

impl ServerCatalog {
    pub fn new(node: ServerMap, python: ServerMap, secret_backed: Vec<SecretBackedServer>) -> Self {
        Self { node, python, secret_backed }
    }

    /// The reference MCP servers published under `@modelcontextprotocol`
    /// and `mcp-server-*`.
    pub fn standard() -> Self {
        let node = ["memory", FILESYSTEM_SERVER, "everything", "sequentialthinking"]
            .into_iter()
            .map(|name| {
                let package = format!("@modelcontextprotocol/server-{name}");
                (name.to_string(), ServerEntry::new("npx", ["-y".to_string(), package]))
            })
            .collect::<IndexMap<_, _>>();

        let python = [GIT_SERVER, "fetch", "time"]
            .into_iter()
            .map(|name| (name.to_string(), ServerEntry::new("uvx", [format!("mcp-server-{name}")])))
            .collect::<IndexMap<_, _>>();

        let github = SecretBackedServer {
            name: "github".to_string(),
            template: ServerEntry::new("npx", ["-y", "@modelcontextprotocol/server-github"]),
            secret_name: "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
            env_var: "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
        };

        Self::new(node, python, vec![github])
    }

    pub const fn group(&self, group: ServerGroup) -> &ServerMap {
        match group {
            ServerGroup::Node => &self.node,
            ServerGroup::Python => &self.python,
        }
    }

    pub fn secret_backed(&self) -> &[SecretBackedServer] {
        &self.secret_backed
    }

    /// Groups that have at least one server, in write order.
    pub fn active_groups(&self) -> Vec<ServerGroup> {
        [ServerGroup::Node, ServerGroup::Python]
            .into_iter()
            .filter(|group| {
                let secret_launcher = matches!(group, ServerGroup::Node)
                    && self.secret_backed.iter().any(|s| s.template.command == "npx");
                !self.group(*group).is_empty() || secret_launcher
            })
            .collect()
    }
}
