//! Builds the new `mcpServers` mapping and installs it into a settings
//! document. Nothing here touches the filesystem.

use crate::catalog::{
    ServerCatalog, ServerGroup, FILESYSTEM_SERVER, GIT_SERVER, WORKSPACE_PLACEHOLDER,
};
use crate::config::{ConfigDocument, ServerEntry, ServerMap};
use crate::secrets::SecretProvider;
use crate::target::TargetKind;
use tracing::{debug, warn};

/// Paths that specialise the catalog for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Explicit workspace chosen by the user.
    pub workspace_path: Option<String>,
    /// Filesystem root for targets without a workspace concept.
    pub default_path: Option<String>,
}

impl MergeOptions {
    /// Path handed to the filesystem server, if any.
    fn filesystem_root(&self, kind: TargetKind) -> Option<String> {
        match kind {
            TargetKind::Editor => Some(self.workspace_or_placeholder()),
            TargetKind::Desktop => {
                self.workspace_path.clone().or_else(|| self.default_path.clone())
            },
        }
    }

    /// Repository handed to the git server, if any.
    fn repository(&self, kind: TargetKind) -> Option<String> {
        match kind {
            TargetKind::Editor => Some(self.workspace_or_placeholder()),
            TargetKind::Desktop => self.workspace_path.clone(),
        }
    }

    fn workspace_or_placeholder(&self) -> String {
        self.workspace_path.clone().unwrap_or_else(|| WORKSPACE_PLACEHOLDER.to_string())
    }
}

fn specialise(
    name: &str,
    template: &ServerEntry,
    kind: TargetKind,
    options: &MergeOptions,
) -> ServerEntry {
    match name {
        FILESYSTEM_SERVER => options.filesystem_root(kind).map_or_else(
            || {
                warn!("No filesystem root available; {FILESYSTEM_SERVER} server added without one");
                template.clone()
            },
            |root| template.with_args([root]),
        ),
        GIT_SERVER => options.repository(kind).map_or_else(
            || template.clone(),
            |repo| template.with_args(["--repository".to_string(), repo]),
        ),
        _ => template.clone(),
    }
}

/// Build the full server mapping for one target.
pub fn build_servers(
    catalog: &ServerCatalog,
    kind: TargetKind,
    options: &MergeOptions,
    secrets: &dyn SecretProvider,
) -> ServerMap {
    let mut servers = ServerMap::new();

    for group in [ServerGroup::Node, ServerGroup::Python] {
        for (name, template) in catalog.group(group) {
            servers.insert(name.clone(), specialise(name, template, kind, options));
        }
    }

    if kind == TargetKind::Desktop {
        for server in catalog.secret_backed() {
            let secret = secrets
                .lookup(&server.secret_name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());

            match secret {
                Some(secret) => {
                    debug!("Adding {} server with secret {}", server.name, server.secret_name);
                    servers.insert(server.name.clone(), server.entry_with_secret(&secret));
                },
                None => warn!(
                    "{} not found. The {} MCP server will need manual configuration.",
                    server.secret_name, server.name
                ),
            }
        }
    }

    servers
}

/// Merge the catalog into `existing`.
///
/// Every key other than `mcpServers` is kept as is. `mcpServers` is replaced
/// as a whole, so entries added by hand are dropped; see [`replaced_servers`].
pub fn merge_config(
    existing: Option<ConfigDocument>,
    catalog: &ServerCatalog,
    kind: TargetKind,
    options: &MergeOptions,
    secrets: &dyn SecretProvider,
) -> ConfigDocument {
    let mut document = existing.unwrap_or_default();
    document.set_servers(build_servers(catalog, kind, options, secrets));
    document
}

/// Servers in `existing` that `merged` no longer contains.
pub fn replaced_servers(existing: &ConfigDocument, merged: &ConfigDocument) -> Vec<String> {
    existing
        .previous_server_names()
        .into_iter()
        .filter(|name| merged.mcp_servers.as_ref().map_or(true, |new| !new.contains_key(*name)))
        .map(String::from)
        .collect()
}
