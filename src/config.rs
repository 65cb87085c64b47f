#![allow(clippy::self_named_module_files)]

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub mod reader;
pub mod writer;

/// Key this tool owns inside every target configuration file.
pub const MCP_SERVERS_KEY: &str = "mcpServers";

/// Server entries keyed by name, in insertion order.
pub type ServerMap = IndexMap<String, ServerEntry>;

/// A command line the host application runs to start one MCP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerEntry {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    // Keeps fields such as `type` or `url` on entries written by other tools
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl ServerEntry {
    pub fn new<I, S>(command: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: IndexMap::new(),
            extra: Map::new(),
        }
    }

    /// Returns a copy with `extra` appended to the argument list.
    #[must_use]
    pub fn with_args<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entry = self.clone();
        entry.args.extend(extra.into_iter().map(Into::into));
        entry
    }

    /// Returns a copy with one environment variable set.
    #[must_use]
    pub fn with_env(&self, key: &str, value: &str) -> Self {
        let mut entry = self.clone();
        entry.env.insert(key.to_string(), value.to_string());
        entry
    }
}

/// One application's settings file.
///
/// Only `mcpServers` is interpreted. All other top-level keys are carried in
/// `other` and written back with their values untouched. An existing
/// `mcpServers` key is written back at the position it was read from.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "Map<String, Value>")]
pub struct ConfigDocument {
    pub other: Map<String, Value>,
    pub mcp_servers: Option<ServerMap>,
    /// Index of `mcpServers` among the keys of `other`. `None` means last.
    servers_position: Option<usize>,
    /// Existing server entries whose shape did not fit [`ServerEntry`].
    unreadable_servers: Vec<String>,
}

impl ConfigDocument {
    /// Build a document from an already parsed JSON object.
    ///
    /// Server entries that do not fit [`ServerEntry`] are dropped with a
    /// warning instead of failing, since `mcpServers` is replaced on every
    /// run anyway. Their names are kept for [`Self::previous_server_names`].
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let position = object.keys().position(|key| key == MCP_SERVERS_KEY);
        let raw_servers = object.shift_remove(MCP_SERVERS_KEY);
        let servers_position = position.filter(|index| *index < object.len());

        let mut unreadable_servers = Vec::new();
        let mcp_servers = match raw_servers {
            Some(Value::Object(entries)) => {
                let mut servers = ServerMap::new();
                for (name, value) in entries {
                    match serde_json::from_value::<ServerEntry>(value) {
                        Ok(entry) => {
                            servers.insert(name, entry);
                        },
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring unrecognised {MCP_SERVERS_KEY} entry '{name}': {e}"
                            );
                            unreadable_servers.push(name);
                        },
                    }
                }
                Some(servers)
            },
            Some(other) => {
                tracing::warn!("Ignoring {MCP_SERVERS_KEY} value that is not an object: {other}");
                None
            },
            None => None,
        };

        Self { other: object, mcp_servers, servers_position, unreadable_servers }
    }

    /// Replace the server map, forgetting any entries that could not be read.
    pub fn set_servers(&mut self, servers: ServerMap) {
        self.mcp_servers = Some(servers);
        self.unreadable_servers.clear();
    }

    /// Names of the server entries currently present.
    pub fn server_names(&self) -> Vec<&str> {
        self.mcp_servers
            .as_ref()
            .map(|servers| servers.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every server name the file held when it was read, including entries
    /// that could not be parsed.
    pub fn previous_server_names(&self) -> Vec<&str> {
        let mut names = self.server_names();
        names.extend(self.unreadable_servers.iter().map(String::as_str));
        names
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(object: Map<String, Value>) -> Self {
        Self::from_object(object)
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.other.len() + usize::from(self.mcp_servers.is_some());
        let position = self.servers_position.map_or(self.other.len(), |p| p.min(self.other.len()));

        let mut map = serializer.serialize_map(Some(len))?;
        for (index, (key, value)) in self.other.iter().enumerate() {
            if index == position {
                if let Some(servers) = &self.mcp_servers {
                    map.serialize_entry(MCP_SERVERS_KEY, servers)?;
                }
            }
            map.serialize_entry(key, value)?;
        }
        if position == self.other.len() {
            if let Some(servers) = &self.mcp_servers {
                map.serialize_entry(MCP_SERVERS_KEY, servers)?;
            }
        }
        map.end()
    }
}
