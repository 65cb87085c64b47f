use crate::secrets::{BitwardenProvider, EnvSecretProvider, NoSecrets, SecretChain};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_manager: Option<SecretManagerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct DefaultConfig {
    /// Workspace used when `--workspace` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Filesystem root for Claude Desktop, instead of `~/Documents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SecretManagerConfig {
    #[serde(rename = "type")]
    pub manager_type: SecretManagerType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SecretManagerType {
    Bitwarden,
    /// Environment variables named after the secret
    Env,
    /// Never look secrets up
    #[serde(rename = "none")]
    Disabled,
}

impl AppConfig {
    /// Load the application configuration from the default path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Unable to determine the config directory
    /// - Unable to read the config file (other than it not existing)
    /// - The config file contains invalid TOML
    pub fn load() -> Result<Option<Self>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config at {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Get the path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if unable to determine the config directory
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(config_home).join("mcp-setup").join("config.toml"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "mcp-setup") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            anyhow::bail!("Could not determine config directory")
        }
    }

    pub fn default_workspace(&self) -> Option<&str> {
        self.default.as_ref().and_then(|d| d.workspace.as_deref())
    }

    pub fn documents_path(&self) -> Option<&str> {
        self.default.as_ref().and_then(|d| d.documents_path.as_deref())
    }

    /// Build the secret lookup chain this configuration asks for.
    ///
    /// Without a `[secret-manager]` section the environment is tried first,
    /// then Bitwarden.
    pub fn secret_chain(&self) -> SecretChain {
        match self.secret_manager.map(|s| s.manager_type) {
            Some(SecretManagerType::Bitwarden) => {
                SecretChain::new().with(BitwardenProvider::detect())
            },
            Some(SecretManagerType::Env) => SecretChain::new().with(EnvSecretProvider),
            Some(SecretManagerType::Disabled) => SecretChain::new().with(NoSecrets),
            None => SecretChain::new().with(EnvSecretProvider).with(BitwardenProvider::detect()),
        }
    }
}
