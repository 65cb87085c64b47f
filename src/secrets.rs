use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::Command;
use tracing::{debug, warn};

/// Looks up a named secret. Every failure collapses to `None`.
pub trait SecretProvider {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Provider used when secret lookup is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecrets;

impl SecretProvider for NoSecrets {
    fn lookup(&self, name: &str) -> Option<String> {
        debug!("Secret lookup disabled, skipping {}", name);
        None
    }
}

/// Reads secrets from environment variables with the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

impl SecretProvider for EnvSecretProvider {
    fn lookup(&self, name: &str) -> Option<String> {
        let value =
            std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if value.is_some() {
            debug!("Found {} in the environment", name);
        }
        value
    }
}

/// Tries each provider in order and returns the first secret found.
#[derive(Default)]
pub struct SecretChain {
    providers: Vec<Box<dyn SecretProvider>>,
}

impl SecretChain {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, provider: impl SecretProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl SecretProvider for SecretChain {
    fn lookup(&self, name: &str) -> Option<String> {
        self.providers.iter().find_map(|provider| provider.lookup(name))
    }
}

/// Output of one finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands. Lets tests replace the `bw` binary.
pub trait CommandRunner {
    /// Whether `program` can be found on `PATH`.
    fn exists(&self, program: &str) -> bool;

    /// Run `program` to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn exists(&self, program: &str) -> bool {
        crate::prerequisites::command_exists(program)
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute {program}"))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

const BW: &str = "bw";

#[derive(Debug, Deserialize)]
struct BitwardenStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct BitwardenItem {
    #[serde(default)]
    id: Option<String>,
}

/// State of the Bitwarden CLI, determined once when the provider is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitwardenState {
    Unlocked,
    Locked,
    NotInstalled,
    Unknown,
}

/// Looks secrets up in a Bitwarden vault through the `bw` CLI.
///
/// A lookup runs `bw list items --search <name>` and then
/// `bw get password <id>` for the first match.
pub struct BitwardenProvider<R: CommandRunner = SystemCommandRunner> {
    runner: R,
    state: BitwardenState,
}

impl BitwardenProvider<SystemCommandRunner> {
    /// Probe the installed `bw` CLI.
    pub fn detect() -> Self {
        Self::with_runner(SystemCommandRunner)
    }
}

impl<R: CommandRunner> BitwardenProvider<R> {
    pub fn with_runner(runner: R) -> Self {
        let state = Self::probe(&runner);
        Self { runner, state }
    }

    pub const fn state(&self) -> &BitwardenState {
        &self.state
    }

    pub fn is_available(&self) -> bool {
        self.state == BitwardenState::Unlocked
    }

    fn probe(runner: &R) -> BitwardenState {
        if !runner.exists(BW) {
            warn!("Bitwarden CLI (bw) not found. API keys will need to be configured manually.");
            return BitwardenState::NotInstalled;
        }

        let status = runner.run(BW, &["status"]).and_then(|output| {
            serde_json::from_str::<BitwardenStatus>(&output.stdout).map_err(Into::into)
        });

        match status {
            Ok(status) if status.status == "unlocked" => {
                debug!("Bitwarden CLI is available and unlocked");
                BitwardenState::Unlocked
            },
            Ok(status) => {
                warn!(
                    "Bitwarden vault is {}. Please unlock it with: bw unlock",
                    status.status
                );
                BitwardenState::Locked
            },
            Err(e) => {
                warn!("Could not determine Bitwarden status: {e}");
                BitwardenState::Unknown
            },
        }
    }

    fn fetch(&self, name: &str) -> Result<Option<String>> {
        let search = self.runner.run(BW, &["list", "items", "--search", name])?;
        if !search.success {
            anyhow::bail!("bw list failed: {}", search.stderr.trim());
        }

        let items: Vec<BitwardenItem> =
            serde_json::from_str(&search.stdout).context("Failed to parse bw list output")?;

        let Some(first) = items.into_iter().next() else {
            warn!("Secret '{}' not found in Bitwarden", name);
            return Ok(None);
        };
        let Some(id) = first.id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let password = self.runner.run(BW, &["get", "password", &id])?;
        if !password.success {
            anyhow::bail!("bw get password failed: {}", password.stderr.trim());
        }

        let secret = password.stdout.trim().to_string();
        Ok(Some(secret).filter(|s| !s.is_empty()))
    }
}

impl<R: CommandRunner> SecretProvider for BitwardenProvider<R> {
    fn lookup(&self, name: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }

        match self.fetch(name) {
            Ok(Some(secret)) => {
                debug!("Retrieved '{}' from Bitwarden", name);
                Some(secret)
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Could not retrieve secret '{}': {e:#}", name);
                None
            },
        }
    }
}
