use serde::{Deserialize, Serialize};
use std::fmt;

/// An application whose settings file this tool writes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    #[value(name = "vscode")]
    #[serde(rename = "vscode")]
    VsCode,
    Cursor,
    Windsurf,
    /// Claude Desktop
    Claude,
}

/// How a target treats the workspace concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// VS Code-like editors that expand `${workspaceFolder}` themselves.
    Editor,
    /// Desktop apps with no workspace, so paths must be concrete.
    Desktop,
}

impl Target {
    /// Every supported target, in the order `--all` configures them.
    pub const ALL: [Self; 4] = [Self::VsCode, Self::Cursor, Self::Windsurf, Self::Claude];

    pub const fn kind(self) -> TargetKind {
        match self {
            Self::VsCode | Self::Cursor | Self::Windsurf => TargetKind::Editor,
            Self::Claude => TargetKind::Desktop,
        }
    }

    /// Name of the settings file inside the target's config directory.
    pub const fn file_name(self) -> &'static str {
        match self.kind() {
            TargetKind::Editor => "settings.json",
            TargetKind::Desktop => "claude_desktop_config.json",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::VsCode => "VS Code",
            Self::Cursor => "Cursor",
            Self::Windsurf => "Windsurf",
            Self::Claude => "Claude Desktop",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    MacOs,
    Linux,
    Windows,
    Unknown,
}

impl OperatingSystem {
    /// Detect the operating system this binary was built for.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a variant.
    pub fn from_name(name: &str) -> Self {
        match name {
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Remove repeated targets while keeping first-seen order.
pub fn dedup_targets(targets: &[Target]) -> Vec<Target> {
    let mut seen = Vec::with_capacity(targets.len());
    for target in targets {
        if !seen.contains(target) {
            seen.push(*target);
        }
    }
    seen
}
