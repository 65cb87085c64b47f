use crate::target::Target;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-setup",
    about = "Install and configure MCP servers for VS Code, Cursor, Windsurf and Claude Desktop",
    long_about = "mcp-setup writes MCP (Model Context Protocol) server definitions into the
settings files of your editors and of Claude Desktop.

Servers configured:
  • npx: memory, filesystem, everything, sequentialthinking
  • uvx: git, fetch, time
  • github (Claude Desktop only, when a token can be found)

Every existing settings file is backed up next to itself as
<name>.backup.<YYYYMMDD_HHMMSS>.json before it is rewritten. All keys other
than mcpServers are kept; mcpServers itself is replaced.",
    after_help = "Examples:
  mcp-setup --vscode                      Configure only VS Code
  mcp-setup --cursor --windsurf           Configure Cursor and Windsurf
  mcp-setup --all                         Configure all supported applications
  mcp-setup --all --workspace ~/projects  Configure with a specific workspace

Prerequisites:
  - Node.js (for npx)
  - uv/uvx (for Python servers)
  - Bitwarden CLI (optional, for API key management)

API key management:
  GITHUB_PERSONAL_ACCESS_TOKEN is read from the environment, or from Bitwarden
  when the bw CLI is installed, logged in and unlocked:
    bw login
    bw unlock
    export BW_SESSION=\"<session_key>\"",
    version,
    author
)]
pub struct Cli {
    /// Configure VS Code
    #[arg(long)]
    pub vscode: bool,

    /// Configure Cursor
    #[arg(long)]
    pub cursor: bool,

    /// Configure Windsurf
    #[arg(long)]
    pub windsurf: bool,

    /// Configure Claude Desktop
    #[arg(long)]
    pub claude: bool,

    /// Configure all supported applications
    #[arg(short, long)]
    pub all: bool,

    /// Default workspace folder path
    #[arg(short, long, value_name = "PATH", env = "MCP_SETUP_WORKSPACE", value_hint = clap::ValueHint::DirPath)]
    pub workspace: Option<String>,

    /// Print the resulting configuration instead of writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not look up API keys
    #[arg(long)]
    pub no_secrets: bool,

    /// List the servers and where each application's settings live
    #[arg(short, long)]
    pub list: bool,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long)]
    pub trace: bool,
}

impl Cli {
    /// Selected targets in configuration order.
    pub fn targets(&self) -> Vec<Target> {
        if self.all {
            return Target::ALL.to_vec();
        }

        [
            (self.vscode, Target::VsCode),
            (self.cursor, Target::Cursor),
            (self.windsurf, Target::Windsurf),
            (self.claude, Target::Claude),
        ]
        .into_iter()
        .filter_map(|(selected, target)| selected.then_some(target))
        .collect()
    }
}
