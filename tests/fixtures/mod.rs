#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Isolated home, config home and `PATH` for running the binary.
pub struct TestFixture {
    /// Temporary directory that will be cleaned up on drop
    pub temp: TempDir,
    /// Stands in for `$HOME`
    pub home: PathBuf,
    /// `XDG_CONFIG_HOME` for the app's own config.toml
    pub config_home: PathBuf,
    /// The only directory on `PATH`
    pub bin: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directories
    pub fn new() -> std::io::Result<Self> {
        let temp = tempdir()?;
        let home = temp.path().join("home");
        let config_home = temp.path().join("xdg");
        let bin = temp.path().join("bin");

        fs::create_dir_all(&home)?;
        fs::create_dir_all(&config_home)?;
        fs::create_dir_all(&bin)?;

        Ok(Self { temp, home, config_home, bin })
    }

    /// Put an executable shell script named `name` on `PATH`.
    #[cfg(unix)]
    pub fn with_script(&self, name: &str, body: &str) -> std::io::Result<&Self> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(self)
    }

    /// Install stand-ins for the runtimes the servers are launched with.
    #[cfg(unix)]
    pub fn with_runtimes(&self) -> std::io::Result<&Self> {
        self.with_script("npx", "exit 0")?;
        self.with_script("uvx", "exit 0")?;
        Ok(self)
    }

    /// Install a fake unlocked `bw` whose first search hit has `password`.
    #[cfg(unix)]
    pub fn with_bitwarden(&self, password: &str) -> std::io::Result<&Self> {
        let body = format!(
            r#"case "$1" in
  status) echo '{{"status":"unlocked"}}' ;;
  list) echo '[{{"id":"item-1"}},{{"id":"item-2"}}]' ;;
  get) if [ "$3" = "item-1" ]; then echo "{password}"; else exit 1; fi ;;
  *) exit 1 ;;
esac"#
        );
        self.with_script("bw", &body)
    }

    /// Write the app's `config.toml`.
    pub fn with_app_config(&self, content: &str) -> std::io::Result<&Self> {
        let dir = self.config_home.join("mcp-setup");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("config.toml"), content)?;
        Ok(self)
    }

    /// Settings file of a VS Code-like editor on Linux, e.g. `Code`.
    pub fn editor_settings(&self, app: &str) -> PathBuf {
        self.home.join(".config").join(app).join("User").join("settings.json")
    }

    /// Claude Desktop config file on Linux.
    pub fn claude_config(&self) -> PathBuf {
        self.home.join(".config").join("Claude").join("claude_desktop_config.json")
    }

    /// Write `content` to `path`, creating parents.
    pub fn write_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    /// The binary with its environment pointed at this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_mcp-setup"));
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("PATH", &self.bin)
            .env_remove("APPDATA")
            .env_remove("RUST_LOG")
            .env_remove("MCP_SETUP_WORKSPACE")
            .env_remove("GITHUB_PERSONAL_ACCESS_TOKEN");
        cmd
    }
}

/// Files in `dir` whose name contains `.backup.`.
pub fn backups_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.contains(".backup."))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a JSON file.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}
