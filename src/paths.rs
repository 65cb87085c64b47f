use crate::target::{OperatingSystem, Target};
use std::path::{Path, PathBuf};

/// Base directories the per-platform config locations are built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformDirs {
    pub home: Option<PathBuf>,
    /// `%APPDATA%` on Windows.
    pub app_data: Option<PathBuf>,
}

impl PlatformDirs {
    /// Read the base directories of the current user.
    pub fn from_env() -> Self {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let app_data = std::env::var_os("APPDATA")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self { home, app_data }
    }
}

/// Config directory of `target` on `os`, or `None` when the combination is
/// not supported or a required base directory is unknown.
pub fn resolve_config_dir(
    target: Target,
    os: OperatingSystem,
    dirs: &PlatformDirs,
) -> Option<PathBuf> {
    let app_dir: &[&str] = match target {
        Target::VsCode => &["Code", "User"],
        Target::Cursor => &["Cursor", "User"],
        Target::Windsurf => &["Windsurf", "User"],
        Target::Claude => &["Claude"],
    };

    let base = match os {
        OperatingSystem::MacOs => dirs.home.as_ref()?.join("Library").join("Application Support"),
        OperatingSystem::Linux => dirs.home.as_ref()?.join(".config"),
        OperatingSystem::Windows => dirs.app_data.clone()?,
        OperatingSystem::Unknown => return None,
    };

    Some(app_dir.iter().fold(base, |path, part| path.join(part)))
}

/// Full path of the settings file `target` reads on `os`.
pub fn config_file_path(
    target: Target,
    os: OperatingSystem,
    dirs: &PlatformDirs,
) -> Option<PathBuf> {
    resolve_config_dir(target, os, dirs).map(|dir| dir.join(target.file_name()))
}

/// Filesystem root given to Claude Desktop when no workspace is set.
pub fn default_documents_dir(dirs: &PlatformDirs) -> Option<PathBuf> {
    dirs.home.as_deref().map(|home| home.join("Documents"))
}

/// Render a path for use inside a JSON argument list.
pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
