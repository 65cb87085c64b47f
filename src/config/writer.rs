use super::ConfigDocument;
use anyhow::Context;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialize a document the way it is written to disk: two-space indented
/// JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn render_config_document(document: &ConfigDocument) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    Ok(json)
}

/// Write a configuration document, replacing the file atomically.
///
/// A symlinked path is resolved first so the file it points to is updated
/// and the link itself survives. An existing file's permissions are carried
/// over to the replacement.
///
/// # Errors
///
/// Returns an error if:
/// - Unable to create parent directories
/// - Unable to serialize the document
/// - Unable to write or persist the temporary file
pub fn write_config_document<P: AsRef<Path>>(
    path: P,
    document: &ConfigDocument,
) -> anyhow::Result<()> {
    let target = resolve_write_target(path.as_ref());
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let json = render_config_document(document)?;
    let permissions = fs::metadata(&target).ok().map(|metadata| metadata.permissions());

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    temp.write_all(json.as_bytes())?;
    temp.flush()?;
    if let Some(permissions) = permissions {
        temp.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("Failed to copy permissions of {}", target.display()))?;
    }
    temp.persist(&target).with_context(|| format!("Failed to write {}", target.display()))?;

    Ok(())
}

/// The file a write to `path` should land in: the end of a symlink chain,
/// or `path` itself.
fn resolve_write_target(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    // Dangling link: write where it points
    match fs::read_link(path) {
        Ok(link) => path.parent().map_or_else(|| link.clone(), |parent| parent.join(&link)),
        Err(_) => path.to_path_buf(),
    }
}

/// Backup path for `path` at `timestamp`: `settings.json` becomes
/// `settings.backup.<timestamp>.json`.
pub fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("config");
    let extension = path.extension().and_then(|e| e.to_str()).map(|e| format!(".{e}"));

    path.with_file_name(format!("{stem}.backup.{timestamp}{}", extension.unwrap_or_default()))
}

/// Create a backup of a file with timestamp
///
/// The original is copied next to itself. An existing backup is never
/// overwritten: a counter is added to the timestamp when the name is taken.
///
/// # Errors
///
/// Returns an error if unable to copy the file
pub fn backup_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<PathBuf>> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut backup_path = backup_path_for(path_ref, &timestamp);
    let mut counter = 1u32;
    while backup_path.exists() {
        backup_path = backup_path_for(path_ref, &format!("{timestamp}_{counter}"));
        counter = counter.saturating_add(1);
    }

    fs::copy(path_ref, &backup_path).with_context(|| {
        format!("Failed to back up {} to {}", path_ref.display(), backup_path.display())
    })?;

    Ok(Some(backup_path))
}
