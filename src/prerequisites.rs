use crate::catalog::ServerCatalog;
use crate::SetupError;
use tracing::debug;

/// Whether `program` resolves to an executable on `PATH`.
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Runtimes the catalog needs that `exists` cannot find.
pub fn missing_prerequisites<F>(catalog: &ServerCatalog, exists: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    catalog
        .active_groups()
        .into_iter()
        .filter(|group| {
            let found = group.launchers().iter().any(|launcher| exists(launcher));
            debug!("{:?} runtime available: {}", group, found);
            !found
        })
        .map(|group| group.requirement().to_string())
        .collect()
}

/// Fail unless every runtime the catalog launches servers with is installed.
///
/// # Errors
///
/// Returns [`SetupError::MissingPrerequisites`] naming each missing runtime.
pub fn check_prerequisites<F>(catalog: &ServerCatalog, exists: F) -> Result<(), SetupError>
where
    F: Fn(&str) -> bool,
{
    let missing = missing_prerequisites(catalog, exists);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SetupError::MissingPrerequisites(missing))
    }
}

/// Install instructions for every runtime the catalog uses.
pub fn install_hints(catalog: &ServerCatalog) -> Vec<&'static str> {
    catalog.active_groups().into_iter().map(|group| group.install_hint()).collect()
}
