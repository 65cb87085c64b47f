use crate::catalog::ServerCatalog;
use crate::config::reader::{self, ExistingDocument};
use crate::config::{writer, ConfigDocument};
use crate::merge::{merge_config, replaced_servers, MergeOptions};
use crate::paths::{self, PlatformDirs};
use crate::secrets::SecretProvider;
use crate::target::{dedup_targets, OperatingSystem, Target};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// User choices shared by every target in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub workspace: Option<String>,
    /// Claude Desktop filesystem root when no workspace is given.
    pub default_path: Option<String>,
    /// Print merged documents instead of writing them.
    pub dry_run: bool,
}

/// What happened to one target.
#[derive(Debug)]
pub enum TargetOutcome {
    Configured { path: PathBuf, backup: Option<PathBuf> },
    DryRun { path: PathBuf, document: ConfigDocument },
    Skipped { reason: String },
    Failed { error: anyhow::Error },
}

impl TargetOutcome {
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcomes for every target, in the order they ran.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub outcomes: Vec<(Target, TargetOutcome)>,
}

impl InstallReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.is_failure())
    }

    pub fn configured(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, TargetOutcome::Configured { .. }))
            .count()
    }
}

/// Configures targets one after another.
pub struct Installer<'a> {
    catalog: &'a ServerCatalog,
    os: OperatingSystem,
    dirs: PlatformDirs,
    options: InstallOptions,
    secrets: &'a dyn SecretProvider,
}

impl<'a> Installer<'a> {
    pub fn new(
        catalog: &'a ServerCatalog,
        os: OperatingSystem,
        dirs: PlatformDirs,
        options: InstallOptions,
        secrets: &'a dyn SecretProvider,
    ) -> Self {
        Self { catalog, os, dirs, options, secrets }
    }

    /// Configure each target in turn. A target that cannot be configured is
    /// reported and does not stop the others.
    pub fn install(&self, targets: &[Target]) -> InstallReport {
        let mut report = InstallReport::default();

        for target in dedup_targets(targets) {
            println!("Configuring {target}...");
            let outcome = self.configure(target);
            match &outcome {
                TargetOutcome::Configured { path, backup } => {
                    if let Some(backup) = backup {
                        println!(
                            "  Backed up existing file to {}",
                            backup.file_name().map_or_else(
                                || backup.display().to_string(),
                                |name| name.to_string_lossy().into_owned()
                            )
                        );
                    }
                    println!("  Configured {target} with MCP servers: {}", path.display());
                },
                TargetOutcome::DryRun { path, document } => {
                    println!("  Would write {}:", path.display());
                    match writer::render_config_document(document) {
                        Ok(json) => println!("{json}"),
                        Err(e) => warn!("Failed to render {}: {e}", path.display()),
                    }
                },
                TargetOutcome::Skipped { reason } => {
                    warn!("Skipping {target}: {reason}");
                },
                TargetOutcome::Failed { error } => {
                    error!("Failed to configure {target}: {error:#}");
                },
            }
            report.outcomes.push((target, outcome));
        }

        report
    }

    /// The default path only affects targets without a workspace concept.
    fn merge_options(&self) -> MergeOptions {
        let default_path = self.options.default_path.clone().or_else(|| {
            paths::default_documents_dir(&self.dirs).map(|dir| paths::path_arg(&dir))
        });

        MergeOptions { workspace_path: self.options.workspace.clone(), default_path }
    }

    fn configure(&self, target: Target) -> TargetOutcome {
        let Some(config_dir) = paths::resolve_config_dir(target, self.os, &self.dirs) else {
            return TargetOutcome::Skipped {
                reason: format!("could not determine config directory on {}", self.os),
            };
        };
        let path = config_dir.join(target.file_name());

        let result = if self.options.dry_run {
            self.preview(target, &path).map(|document| TargetOutcome::DryRun { path, document })
        } else {
            self.apply(target, &config_dir, &path)
                .map(|backup| TargetOutcome::Configured { path, backup })
        };

        result.unwrap_or_else(|error| TargetOutcome::Failed { error })
    }

    fn read_existing(path: &Path) -> Result<ExistingDocument> {
        let existing = reader::read_config_document(path)?;
        match &existing {
            ExistingDocument::Absent => info!("Creating new {}", path.display()),
            ExistingDocument::Malformed(reason) => {
                warn!("Existing {} is invalid ({reason}), creating new one", path.display());
            },
            ExistingDocument::Parsed(_) => debug!("Loaded {}", path.display()),
        }
        Ok(existing)
    }

    fn merged(&self, target: Target, existing: ExistingDocument) -> ConfigDocument {
        let previous = existing.into_document();
        let merged = merge_config(
            previous.clone(),
            self.catalog,
            target.kind(),
            &self.merge_options(),
            self.secrets,
        );

        if let Some(previous) = previous {
            let dropped = replaced_servers(&previous, &merged);
            if !dropped.is_empty() {
                warn!(
                    "{target}: replacing mcpServers removes existing entries: {}",
                    dropped.join(", ")
                );
            }
        }

        merged
    }

    fn preview(&self, target: Target, path: &Path) -> Result<ConfigDocument> {
        let existing = Self::read_existing(path)?;
        Ok(self.merged(target, existing))
    }

    fn apply(&self, target: Target, config_dir: &Path, path: &Path) -> Result<Option<PathBuf>> {
        if !config_dir.exists() {
            warn!("{target} config directory not found. Creating: {}", config_dir.display());
            fs::create_dir_all(config_dir)
                .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        }

        let existing = Self::read_existing(path)?;

        // The original is copied before anything is written, malformed or not
        let backup = if existing.exists() { writer::backup_file(path)? } else { None };
        if let Some(backup) = &backup {
            info!("Backed up {} to {}", path.display(), backup.display());
        }

        let merged = self.merged(target, existing);
        writer::write_config_document(path, &merged)?;

        Ok(backup)
    }
}
