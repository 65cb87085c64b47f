#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use mcp_setup::{
    app_config::AppConfig,
    catalog::{ServerCatalog, ServerGroup},
    cli::Cli,
    install::{InstallOptions, InstallReport, Installer},
    paths::{self, PlatformDirs},
    prerequisites,
    secrets::{NoSecrets, SecretProvider},
    target::{OperatingSystem, Target, TargetKind},
    SetupError,
};
use tracing::{debug, error, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    let catalog = ServerCatalog::standard();
    let os = OperatingSystem::current();
    let dirs = PlatformDirs::from_env();

    // Listing and help never read config.toml
    if cli.list {
        print_catalog_and_paths(&catalog, os, &dirs);
        return Ok(());
    }

    let targets = cli.targets();
    if targets.is_empty() {
        Cli::command().print_help().context("failed to print help")?;
        println!();
        return Ok(());
    }

    let app_config = load_and_log_config()?.unwrap_or_default();

    println!("MCP Server Installation");
    println!("=======================");
    println!();

    if let Err(e) = check_prerequisites(&catalog) {
        error!("{e}");
        println!("Please install missing dependencies:");
        for hint in prerequisites::install_hints(&catalog) {
            println!("  - {hint}");
        }
        std::process::exit(1);
    }

    let secrets = build_secret_provider(&cli, &app_config, &targets);
    let workspace =
        cli.workspace.clone().or_else(|| app_config.default_workspace().map(String::from));
    let options = InstallOptions {
        workspace,
        default_path: app_config.documents_path().map(String::from),
        dry_run: cli.dry_run,
    };
    debug!("Install options: {:?}", options);

    let installer = Installer::new(&catalog, os, dirs, options, secrets.as_ref());
    let report = installer.install(&targets);

    print_summary(&report, cli.dry_run);

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize tracing with the specified debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

/// Load application configuration and log its status
fn load_and_log_config() -> Result<Option<AppConfig>> {
    let app_config = AppConfig::load().context("Failed to load app configuration")?;

    if let Some(ref config) = app_config {
        debug!("Loaded app configuration from: {}", AppConfig::config_path()?.display());

        if let Some(ref secret_manager) = config.secret_manager {
            debug!("Secret manager configured: {:?}", secret_manager.manager_type);
        }
    } else {
        debug!("No app configuration file found at: {}", AppConfig::config_path()?.display());
    }

    Ok(app_config)
}

fn check_prerequisites(catalog: &ServerCatalog) -> Result<(), SetupError> {
    println!("Checking prerequisites...");
    prerequisites::check_prerequisites(catalog, prerequisites::command_exists)?;
    println!("All prerequisites are installed");
    println!();
    Ok(())
}

/// Secrets are only needed by desktop targets, so the password manager is
/// not probed unless one was selected.
fn build_secret_provider(
    cli: &Cli,
    app_config: &AppConfig,
    targets: &[Target],
) -> Box<dyn SecretProvider> {
    let wants_secrets = targets.iter().any(|t| t.kind() == TargetKind::Desktop);

    if cli.no_secrets || !wants_secrets {
        debug!("Secret lookup skipped");
        Box::new(NoSecrets)
    } else {
        Box::new(app_config.secret_chain())
    }
}

fn print_catalog_and_paths(catalog: &ServerCatalog, os: OperatingSystem, dirs: &PlatformDirs) {
    println!("MCP servers:");
    for group in [ServerGroup::Node, ServerGroup::Python] {
        for (name, entry) in catalog.group(group) {
            println!("  {:<20} {} {}", name, entry.command, entry.args.join(" "));
        }
    }
    for server in catalog.secret_backed() {
        println!(
            "  {:<20} {} {} (Claude Desktop, needs {})",
            server.name,
            server.template.command,
            server.template.args.join(" "),
            server.secret_name
        );
    }

    println!();
    println!("Configuration files ({os}):");
    for target in Target::ALL {
        let location = paths::config_file_path(target, os, dirs)
            .map_or_else(|| "(unsupported)".to_string(), |path| path.display().to_string());
        println!("  {:<16} {}", target.display_name(), location);
    }
}

fn print_summary(report: &InstallReport, dry_run: bool) {
    println!();
    if dry_run {
        println!("Dry run complete. No files were changed.");
        return;
    }

    if report.has_failures() {
        println!(
            "Installation finished with errors ({} of {} targets configured)",
            report.configured(),
            report.outcomes.len()
        );
    } else {
        println!("Installation complete!");
    }

    println!();
    println!("Next steps:");
    println!("  1. Restart your IDE(s) for changes to take effect");
    println!("  2. Review the generated configuration files");
    println!("  3. Add any required API keys if not using Bitwarden");
    println!("  4. Test MCP servers by asking your AI assistant to use them");
}
