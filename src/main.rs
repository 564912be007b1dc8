//! dep-updater - Interactive npm dependency upgrade selector
//!
//! Scans a package or workspace, shows the available upgrades per location,
//! rewrites the chosen manifest entries and runs a single install.

use anyhow::Context;
use clap::Parser;
use dep_updater::cli::CliArgs;
use dep_updater::controller::StrategyController;
use dep_updater::logging;
use dep_updater::manifest::{resolve_registry, ManifestRewriter, RewritePlan};
use dep_updater::orchestrator::{Discovery, DiscoveryConfig, DEFAULT_DISCOVERY_TIMEOUT};
use dep_updater::output::{JsonFormatter, TextFormatter, Verbosity};
use dep_updater::package_manager::{PackageManager, SystemPackageManager};
use dep_updater::registry::{HttpClient, NpmAdapter};
use dep_updater::tui;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose, args.quiet);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;

    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", args.path.display()))?;
    let registry = resolve_registry(args.registry.as_deref(), &root);
    debug!(root = %root.display(), %registry, dry_run = args.dry_run, "Starting");

    // Discovery
    let client = HttpClient::new()?;
    let adapter = Arc::new(NpmAdapter::with_registry(client, registry));
    let config = DiscoveryConfig {
        concurrency: args.concurrency,
        timeout: args.timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT),
        show_progress: args.show_progress(),
        ..DiscoveryConfig::default()
    };
    let discovered = Discovery::new(adapter, config).discover(&root).await;

    if args.json {
        let mut stdout = io::stdout().lock();
        JsonFormatter::new(true).format_catalog(&discovered.catalog, &root, &mut stdout)?;
        stdout.flush()?;
        return Ok(ExitCode::SUCCESS);
    }

    let verbosity = Verbosity::from_flags(args.verbose, args.quiet);
    let text = TextFormatter::new(verbosity, args.dry_run);
    text.format_discovery(&discovered, &mut io::stderr().lock())?;

    if discovered.catalog.is_empty() {
        if verbosity != Verbosity::Quiet {
            println!("No upgrades available");
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Interactive selection
    let controller = StrategyController::new(discovered.catalog);
    let tui_root = root.clone();
    let Some(controller) =
        tokio::task::spawn_blocking(move || tui::run(controller, &tui_root)).await??
    else {
        return Ok(ExitCode::SUCCESS);
    };

    // Rewrite and install
    let plan = RewritePlan::from_selected(&controller.selected_snapshot());
    {
        let mut stdout = io::stdout().lock();
        text.format_plan(&plan, &root, &mut stdout)?;
        stdout.flush()?;
    }

    let package_manager = args
        .should_install()
        .then(|| args.package_manager.unwrap_or_else(|| PackageManager::detect(&root)));
    let rewriter = ManifestRewriter::new(args.dry_run);
    let committed = rewriter.commit(&plan, &SystemPackageManager::new(), package_manager, &root);

    let mut stdout = io::stdout().lock();
    text.format_commit(&committed, &root, &mut stdout)?;
    stdout.flush()?;

    if committed.install_failed() {
        Ok(ExitCode::FAILURE)
    } else if committed.has_write_errors() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
