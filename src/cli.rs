//! CLI argument parsing module for dep-updater

use crate::error::ConfigError;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use crate::package_manager::PackageManager;
use clap::builder::TypedValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string in format: Ns (seconds), Nm (minutes), Nh (hours)
fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let (num_str, unit) = if let Some(n) = trimmed.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = trimmed.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = trimmed.strip_suffix('h') {
        (n, 60 * 60)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    if num == 0 {
        return Err(invalid());
    }

    Ok(Duration::from_secs(num.saturating_mul(unit)))
}

/// Interactive npm dependency upgrade selector
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dep-updater",
    version,
    about = "Interactive npm dependency upgrade selector"
)]
pub struct CliArgs {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Dry run mode - show the change plan without writing manifests
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Print the discovered upgrades as JSON and exit without the interactive screen
    #[arg(long)]
    pub json: bool,

    // Registry options
    /// Registry URL (default: .npmrc `registry=`, then the public npm registry)
    #[arg(long)]
    pub registry: Option<String>,

    /// Deadline for dependency discovery (e.g., 90s, 2m, 1h)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Maximum concurrent registry requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub concurrency: usize,

    // Install options
    /// Package manager used for the install step (default: detected from lockfiles)
    #[arg(long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Skip the install step after rewriting manifests
    #[arg(long)]
    pub no_install: bool,
}

impl CliArgs {
    /// Check option combinations clap cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }

        if let Some(ref registry) = self.registry {
            if !(registry.starts_with("http://") || registry.starts_with("https://")) {
                return Err(ConfigError::InvalidRegistryUrl {
                    value: registry.clone(),
                });
            }
        }

        if !self.path.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: self.path.clone(),
                message: "not a directory".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the install step should run after a successful rewrite
    pub fn should_install(&self) -> bool {
        !self.no_install && !self.dry_run
    }

    /// Whether a progress bar may be drawn on stderr
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
