//! Package manager integration for installing dependencies after a rewrite
//!
//! This module provides:
//! - Detection of the project's package manager from lockfiles
//! - Execution of a single install command with inherited stdio

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::{debug, info};

/// Supported Node package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Executable name
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Full install command line
    pub fn install_command(self) -> Vec<&'static str> {
        vec![self.program(), "install"]
    }

    /// Detect the package manager for a project root
    ///
    /// Lockfiles decide first. Without one, a pnpm-workspace.yaml implies
    /// pnpm, and npm is the fallback.
    pub fn detect(root: &Path) -> Self {
        // Check for lockfiles in order of preference
        let lockfiles = [
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("yarn.lock", PackageManager::Yarn),
            ("bun.lockb", PackageManager::Bun),
            ("bun.lock", PackageManager::Bun),
            ("package-lock.json", PackageManager::Npm),
        ];
        if let Some((file, pm)) = lockfiles.iter().find(|(file, _)| root.join(file).exists()) {
            debug!(lockfile = file, package_manager = %pm, "Detected package manager");
            return *pm;
        }
        if root.join("pnpm-workspace.yaml").exists() {
            return PackageManager::Pnpm;
        }
        PackageManager::Npm
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Result of a package manager installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// The package manager used
    pub package_manager: PackageManager,
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Failure detail, empty on success
    pub message: String,
}

impl InstallResult {
    /// Create a successful install result
    pub fn success(package_manager: PackageManager, command: String) -> Self {
        Self {
            package_manager,
            command,
            success: true,
            message: String::new(),
        }
    }

    /// Create a failed install result
    pub fn failure(package_manager: PackageManager, command: String, message: String) -> Self {
        Self {
            package_manager,
            command,
            success: false,
            message,
        }
    }
}

/// Trait for running package manager install commands
pub trait PackageManagerRunner {
    /// Run the install command in the specified directory
    fn run_install(&self, package_manager: PackageManager, working_dir: &Path) -> InstallResult;
}

/// Default package manager runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemPackageManager;

impl SystemPackageManager {
    /// Create a new system package manager
    pub fn new() -> Self {
        Self
    }

    /// Run a command with the terminal attached
    fn run_command(&self, command: &[&str], working_dir: &Path) -> std::io::Result<ExitStatus> {
        let Some((program, args)) = command.split_first() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Empty command",
            ));
        };

        Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .status()
    }
}

impl PackageManagerRunner for SystemPackageManager {
    fn run_install(&self, package_manager: PackageManager, working_dir: &Path) -> InstallResult {
        let command_parts = package_manager.install_command();
        let command_str = command_parts.join(" ");
        info!(command = %command_str, dir = %working_dir.display(), "Running install");

        match self.run_command(&command_parts, working_dir) {
            Ok(status) if status.success() => InstallResult::success(package_manager, command_str),
            Ok(status) => InstallResult::failure(
                package_manager,
                command_str,
                format!("exited with {}", status),
            ),
            Err(e) => InstallResult::failure(
                package_manager,
                command_str,
                format!("Failed to execute command: {}", e),
            ),
        }
    }
}
