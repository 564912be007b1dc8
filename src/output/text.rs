//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The change plan printed before manifests are rewritten
//! - Release-type indication (major/minor/patch) per change
//! - Skipped selections with their reasons
//! - The commit summary: written manifests, failures and the install run

use crate::manifest::{CommitOutcome, RewritePlan};
use crate::orchestrator::DiscoveryOutcome;
use crate::output::{display_path, Verbosity};
use crate::parser;
use crate::update::{diff, VersionDiff};
use colored::Colorize;
use semver::Version;
use std::io::Write;
use std::path::Path;

/// Release type of a planned change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Moves between prereleases of one version
    Prerelease,
    /// Unknown or unparseable
    Unknown,
}

impl ChangeKind {
    /// Determine the change type between a declared range and a new version
    pub fn between(current_range: &str, new_version: &str) -> Self {
        let (Some(current), Ok(new)) = (
            parser::min_version(current_range),
            Version::parse(new_version),
        ) else {
            return ChangeKind::Unknown;
        };

        match diff(&current, &new) {
            Some(VersionDiff::Major | VersionDiff::PreMajor) => ChangeKind::Major,
            Some(VersionDiff::Minor | VersionDiff::PreMinor) => ChangeKind::Minor,
            Some(VersionDiff::Patch | VersionDiff::PrePatch) => ChangeKind::Patch,
            Some(VersionDiff::Prerelease) => ChangeKind::Prerelease,
            None => ChangeKind::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            ChangeKind::Major => "major".red().bold().to_string(),
            ChangeKind::Minor => "minor".yellow().to_string(),
            ChangeKind::Patch => "patch".green().to_string(),
            ChangeKind::Prerelease => "pre".magenta().to_string(),
            ChangeKind::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Major => "major",
            ChangeKind::Minor => "minor",
            ChangeKind::Patch => "patch",
            ChangeKind::Prerelease => "pre",
            ChangeKind::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if !self.dry_run {
            return String::new();
        }
        if self.color {
            format!("{} ", "(dry-run)".cyan())
        } else {
            "(dry-run) ".to_string()
        }
    }

    /// Print the planned changes grouped by manifest
    pub fn format_plan(
        &self,
        plan: &RewritePlan,
        root: &Path,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();

        if plan.is_empty() && plan.skipped.is_empty() {
            if self.color {
                writeln!(writer, "{}{}", prefix, "Nothing selected".dimmed())?;
            } else {
                writeln!(writer, "{}Nothing selected", prefix)?;
            }
            return Ok(());
        }

        if self.verbosity != Verbosity::Quiet {
            let max_name_len = plan
                .changes
                .iter()
                .flat_map(|c| c.entries.iter())
                .map(|e| e.name.len())
                .max()
                .unwrap_or(0)
                .max(20);

            for change in &plan.changes {
                let path = display_path(&change.manifest_path, root);
                let count = change.entries.len();
                let noun = if count == 1 { "change" } else { "changes" };
                if self.color {
                    writeln!(
                        writer,
                        "{}{} {} {}",
                        prefix,
                        path.bold(),
                        count.to_string().green(),
                        noun
                    )?;
                } else {
                    writeln!(writer, "{}{} {} {}", prefix, path, count, noun)?;
                }

                for entry in &change.entries {
                    let kind = ChangeKind::between(&entry.current_range, &entry.new_version);
                    if self.color {
                        writeln!(
                            writer,
                            "  {:width$} {} {} {} [{}]",
                            entry.name,
                            entry.current_range.dimmed(),
                            "→".dimmed(),
                            entry.new_version.bright_white().bold(),
                            kind.colored_label(),
                            width = max_name_len
                        )?;
                    } else {
                        writeln!(
                            writer,
                            "  {:width$} {} -> {} [{}]",
                            entry.name,
                            entry.current_range,
                            entry.new_version,
                            kind.label(),
                            width = max_name_len
                        )?;
                    }
                }
                writeln!(writer)?;
            }
        }

        if !plan.skipped.is_empty() && self.verbosity != Verbosity::Quiet {
            if self.color {
                writeln!(writer, "{}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "Skipped:")?;
            }
            for skipped in &plan.skipped {
                let line = format!(
                    "  {} ({}): {}",
                    skipped.name,
                    display_path(&skipped.manifest_dir, root),
                    skipped.reason
                );
                if self.color {
                    writeln!(writer, "{}", line.dimmed())?;
                } else {
                    writeln!(writer, "{}", line)?;
                }
            }
            writeln!(writer)?;
        }

        let entries = plan.entry_count();
        let manifests = plan.changes.len();
        if self.color {
            writeln!(
                writer,
                "{}{} dependency update(s) across {} manifest(s)",
                prefix,
                entries.to_string().green(),
                manifests
            )
        } else {
            writeln!(
                writer,
                "{}{} dependency update(s) across {} manifest(s)",
                prefix, entries, manifests
            )
        }
    }

    /// Print the outcome of a commit
    pub fn format_commit(
        &self,
        outcome: &CommitOutcome,
        root: &Path,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let modified = outcome.writes.iter().filter(|w| w.file_modified).count();
        let updated: usize = outcome.writes.iter().map(|w| w.updated.len()).sum();

        if self.verbosity == Verbosity::Verbose {
            for write in outcome.writes.iter().filter(|w| w.has_updates()) {
                writeln!(
                    writer,
                    "  {}: {}",
                    display_path(&write.path, root),
                    write.updated.join(", ")
                )?;
            }
        }

        let verb = if self.dry_run { "would update" } else { "updated" };
        if self.color {
            writeln!(
                writer,
                "{}{} {} dependency entr(ies) in {} manifest(s)",
                prefix,
                verb.bold(),
                updated.to_string().green(),
                if self.dry_run { outcome.writes.len() } else { modified }
            )?;
        } else {
            writeln!(
                writer,
                "{}{} {} dependency entr(ies) in {} manifest(s)",
                prefix,
                verb,
                updated,
                if self.dry_run { outcome.writes.len() } else { modified }
            )?;
        }

        for write in &outcome.writes {
            if let Some(ref error) = write.error {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
        }

        if let Some(ref install) = outcome.install {
            match (install.success, self.color) {
                (true, true) => writeln!(writer, "{} {}", "✓".green(), install.command)?,
                (true, false) => writeln!(writer, "ok: {}", install.command)?,
                (false, true) => writeln!(
                    writer,
                    "{} {} ({})",
                    "✗".red(),
                    install.command,
                    install.message
                )?,
                (false, false) => {
                    writeln!(writer, "failed: {} ({})", install.command, install.message)?
                }
            }
        }

        Ok(())
    }

    /// Print a one-line discovery summary with any problems
    pub fn format_discovery(
        &self,
        outcome: &DiscoveryOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        writeln!(
            writer,
            "Scanned {} manifest(s), {} upgradable dependenc(ies)",
            outcome.manifests_scanned,
            outcome.catalog.len()
        )?;

        if outcome.timed_out {
            let line = "Discovery timed out; showing partial results";
            if self.color {
                writeln!(writer, "{}", line.yellow())?;
            } else {
                writeln!(writer, "{}", line)?;
            }
        }

        if outcome.failed_lookups > 0 {
            writeln!(writer, "{} registry lookup(s) failed", outcome.failed_lookups)?;
        }

        if self.verbosity == Verbosity::Verbose {
            for issue in &outcome.errors {
                writeln!(writer, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}
