//! Manifest rewriting
//!
//! This module provides:
//! - Planning: turning the selected records into per-manifest changes
//! - Applying a plan to package.json files, one manifest at a time
//! - Dry-run mode support (no actual file modifications)
//! - A single install once every manifest has been processed

use super::package_json;
use crate::domain::{ChangeEntry, DependencyRecord, PendingChange, SkipReason, SkippedChange};
use crate::error::ManifestError;
use crate::package_manager::{InstallResult, PackageManager, PackageManagerRunner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Changes to make, grouped by manifest, plus what was left out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePlan {
    pub changes: Vec<PendingChange>,
    pub skipped: Vec<SkippedChange>,
}

impl RewritePlan {
    /// Build a plan from a snapshot of selected records
    ///
    /// Records with neither a display version nor a fallback version to
    /// install are skipped as `NoTarget`; records whose declared range
    /// already resolves to the install version are skipped as
    /// `AlreadyAtVersion`. Manifests keep first-seen order.
    pub fn from_selected(selected: &[DependencyRecord]) -> Self {
        let mut plan = RewritePlan::default();

        for record in selected {
            let Some(install) = record.install_version() else {
                warn!(package = %record.name, dir = %record.manifest_dir.display(), "No version to install");
                plan.skip(record, SkipReason::NoTarget);
                continue;
            };
            if install.fell_back {
                debug!(
                    package = %record.name,
                    tier = %record.target_tier,
                    version = %install.version,
                    "Chosen tier has no candidate, using fallback"
                );
            }
            let display_version = record
                .target_display()
                .unwrap_or_else(|| install.version.to_string());

            if record.current_version().as_ref() == Some(&install.version) {
                info!(package = %record.name, version = %install.version, "Already at version");
                plan.skip(record, SkipReason::AlreadyAtVersion(install.version.to_string()));
                continue;
            }

            let entry = ChangeEntry {
                name: record.name.clone(),
                current_range: record.current_range.clone(),
                new_version: install.version.to_string(),
                display_version,
            };
            plan.change_for(&record.manifest_path, &record.manifest_dir)
                .entries
                .push(entry);
        }

        plan
    }

    fn skip(&mut self, record: &DependencyRecord, reason: SkipReason) {
        self.skipped.push(SkippedChange {
            name: record.name.clone(),
            manifest_dir: record.manifest_dir.clone(),
            reason,
        });
    }

    fn change_for(&mut self, manifest_path: &Path, manifest_dir: &Path) -> &mut PendingChange {
        let idx = match self
            .changes
            .iter()
            .position(|c| c.manifest_path == manifest_path)
        {
            Some(idx) => idx,
            None => {
                self.changes
                    .push(PendingChange::new(manifest_path, manifest_dir));
                self.changes.len() - 1
            }
        };
        &mut self.changes[idx]
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of dependency entries across all manifests
    pub fn entry_count(&self) -> usize {
        self.changes.iter().map(|c| c.entries.len()).sum()
    }
}

/// Result of applying changes to one manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Names that were rewritten
    pub updated: Vec<String>,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Error that stopped this manifest, if any
    pub error: Option<ManifestError>,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            updated: Vec::new(),
            file_modified: false,
            error: None,
        }
    }

    /// Returns true if any entries were rewritten
    pub fn has_updates(&self) -> bool {
        !self.updated.is_empty()
    }

    /// Returns true if this manifest failed
    pub fn has_errors(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of a commit
#[derive(Debug)]
pub struct CommitOutcome {
    pub writes: Vec<WriteResult>,
    /// The single install run, if one was performed
    pub install: Option<InstallResult>,
}

impl CommitOutcome {
    pub fn has_write_errors(&self) -> bool {
        self.writes.iter().any(WriteResult::has_errors)
    }

    pub fn install_failed(&self) -> bool {
        self.install.as_ref().is_some_and(|r| !r.success)
    }
}

/// Applies rewrite plans to package.json files
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestRewriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

impl ManifestRewriter {
    /// Create a new ManifestRewriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestRewriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Apply one manifest's changes
    pub fn apply_change(&self, change: &PendingChange) -> WriteResult {
        let mut result = WriteResult::new(&change.manifest_path);
        match self.rewrite(change) {
            Ok((updated, written)) => {
                result.updated = updated;
                result.file_modified = written;
            }
            Err(e) => {
                warn!(path = %change.manifest_path.display(), error = %e, "Failed to update manifest");
                result.error = Some(e);
            }
        }
        result
    }

    fn rewrite(&self, change: &PendingChange) -> Result<(Vec<String>, bool), ManifestError> {
        let path = &change.manifest_path;
        let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
        let mut json = package_json::parse_document(&content, path)?;

        let updated = package_json::apply_changes(&mut json, &change.entries);
        for name in &updated {
            info!(package = %name, path = %path.display(), "Updated");
        }

        if updated.is_empty() || self.dry_run {
            return Ok((updated, false));
        }

        let output = package_json::to_manifest_string(&json, path)?;
        fs::write(path, output).map_err(|e| ManifestError::write_error(path, e))?;
        Ok((updated, true))
    }

    /// Apply every manifest in the plan; failures do not stop the others
    pub fn apply(&self, plan: &RewritePlan) -> Vec<WriteResult> {
        plan.changes
            .iter()
            .map(|change| self.apply_change(change))
            .collect()
    }

    /// Apply the plan, then run exactly one install for the project root
    ///
    /// No install happens for an empty plan, in dry-run mode, or when
    /// `package_manager` is `None`.
    pub fn commit<R: PackageManagerRunner>(
        &self,
        plan: &RewritePlan,
        runner: &R,
        package_manager: Option<PackageManager>,
        root: &Path,
    ) -> CommitOutcome {
        let writes = self.apply(plan);

        let install = match package_manager {
            Some(pm) if !plan.is_empty() && !self.dry_run => Some(runner.run_install(pm, root)),
            _ => None,
        };

        CommitOutcome { writes, install }
    }
}
