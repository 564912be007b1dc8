//! Manifest change plan types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One dependency rewrite inside a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Package name
    pub name: String,
    /// Range as declared before the rewrite
    pub current_range: String,
    /// Bare version to write (the declared prefix is kept)
    pub new_version: String,
    /// What the operator saw when choosing
    pub display_version: String,
}

/// All rewrites for one manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub manifest_path: PathBuf,
    pub manifest_dir: PathBuf,
    pub entries: Vec<ChangeEntry>,
}

impl PendingChange {
    pub fn new(manifest_path: impl Into<PathBuf>, manifest_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            manifest_dir: manifest_dir.into(),
            entries: Vec::new(),
        }
    }
}

/// Why a selected record produced no change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No tier has a version to install
    NoTarget,
    /// The declared range already resolves to this version
    AlreadyAtVersion(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoTarget => write!(f, "no target version"),
            SkipReason::AlreadyAtVersion(version) => write!(f, "already at {}", version),
        }
    }
}

/// A selected record left out of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedChange {
    pub name: String,
    pub manifest_dir: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): skipped ({})",
            self.name,
            self.manifest_dir.display(),
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::NoTarget.to_string(), "no target version");
        assert_eq!(
            SkipReason::AlreadyAtVersion("1.2.3".to_string()).to_string(),
            "already at 1.2.3"
        );
    }

    #[test]
    fn test_skipped_change_display() {
        let skipped = SkippedChange {
            name: "lodash".to_string(),
            manifest_dir: PathBuf::from("/repo"),
            reason: SkipReason::NoTarget,
        };
        assert_eq!(
            skipped.to_string(),
            "lodash (/repo): skipped (no target version)"
        );
    }

    #[test]
    fn test_serde_skip_reason() {
        let reason = SkipReason::AlreadyAtVersion("2.0.0".to_string());
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(json, r#"{"already_at_version":"2.0.0"}"#);
        let parsed: SkipReason = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reason);
    }

    #[test]
    fn test_pending_change_new_is_empty() {
        let change = PendingChange::new("/repo/package.json", "/repo");
        assert!(change.entries.is_empty());
        assert_eq!(change.manifest_dir, PathBuf::from("/repo"));
    }
}
