//! Per-location upgrade records
//!
//! A [`DependencyRecord`] is one dependency name as declared by one manifest,
//! together with the upgrade candidates found for it and the operator's
//! current choice.

use super::TargetTier;
use crate::parser;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Best upstream version for each tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCandidates {
    pub patch: Option<Version>,
    pub minor: Option<Version>,
    pub latest: Option<Version>,
    pub prerelease: Option<Version>,
}

impl TierCandidates {
    /// Returns true when no tier has a candidate
    pub fn is_empty(&self) -> bool {
        self.patch.is_none()
            && self.minor.is_none()
            && self.latest.is_none()
            && self.prerelease.is_none()
    }

    /// Candidate for a tier
    pub fn get(&self, tier: TargetTier) -> Option<&Version> {
        match tier {
            TargetTier::Patch => self.patch.as_ref(),
            TargetTier::Minor => self.minor.as_ref(),
            TargetTier::Latest => self.latest.as_ref(),
            TargetTier::Prerelease => self.prerelease.as_ref(),
        }
    }

    /// Stable latest only; a prerelease never counts as latest
    fn stable_latest(&self) -> Option<&Version> {
        self.latest.as_ref().filter(|v| v.pre.is_empty())
    }
}

/// Identity of a record within a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub name: String,
    pub manifest_dir: PathBuf,
}

impl RecordKey {
    pub fn new(name: impl Into<String>, manifest_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            manifest_dir: manifest_dir.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.manifest_dir.display())
    }
}

/// Version to install for a record, and whether the chosen tier had to be
/// substituted by another one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallVersion {
    pub version: Version,
    pub fell_back: bool,
}

/// One dependency name in one manifest location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Package name
    pub name: String,
    /// Range as declared in the manifest
    pub current_range: String,
    /// Upgrade candidates per tier
    pub candidates: TierCandidates,
    /// Directory of the declaring manifest
    pub manifest_dir: PathBuf,
    /// Path of the declaring manifest
    pub manifest_path: PathBuf,
    /// Whether the operator picked this record for the rewrite
    pub selected: bool,
    /// Tier the operator chose
    pub target_tier: TargetTier,
    /// Tier before the most recent change
    pub previous_tier: Option<TargetTier>,
}

impl DependencyRecord {
    /// Creates an unselected record targeting the patch tier
    pub fn new(
        name: impl Into<String>,
        current_range: impl Into<String>,
        candidates: TierCandidates,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        let manifest_path = manifest_path.into();
        let manifest_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            name: name.into(),
            current_range: current_range.into(),
            candidates,
            manifest_dir,
            manifest_path,
            selected: false,
            target_tier: TargetTier::default(),
            previous_tier: None,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.name.clone(), self.manifest_dir.clone())
    }

    pub fn matches(&self, key: &RecordKey) -> bool {
        self.name == key.name && self.manifest_dir == key.manifest_dir
    }

    /// Display string for a tier, if the tier has a usable candidate
    ///
    /// Patch is shown as `~x.y.z`, minor as `^x.y.z`, latest and prerelease
    /// verbatim. A prerelease never shows up as latest.
    pub fn tier_display(&self, tier: TargetTier) -> Option<String> {
        let c = &self.candidates;
        match tier {
            TargetTier::Patch => c.patch.as_ref().map(|v| format!("~{v}")),
            TargetTier::Minor => c.minor.as_ref().map(|v| format!("^{v}")),
            TargetTier::Latest => c.stable_latest().map(Version::to_string),
            TargetTier::Prerelease => c.prerelease.as_ref().map(Version::to_string),
        }
    }

    /// Display string for the chosen tier
    pub fn target_display(&self) -> Option<String> {
        self.tier_display(self.target_tier)
    }

    /// Display string shown to the operator, falling back to the declared range
    pub fn display_version(&self) -> String {
        self.target_display()
            .unwrap_or_else(|| self.current_range.clone())
    }

    /// Switches tier, remembering the outgoing one
    pub fn set_tier(&mut self, tier: TargetTier) {
        self.previous_tier = Some(self.target_tier);
        self.target_tier = tier;
    }

    /// Minimum version of the declared range
    pub fn current_version(&self) -> Option<Version> {
        parser::min_version(&self.current_range)
    }

    /// Version to write for the chosen tier
    ///
    /// When the chosen tier has no candidate the first available of
    /// patch, minor, stable latest and prerelease is used instead.
    pub fn install_version(&self) -> Option<InstallVersion> {
        let c = &self.candidates;
        let direct = match self.target_tier {
            TargetTier::Latest => c.stable_latest(),
            tier => c.get(tier),
        };
        if let Some(version) = direct {
            return Some(InstallVersion {
                version: version.clone(),
                fell_back: false,
            });
        }

        c.patch
            .as_ref()
            .or(c.minor.as_ref())
            .or(c.stable_latest())
            .or(c.prerelease.as_ref())
            .map(|version| InstallVersion {
                version: version.clone(),
                fell_back: true,
            })
    }

    /// Whether the declared range already resolves to what is displayed
    pub fn is_at_target(&self) -> bool {
        let current = self.current_version();
        let shown = parser::min_version(&self.display_version());
        match (current, shown) {
            (Some(current), Some(shown)) => current == shown,
            _ => false,
        }
    }

    /// Whether a tier above the chosen one offers something newer
    pub fn has_higher_tier_available(&self) -> bool {
        let c = &self.candidates;
        match self.target_tier {
            TargetTier::Latest | TargetTier::Prerelease => false,
            TargetTier::Patch => {
                let distinct_minor = match (&c.minor, &c.patch) {
                    (Some(minor), Some(patch)) => minor != patch,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                distinct_minor || newer_than(c.latest.as_ref(), c.patch.as_ref())
            }
            TargetTier::Minor => newer_than(c.latest.as_ref(), c.minor.as_ref()),
        }
    }
}

/// `latest` exists and either `base` is missing or `latest` is above it
fn newer_than(latest: Option<&Version>, base: Option<&Version>) -> bool {
    match (latest, base) {
        (Some(latest), Some(base)) => latest > base,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn left_pad() -> DependencyRecord {
        DependencyRecord::new(
            "left-pad",
            "^1.0.0",
            TierCandidates {
                patch: Some(v("1.0.1")),
                minor: Some(v("1.1.0")),
                latest: Some(v("2.0.0")),
                prerelease: Some(v("2.0.0-beta.1")),
            },
            "/repo/package.json",
        )
    }

    #[test]
    fn test_new_defaults() {
        let record = left_pad();
        assert_eq!(record.manifest_dir, PathBuf::from("/repo"));
        assert_eq!(record.target_tier, TargetTier::Patch);
        assert_eq!(record.previous_tier, None);
        assert!(!record.selected);
        assert_eq!(record.key(), RecordKey::new("left-pad", "/repo"));
    }

    #[test]
    fn test_display_rule() {
        let mut record = left_pad();
        assert_eq!(record.display_version(), "~1.0.1");
        record.set_tier(TargetTier::Minor);
        assert_eq!(record.display_version(), "^1.1.0");
        record.set_tier(TargetTier::Latest);
        assert_eq!(record.display_version(), "2.0.0");
        record.set_tier(TargetTier::Prerelease);
        assert_eq!(record.display_version(), "2.0.0-beta.1");
    }

    #[test]
    fn test_display_falls_back_to_range() {
        let mut record = left_pad();
        record.candidates.prerelease = None;
        record.set_tier(TargetTier::Prerelease);
        assert_eq!(record.target_display(), None);
        assert_eq!(record.display_version(), "^1.0.0");
    }

    #[test]
    fn test_prerelease_latest_is_not_displayed() {
        let mut record = left_pad();
        record.candidates.latest = Some(v("3.0.0-rc.1"));
        record.set_tier(TargetTier::Latest);
        assert_eq!(record.target_display(), None);
    }

    #[test]
    fn test_set_tier_records_previous() {
        let mut record = left_pad();
        record.set_tier(TargetTier::Latest);
        assert_eq!(record.previous_tier, Some(TargetTier::Patch));
        record.set_tier(TargetTier::Minor);
        assert_eq!(record.previous_tier, Some(TargetTier::Latest));
    }

    #[test]
    fn test_install_version_direct() {
        let mut record = left_pad();
        record.set_tier(TargetTier::Latest);
        let install = record.install_version().unwrap();
        assert_eq!(install.version, v("2.0.0"));
        assert!(!install.fell_back);
    }

    #[test]
    fn test_install_version_fallback_order() {
        let mut record = left_pad();
        record.candidates.prerelease = None;
        record.set_tier(TargetTier::Prerelease);
        let install = record.install_version().unwrap();
        assert_eq!(install.version, v("1.0.1"));
        assert!(install.fell_back);

        record.candidates = TierCandidates {
            prerelease: Some(v("2.0.0-beta.1")),
            ..Default::default()
        };
        record.set_tier(TargetTier::Patch);
        let install = record.install_version().unwrap();
        assert_eq!(install.version, v("2.0.0-beta.1"));
        assert!(install.fell_back);

        record.candidates = TierCandidates::default();
        assert!(record.install_version().is_none());
    }

    #[test]
    fn test_is_at_target() {
        let mut record = left_pad();
        assert!(!record.is_at_target());

        record.current_range = "~1.0.1".to_string();
        assert!(record.is_at_target());

        record.current_range = "workspace:*".to_string();
        assert!(!record.is_at_target());
    }

    #[test]
    fn test_has_higher_tier_available() {
        let mut record = left_pad();
        assert!(record.has_higher_tier_available());

        record.set_tier(TargetTier::Minor);
        assert!(record.has_higher_tier_available());

        record.set_tier(TargetTier::Latest);
        assert!(!record.has_higher_tier_available());

        record.set_tier(TargetTier::Prerelease);
        assert!(!record.has_higher_tier_available());
    }

    #[test]
    fn test_has_higher_tier_when_minor_equals_patch() {
        let mut record = DependencyRecord::new(
            "a",
            "^1.0.0",
            TierCandidates {
                patch: Some(v("1.0.1")),
                minor: Some(v("1.0.1")),
                latest: Some(v("1.0.1")),
                prerelease: None,
            },
            "/repo/package.json",
        );
        assert!(!record.has_higher_tier_available());

        record.set_tier(TargetTier::Minor);
        assert!(!record.has_higher_tier_available());
    }

    #[test]
    fn test_has_higher_tier_without_patch() {
        let record = DependencyRecord::new(
            "a",
            "^1.0.0",
            TierCandidates {
                latest: Some(v("2.0.0")),
                ..Default::default()
            },
            "/repo/package.json",
        );
        assert!(record.has_higher_tier_available());
    }
}
