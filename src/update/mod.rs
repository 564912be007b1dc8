//! Upgrade classification for dependencies
//!
//! This module provides:
//! - npm-style release-type diffs between versions
//! - The classifier that picks the best candidate per upgrade tier

mod diff;

pub use diff::{diff, VersionDiff};

use crate::domain::TierCandidates;
use crate::parser;
use semver::Version;

/// Outcome of classifying one declared range against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Minimum version of the declared range
    pub current: Version,
    pub candidates: TierCandidates,
}

/// Classify published versions into upgrade tiers relative to a declared range
///
/// Returns `None` when the range does not resolve to a version or when no
/// published version is newer than it.
pub fn classify<S: AsRef<str>>(current_range: &str, published: &[S]) -> Option<Classification> {
    let current = parser::min_version(current_range)?;

    let mut newer: Vec<Version> = published
        .iter()
        .filter_map(|raw| parser::parse_published(raw.as_ref()))
        .filter(|version| version.cmp_precedence(&current).is_gt())
        .collect();
    newer.sort_by(|a, b| a.cmp_precedence(b));
    newer.dedup_by(|a, b| a.cmp_precedence(b).is_eq());

    let (stable, pre): (Vec<Version>, Vec<Version>) =
        newer.into_iter().partition(|version| version.pre.is_empty());

    let mut patch: Option<Version> = None;
    let mut minor: Option<Version> = None;
    for version in &stable {
        let kind = diff(&current, version);
        if patch.is_none() && kind == Some(VersionDiff::Patch) {
            patch = Some(version.clone());
            continue;
        }
        if minor.is_none() && kind == Some(VersionDiff::Minor) {
            minor = Some(version.clone());
        }
    }

    let candidates = TierCandidates {
        minor: minor.or_else(|| patch.clone()),
        patch,
        latest: stable.last().cloned(),
        prerelease: pre.into_iter().next(),
    };

    if candidates.is_empty() {
        return None;
    }

    Some(Classification {
        current,
        candidates,
    })
}
