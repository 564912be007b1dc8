//! Upgrade tiers and the fixed order they cycle through

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for picking which upstream version a dependency moves to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTier {
    /// First patch bump above the current version (`~x.y.z`)
    #[default]
    Patch,
    /// First minor bump above the current version (`^x.y.z`)
    Minor,
    /// Greatest stable release
    Latest,
    /// Earliest prerelease newer than the current version
    Prerelease,
}

/// Direction for cycling tiers and switching groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl TargetTier {
    /// The cycle order used when stepping through tiers
    pub const CYCLE: [TargetTier; 4] = [
        TargetTier::Patch,
        TargetTier::Minor,
        TargetTier::Latest,
        TargetTier::Prerelease,
    ];

    fn position(self) -> usize {
        match self {
            TargetTier::Patch => 0,
            TargetTier::Minor => 1,
            TargetTier::Latest => 2,
            TargetTier::Prerelease => 3,
        }
    }

    /// The neighbouring tier in the cycle, wrapping at both ends
    pub fn cycle(self, direction: Direction) -> Self {
        let len = Self::CYCLE.len();
        let idx = match direction {
            Direction::Next => (self.position() + 1) % len,
            Direction::Prev => (self.position() + len - 1) % len,
        };
        Self::CYCLE[idx]
    }

    /// Lowercase label used in output
    pub fn label(self) -> &'static str {
        match self {
            TargetTier::Patch => "patch",
            TargetTier::Minor => "minor",
            TargetTier::Latest => "latest",
            TargetTier::Prerelease => "prerelease",
        }
    }
}

impl fmt::Display for TargetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_patch() {
        assert_eq!(TargetTier::default(), TargetTier::Patch);
    }

    #[test]
    fn test_cycle_next_wraps() {
        assert_eq!(TargetTier::Patch.cycle(Direction::Next), TargetTier::Minor);
        assert_eq!(TargetTier::Minor.cycle(Direction::Next), TargetTier::Latest);
        assert_eq!(TargetTier::Latest.cycle(Direction::Next), TargetTier::Prerelease);
        assert_eq!(TargetTier::Prerelease.cycle(Direction::Next), TargetTier::Patch);
    }

    #[test]
    fn test_cycle_prev_wraps() {
        assert_eq!(TargetTier::Patch.cycle(Direction::Prev), TargetTier::Prerelease);
        assert_eq!(TargetTier::Minor.cycle(Direction::Prev), TargetTier::Patch);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut tier = TargetTier::Minor;
        for _ in 0..TargetTier::CYCLE.len() {
            tier = tier.cycle(Direction::Next);
        }
        assert_eq!(tier, TargetTier::Minor);
    }

    #[test]
    fn test_serde_tier() {
        let json = serde_json::to_string(&TargetTier::Prerelease).unwrap();
        assert_eq!(json, "\"prerelease\"");
        let parsed: TargetTier = serde_json::from_str("\"latest\"").unwrap();
        assert_eq!(parsed, TargetTier::Latest);
    }

    #[test]
    fn test_display() {
        assert_eq!(TargetTier::Latest.to_string(), "latest");
    }
}
