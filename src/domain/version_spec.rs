//! Declared version ranges as they appear in package.json
//!
//! A range is split into the operator prefix (`^`, `~`, `>=`, `>= `, or
//! nothing) and the version part that follows it, so that a rewrite can keep
//! the prefix exactly as the author wrote it.

use crate::parser;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A version range with its original string representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// The raw range string as it appears in the manifest
    pub raw: String,
    /// Everything before the first numeric version substring
    pub prefix: String,
}

impl VersionSpec {
    /// Split a raw range into prefix and version part
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let prefix = parser::version_offset(&raw)
            .map(|offset| raw[..offset].to_string())
            .unwrap_or_default();
        Self { raw, prefix }
    }

    /// The part of the range after the prefix
    pub fn version_part(&self) -> &str {
        &self.raw[self.prefix.len()..]
    }

    /// Minimum version satisfying this range, if it is a semver range at all
    pub fn min_version(&self) -> Option<Version> {
        parser::min_version(&self.raw)
    }

    /// Returns true if the range resolves to a concrete minimum version
    pub fn is_resolvable(&self) -> bool {
        self.min_version().is_some()
    }

    /// Formats a new version while preserving the original prefix
    pub fn format_updated(&self, new_version: &str) -> String {
        format!("{}{}", self.prefix, new_version)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(VersionSpec::parse("^1.2.3").prefix, "^");
        assert_eq!(VersionSpec::parse("~1.2.3").prefix, "~");
        assert_eq!(VersionSpec::parse(">=1.2.3").prefix, ">=");
        assert_eq!(VersionSpec::parse(">= 1.2.3").prefix, ">= ");
        assert_eq!(VersionSpec::parse("1.2.3").prefix, "");
        assert_eq!(VersionSpec::parse("*").prefix, "");
    }

    #[test]
    fn test_version_part() {
        let spec = VersionSpec::parse("^1.2.3");
        assert_eq!(spec.version_part(), "1.2.3");

        let spec = VersionSpec::parse("*");
        assert_eq!(spec.version_part(), "*");
    }

    #[test]
    fn test_format_updated_keeps_operator() {
        assert_eq!(VersionSpec::parse("~1.2.0").format_updated("1.3.5"), "~1.3.5");
        assert_eq!(VersionSpec::parse("1.2.0").format_updated("1.3.5"), "1.3.5");
        assert_eq!(VersionSpec::parse("^4.17.21").format_updated("4.18.0"), "^4.18.0");
        assert_eq!(VersionSpec::parse(">=1.0.0").format_updated("2.0.0"), ">=2.0.0");
    }

    #[test]
    fn test_format_updated_drops_upper_bound() {
        let spec = VersionSpec::parse(">=1.0.0 <2.0.0");
        assert_eq!(spec.format_updated("2.1.0"), ">=2.1.0");
    }

    #[test]
    fn test_prefix_round_trip() {
        for raw in ["~1.0.1", "^1.1.0", "2.0.0", "2.0.0-beta.1", ">=3.1.4"] {
            let spec = VersionSpec::parse(raw);
            assert_eq!(spec.format_updated(spec.version_part()), raw);
        }
    }

    #[test]
    fn test_min_version() {
        let spec = VersionSpec::parse("^1.0.0");
        assert_eq!(spec.min_version(), Some(Version::new(1, 0, 0)));
        assert!(spec.is_resolvable());

        let spec = VersionSpec::parse("workspace:*");
        assert!(!spec.is_resolvable());
    }

    #[test]
    fn test_display_trait() {
        let spec = VersionSpec::parse("^1.2.3");
        assert_eq!(format!("{}", spec), "^1.2.3");
    }
}
