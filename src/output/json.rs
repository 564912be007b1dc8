//! JSON output formatter for machine processing
//!
//! Serializes the upgrade catalog with the derived display version, the
//! location label each record is grouped under, and the divergence flag.

use crate::catalog::{GroupKey, UpgradeCatalog};
use crate::domain::{DependencyRecord, TargetTier};
use crate::output::display_path;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter for machine-readable output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    /// Emit indented JSON
    pretty: bool,
}

/// JSON representation of one catalog record
#[derive(Serialize)]
struct JsonRecord<'a> {
    name: &'a str,
    current_range: &'a str,
    display_version: String,
    target_tier: TargetTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prerelease: Option<String>,
    /// Location label relative to the project root
    location: String,
    manifest_path: String,
    /// The same name is declared with different ranges elsewhere
    diverging: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn record_to_json<'a>(
        record: &'a DependencyRecord,
        catalog: &UpgradeCatalog,
        root: &Path,
    ) -> JsonRecord<'a> {
        let candidates = &record.candidates;
        JsonRecord {
            name: &record.name,
            current_range: &record.current_range,
            display_version: record.display_version(),
            target_tier: record.target_tier,
            patch: candidates.patch.as_ref().map(ToString::to_string),
            minor: candidates.minor.as_ref().map(ToString::to_string),
            latest: candidates.latest.as_ref().map(ToString::to_string),
            prerelease: candidates.prerelease.as_ref().map(ToString::to_string),
            location: GroupKey::Location(record.manifest_dir.clone()).label(root),
            manifest_path: display_path(&record.manifest_path, root),
            diverging: catalog.has_diverging_versions(&record.name),
        }
    }

    /// Write the catalog as a JSON array followed by a newline
    pub fn format_catalog(
        &self,
        catalog: &UpgradeCatalog,
        root: &Path,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let records: Vec<JsonRecord<'_>> = catalog
            .iter()
            .map(|record| Self::record_to_json(record, catalog, root))
            .collect();

        let json = if self.pretty {
            serde_json::to_string_pretty(&records)
        } else {
            serde_json::to_string(&records)
        }
        .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TierCandidates;
    use semver::Version;
    use serde_json::Value;

    fn record(name: &str, range: &str, dir: &str) -> DependencyRecord {
        DependencyRecord::new(
            name,
            range,
            TierCandidates {
                patch: Some(Version::new(1, 0, 1)),
                minor: Some(Version::new(1, 1, 0)),
                latest: Some(Version::new(2, 0, 0)),
                prerelease: None,
            },
            Path::new(dir).join("package.json"),
        )
    }

    fn render(catalog: &UpgradeCatalog) -> Value {
        let mut out = Vec::new();
        JsonFormatter::new(false)
            .format_catalog(catalog, Path::new("/repo"), &mut out)
            .unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_empty_catalog_is_empty_array() {
        let mut out = Vec::new();
        JsonFormatter::default()
            .format_catalog(&UpgradeCatalog::new(), Path::new("/"), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_record_fields() {
        let catalog: UpgradeCatalog = vec![record("left-pad", "^1.0.0", "/repo")]
            .into_iter()
            .collect();
        let json = render(&catalog);

        let entry = &json[0];
        assert_eq!(entry["name"], "left-pad");
        assert_eq!(entry["current_range"], "^1.0.0");
        assert_eq!(entry["display_version"], "~1.0.1");
        assert_eq!(entry["target_tier"], "patch");
        assert_eq!(entry["latest"], "2.0.0");
        assert!(entry.get("prerelease").is_none());
        assert_eq!(entry["location"], ".");
        assert_eq!(entry["manifest_path"], "package.json");
        assert_eq!(entry["diverging"], false);
    }

    #[test]
    fn test_diverging_flag() {
        let catalog: UpgradeCatalog = vec![
            record("react", "^18.0.0", "/repo/a"),
            record("react", "~18.1.0", "/repo/b"),
        ]
        .into_iter()
        .collect();
        let json = render(&catalog);

        assert_eq!(json[0]["diverging"], true);
        assert_eq!(json[1]["location"], "b");
    }
}
