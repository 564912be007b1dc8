//! Declared dependency information

use super::VersionSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A dependency as declared in one package.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Declared version range
    pub version_spec: VersionSpec,
    /// Whether this came from devDependencies
    pub is_dev: bool,
    /// Path of the package.json declaring it
    pub manifest_path: PathBuf,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        range: impl Into<String>,
        is_dev: bool,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version_spec: VersionSpec::parse(range),
            is_dev,
            manifest_path: manifest_path.into(),
        }
    }

    /// Creates a new production dependency
    pub fn production(
        name: impl Into<String>,
        range: impl Into<String>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(name, range, false, manifest_path)
    }

    /// Creates a new development dependency
    pub fn development(
        name: impl Into<String>,
        range: impl Into<String>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(name, range, true, manifest_path)
    }

    /// Returns the raw declared range
    pub fn range(&self) -> &str {
        &self.version_spec.raw
    }

    /// Directory containing the declaring manifest
    pub fn manifest_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new(""))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.is_dev { " (dev)" } else { "" };
        write!(f, "{}@{}{}", self.name, self.version_spec, dev_marker)
    }
}
