//! .npmrc settings reader
//!
//! Only the default `registry=` entry is read. Scoped registries
//! (`@scope:registry=`) and auth settings are ignored.

use std::path::Path;

/// Public npm registry
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Settings read from a project's .npmrc
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpmrcSettings {
    /// Default registry URL, without a trailing slash
    pub registry: Option<String>,
}

impl NpmrcSettings {
    /// Read settings from `<dir>/.npmrc`; a missing file yields defaults
    pub fn from_dir(dir: &Path) -> Self {
        std::fs::read_to_string(dir.join(".npmrc"))
            .map(|content| Self::parse(&content))
            .unwrap_or_default()
    }

    /// Parse .npmrc content; the last `registry=` line wins, as in npm
    pub fn parse(content: &str) -> Self {
        let mut settings = NpmrcSettings::default();

        for line in content.lines() {
            let line = line.trim();
            // Skip comments
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key.trim() != "registry" {
                continue;
            }

            // Handle quoted values like "https://..." or 'https://...'
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                settings.registry = Some(value.trim_end_matches('/').to_string());
            }
        }

        settings
    }
}

/// Registry URL by precedence: explicit flag, then .npmrc, then the public registry
pub fn resolve_registry(flag: Option<&str>, dir: &Path) -> String {
    flag.map(|url| url.trim_end_matches('/').to_string())
        .or_else(|| NpmrcSettings::from_dir(dir).registry)
        .unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
}
