//! Workspace detection and package.json discovery
//!
//! Features:
//! - Reads workspace patterns from pnpm-workspace.yaml or package.json
//! - Expands patterns with glob, honouring `!` exclusions
//! - Never descends into node_modules

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Manifest file name for Node projects
pub const PACKAGE_JSON: &str = "package.json";

/// pnpm workspace file name
pub const PNPM_WORKSPACE: &str = "pnpm-workspace.yaml";

#[derive(Debug, Default, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Vec<String>,
}

/// Workspace patterns declared for the project at `root`
///
/// pnpm-workspace.yaml takes precedence when present. Otherwise the
/// `workspaces` field of package.json is used, either as an array or as
/// `{ "packages": [...] }`. Any read or parse failure yields no patterns.
pub fn detect_workspaces(root: &Path) -> Vec<String> {
    let pnpm_path = root.join(PNPM_WORKSPACE);
    if pnpm_path.exists() {
        return std::fs::read_to_string(&pnpm_path)
            .ok()
            .and_then(|content| serde_yaml::from_str::<PnpmWorkspace>(&content).ok())
            .map(|workspace| workspace.packages)
            .unwrap_or_else(|| {
                warn!(path = %pnpm_path.display(), "Could not read workspace patterns");
                Vec::new()
            });
    }

    std::fs::read_to_string(root.join(PACKAGE_JSON))
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .and_then(|parsed| workspaces_from_package_json(&parsed))
        .unwrap_or_default()
}

fn workspaces_from_package_json(parsed: &serde_json::Value) -> Option<Vec<String>> {
    let workspaces = parsed.get("workspaces")?;
    // npm/yarn format: "workspaces": ["packages/*"]
    // Yarn classic format: { "packages": ["packages/*"] }
    let list = workspaces
        .as_array()
        .or_else(|| workspaces.get("packages").and_then(|v| v.as_array()))?;
    Some(
        list.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
    )
}

/// Resolve workspace patterns to package.json paths
///
/// With no patterns only the root package.json is returned. Each pattern is
/// expanded as `root/<pattern>/package.json`, results of one pattern sorted,
/// duplicates across patterns dropped.
pub fn discover_manifests(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    if patterns.is_empty() {
        return vec![root.join(PACKAGE_JSON)];
    }

    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let join = |pattern: &str| {
        let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
        format!("{escaped_root}/{pattern}")
    };

    let exclusions: Vec<glob::Pattern> = patterns
        .iter()
        .filter_map(|p| p.strip_prefix('!'))
        .filter_map(|p| glob::Pattern::new(&join(p)).ok())
        .collect();

    let mut seen = HashSet::new();
    let mut manifests = Vec::new();

    for pattern in patterns.iter().filter(|p| !p.starts_with('!')) {
        let full = format!("{}/{}", join(pattern), PACKAGE_JSON);
        let mut matched: Vec<PathBuf> = match glob::glob(&full) {
            Ok(paths) => paths.flatten().collect(),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid workspace pattern");
                continue;
            }
        };
        matched.sort();

        for path in matched {
            if path.components().any(|c| c.as_os_str() == "node_modules") {
                continue;
            }
            let dir = path.parent().unwrap_or(root);
            if exclusions.iter().any(|ex| ex.matches_path(dir)) {
                debug!(path = %path.display(), "Excluded by workspace pattern");
                continue;
            }
            if seen.insert(path.clone()) {
                manifests.push(path);
            }
        }
    }

    manifests
}

/// Workspace patterns plus the manifests they resolve to
pub fn detect_manifests(root: &Path) -> Vec<PathBuf> {
    let patterns = detect_workspaces(root);
    debug!(?patterns, "Workspace patterns");
    discover_manifests(root, &patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_package(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(PACKAGE_JSON),
            format!(r#"{{"name": "{name}", "version": "1.0.0"}}"#),
        )
        .unwrap();
    }

    #[test]
    fn test_detect_workspaces_none() {
        let temp = TempDir::new().unwrap();
        write_package(temp.path(), "root");
        assert!(detect_workspaces(temp.path()).is_empty());
    }

    #[test]
    fn test_detect_workspaces_pnpm() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PNPM_WORKSPACE),
            "packages:\n  - 'apps/*'\n  - \"packages/*\"\n  - '!packages/legacy'\n",
        )
        .unwrap();
        assert_eq!(
            detect_workspaces(temp.path()),
            vec!["apps/*", "packages/*", "!packages/legacy"]
        );
    }

    #[test]
    fn test_detect_workspaces_pnpm_takes_precedence() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PNPM_WORKSPACE), "packages:\n  - 'apps/*'\n").unwrap();
        fs::write(
            temp.path().join(PACKAGE_JSON),
            r#"{"workspaces": ["packages/*"]}"#,
        )
        .unwrap();
        assert_eq!(detect_workspaces(temp.path()), vec!["apps/*"]);
    }

    #[test]
    fn test_detect_workspaces_package_json_array() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PACKAGE_JSON),
            r#"{"workspaces": ["packages/*", "tools/cli"]}"#,
        )
        .unwrap();
        assert_eq!(detect_workspaces(temp.path()), vec!["packages/*", "tools/cli"]);
    }

    #[test]
    fn test_detect_workspaces_package_json_object() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PACKAGE_JSON),
            r#"{"workspaces": {"packages": ["packages/*"], "nohoist": ["**/x"]}}"#,
        )
        .unwrap();
        assert_eq!(detect_workspaces(temp.path()), vec!["packages/*"]);
    }

    #[test]
    fn test_detect_workspaces_invalid_inputs() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PACKAGE_JSON), "{ not json").unwrap();
        assert!(detect_workspaces(temp.path()).is_empty());

        fs::write(temp.path().join(PNPM_WORKSPACE), ": : [").unwrap();
        assert!(detect_workspaces(temp.path()).is_empty());
    }

    #[test]
    fn test_discover_without_patterns() {
        let temp = TempDir::new().unwrap();
        let found = discover_manifests(temp.path(), &[]);
        assert_eq!(found, vec![temp.path().join(PACKAGE_JSON)]);
    }

    #[test]
    fn test_discover_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        write_package(&temp.path().join("packages/zeta"), "zeta");
        write_package(&temp.path().join("packages/alpha"), "alpha");
        write_package(&temp.path().join("apps/web"), "web");

        let patterns = vec![
            "packages/*".to_string(),
            "apps/*".to_string(),
            "packages/alpha".to_string(),
        ];
        let found = discover_manifests(temp.path(), &patterns);
        assert_eq!(
            found,
            vec![
                temp.path().join("packages/alpha/package.json"),
                temp.path().join("packages/zeta/package.json"),
                temp.path().join("apps/web/package.json"),
            ]
        );
    }

    #[test]
    fn test_discover_honours_exclusions() {
        let temp = TempDir::new().unwrap();
        write_package(&temp.path().join("packages/core"), "core");
        write_package(&temp.path().join("packages/legacy"), "legacy");

        let patterns = vec!["packages/*".to_string(), "!packages/legacy".to_string()];
        let found = discover_manifests(temp.path(), &patterns);
        assert_eq!(found, vec![temp.path().join("packages/core/package.json")]);
    }

    #[test]
    fn test_discover_skips_node_modules() {
        let temp = TempDir::new().unwrap();
        write_package(&temp.path().join("packages/core"), "core");
        write_package(
            &temp.path().join("packages/core/node_modules/dep"),
            "dep",
        );

        let patterns = vec!["packages/**".to_string()];
        let found = discover_manifests(temp.path(), &patterns);
        assert_eq!(found, vec![temp.path().join("packages/core/package.json")]);
    }

    #[test]
    fn test_detect_manifests_end_to_end() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PACKAGE_JSON),
            r#"{"workspaces": ["apps/*"]}"#,
        )
        .unwrap();
        write_package(&temp.path().join("apps/web"), "web");

        let found = detect_manifests(temp.path());
        assert_eq!(found, vec![temp.path().join("apps/web/package.json")]);
    }
}
