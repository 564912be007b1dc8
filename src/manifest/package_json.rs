//! package.json reading and patching
//!
//! Handles:
//! - dependencies
//! - devDependencies
//!
//! Documents are held as `serde_json::Value` with key order preserved, so a
//! patched manifest keeps its layout apart from whitespace normalisation.

use crate::domain::{ChangeEntry, Dependency, VersionSpec};
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

/// Sections that are scanned and rewritten, in precedence order
pub const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// Parse a package.json document
pub fn parse_document(content: &str, path: &Path) -> Result<Value, ManifestError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;
    if !json.is_object() {
        return Err(ManifestError::NotAnObject {
            path: path.to_path_buf(),
        });
    }
    Ok(json)
}

/// Dependencies declared in a package.json document
///
/// `dependencies` are read before `devDependencies`; when a name is declared
/// in both, the first occurrence wins. Non-string values are ignored.
pub fn parse_declared(content: &str, path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let json = parse_document(content, path)?;

    let mut seen = HashSet::new();
    let mut dependencies = Vec::new();
    for section in DEPENDENCY_SECTIONS {
        let Some(deps) = json.get(section).and_then(Value::as_object) else {
            continue;
        };
        let is_dev = section == "devDependencies";
        collect_section(deps, is_dev, path, &mut seen, &mut dependencies);
    }

    Ok(dependencies)
}

fn collect_section(
    deps: &Map<String, Value>,
    is_dev: bool,
    path: &Path,
    seen: &mut HashSet<String>,
    output: &mut Vec<Dependency>,
) {
    for (name, value) in deps {
        let Some(range) = value.as_str() else {
            continue;
        };
        if seen.insert(name.clone()) {
            output.push(Dependency::new(name.clone(), range, is_dev, path));
        }
    }
}

/// Read and parse the dependencies declared by the manifest at `path`
pub fn read_declared(path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    parse_declared(&content, path)
}

/// Patch version entries in place
///
/// Every change is applied to each section that declares the name, keeping
/// the prefix of the existing value. Protocol references and other values
/// that are not version ranges are left alone. Returns the names that were modified.
pub fn apply_changes(json: &mut Value, entries: &[ChangeEntry]) -> Vec<String> {
    let mut modified = Vec::new();
    for entry in entries {
        let mut touched = false;
        for section in DEPENDENCY_SECTIONS {
            let Some(slot) = json
                .get_mut(section)
                .and_then(Value::as_object_mut)
                .and_then(|deps| deps.get_mut(&entry.name))
            else {
                continue;
            };
            let Some(old) = slot.as_str() else {
                continue;
            };
            let spec = VersionSpec::parse(old);
            if !spec.is_resolvable() {
                continue;
            }
            let updated = spec.format_updated(&entry.new_version);
            if updated != old {
                *slot = Value::String(updated);
                touched = true;
            }
        }
        if touched {
            modified.push(entry.name.clone());
        }
    }
    modified
}

/// Serialise with two-space indentation and a trailing newline
pub fn to_manifest_string(json: &Value, path: &Path) -> Result<String, ManifestError> {
    let mut out = serde_json::to_string_pretty(json)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;
    out.push('\n');
    Ok(out)
}
