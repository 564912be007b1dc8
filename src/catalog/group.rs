//! Location grouping of catalog records

use crate::domain::{DependencyRecord, RecordKey};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a group is keyed on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Records declared by the manifest in this directory
    Location(PathBuf),
    /// Records whose name is declared in more than one location
    Shared,
}

impl GroupKey {
    /// Label relative to the project root, `.` for the root itself
    pub fn label(&self, root: &Path) -> String {
        match self {
            GroupKey::Shared => "shared".to_string(),
            GroupKey::Location(dir) => match dir.strip_prefix(root) {
                Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
                Ok(rel) => rel.display().to_string(),
                Err(_) => dir.display().to_string(),
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Location(dir) => write!(f, "{}", dir.display()),
            GroupKey::Shared => write!(f, "shared"),
        }
    }
}

/// A projection of the catalog onto one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationGroup {
    pub key: GroupKey,
    pub members: Vec<RecordKey>,
}

impl LocationGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group records by manifest directory in first-seen order, then append the
/// shared group when there is more than one location and it is non-empty.
pub fn group_records(records: &[DependencyRecord]) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();
    let mut by_dir: HashMap<&Path, usize> = HashMap::new();

    for record in records {
        let idx = *by_dir
            .entry(record.manifest_dir.as_path())
            .or_insert_with(|| {
                groups.push(LocationGroup {
                    key: GroupKey::Location(record.manifest_dir.clone()),
                    members: Vec::new(),
                });
                groups.len() - 1
            });
        groups[idx].members.push(record.key());
    }

    if groups.len() > 1 {
        let mut names: Vec<&str> = Vec::new();
        let mut by_name: HashMap<&str, Vec<RecordKey>> = HashMap::new();
        for record in records {
            let entry = by_name.entry(record.name.as_str()).or_insert_with(|| {
                names.push(record.name.as_str());
                Vec::new()
            });
            entry.push(record.key());
        }

        let members: Vec<RecordKey> = names
            .into_iter()
            .filter_map(|name| by_name.remove(name))
            .filter(|keys| keys.len() > 1)
            .flatten()
            .collect();

        if !members.is_empty() {
            groups.push(LocationGroup {
                key: GroupKey::Shared,
                members,
            });
        }
    }

    groups
}
