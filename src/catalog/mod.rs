//! Dependency aggregation
//!
//! This module provides:
//! - Record construction from a declared dependency and its published versions
//! - The ordered upgrade catalog with in-place merge on rescan
//! - Location grouping of the catalog

mod group;

pub use group::{group_records, GroupKey, LocationGroup};

use crate::domain::{Dependency, DependencyRecord, RecordKey, TargetTier};
use crate::update;
use serde::Serialize;
use std::collections::HashSet;

/// Build a record for a declared dependency, or `None` when the declared range
/// is not resolvable or nothing newer is published
pub fn build_record<S: AsRef<str>>(
    dependency: &Dependency,
    published: &[S],
) -> Option<DependencyRecord> {
    let classification = update::classify(dependency.range(), published)?;
    Some(DependencyRecord::new(
        dependency.name.clone(),
        dependency.range(),
        classification.candidates,
        dependency.manifest_path.clone(),
    ))
}

/// What [`UpgradeCatalog::merge`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Replaced,
}

/// Ordered collection of records, one per `(name, manifest_dir)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpgradeCatalog {
    records: Vec<DependencyRecord>,
}

impl UpgradeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in discovery order
    pub fn records(&self) -> &[DependencyRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.records.iter()
    }

    fn position(&self, key: &RecordKey) -> Option<usize> {
        self.records.iter().position(|r| r.matches(key))
    }

    pub fn get(&self, key: &RecordKey) -> Option<&DependencyRecord> {
        self.position(key).map(|idx| &self.records[idx])
    }

    pub fn get_mut(&mut self, key: &RecordKey) -> Option<&mut DependencyRecord> {
        self.position(key).map(move |idx| &mut self.records[idx])
    }

    /// Insert a record, or refresh the existing record with the same key
    ///
    /// A refresh replaces the range and candidates, remembers the prior tier
    /// as `previous_tier`, resets the tier to patch and keeps the selection.
    pub fn merge(&mut self, record: DependencyRecord) -> MergeOutcome {
        match self.position(&record.key()) {
            Some(idx) => {
                let existing = &mut self.records[idx];
                existing.current_range = record.current_range;
                existing.candidates = record.candidates;
                existing.manifest_path = record.manifest_path;
                existing.previous_tier = Some(existing.target_tier);
                existing.target_tier = TargetTier::Patch;
                MergeOutcome::Replaced
            }
            None => {
                self.records.push(record);
                MergeOutcome::Inserted
            }
        }
    }

    /// Records sharing a name, in catalog order
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DependencyRecord> + 'a {
        self.records.iter().filter(move |r| r.name == name)
    }

    /// Whether locations declare this name with different ranges
    pub fn has_diverging_versions(&self, name: &str) -> bool {
        let ranges: HashSet<&str> = self.named(name).map(|r| r.current_range.as_str()).collect();
        ranges.len() > 1
    }

    /// Location groups for the current state of the catalog
    pub fn groups(&self) -> Vec<LocationGroup> {
        group_records(&self.records)
    }

    /// Copies of every selected record, in catalog order
    pub fn selected_snapshot(&self) -> Vec<DependencyRecord> {
        self.records.iter().filter(|r| r.selected).cloned().collect()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut DependencyRecord> {
        self.records.iter_mut()
    }
}

impl FromIterator<DependencyRecord> for UpgradeCatalog {
    fn from_iter<I: IntoIterator<Item = DependencyRecord>>(iter: I) -> Self {
        let mut catalog = UpgradeCatalog::new();
        for record in iter {
            catalog.merge(record);
        }
        catalog
    }
}
