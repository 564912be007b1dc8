//! Interactive strategy state
//!
//! The controller owns the catalog for the duration of the interactive
//! session. Every mutation goes through one of its methods, after which the
//! location groups are recomputed.

use crate::catalog::{LocationGroup, MergeOutcome, UpgradeCatalog};
use crate::domain::{DependencyRecord, Direction, RecordKey};
use tracing::debug;

/// Catalog plus navigation state for the interactive screen
#[derive(Debug, Clone)]
pub struct StrategyController {
    catalog: UpgradeCatalog,
    groups: Vec<LocationGroup>,
    active_group: usize,
    cursor: usize,
}

impl StrategyController {
    pub fn new(catalog: UpgradeCatalog) -> Self {
        let groups = catalog.groups();
        Self {
            catalog,
            groups,
            active_group: 0,
            cursor: 0,
        }
    }

    pub fn catalog(&self) -> &UpgradeCatalog {
        &self.catalog
    }

    pub fn groups(&self) -> &[LocationGroup] {
        &self.groups
    }

    pub fn active_group_index(&self) -> usize {
        self.active_group
    }

    pub fn active_group(&self) -> Option<&LocationGroup> {
        self.groups.get(self.active_group)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Records of the active group, in group order
    pub fn active_records(&self) -> Vec<&DependencyRecord> {
        self.active_group()
            .map(|group| {
                group
                    .members
                    .iter()
                    .filter_map(|key| self.catalog.get(key))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Record under the cursor
    pub fn focused(&self) -> Option<&DependencyRecord> {
        self.key_at(self.cursor).and_then(|key| self.catalog.get(&key))
    }

    fn key_at(&self, index: usize) -> Option<RecordKey> {
        self.active_group()
            .and_then(|group| group.members.get(index))
            .cloned()
    }

    /// Merge a freshly discovered record and regroup
    pub fn merge(&mut self, record: DependencyRecord) -> MergeOutcome {
        let outcome = self.catalog.merge(record);
        self.regroup();
        outcome
    }

    fn regroup(&mut self) {
        self.groups = self.catalog.groups();
        self.active_group = self.active_group.min(self.groups.len().saturating_sub(1));
        let len = self.active_group().map_or(0, LocationGroup::len);
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Move to the neighbouring group without wrapping; the cursor resets
    pub fn switch_group(&mut self, direction: Direction) {
        let last = self.groups.len().saturating_sub(1);
        self.active_group = match direction {
            Direction::Prev => self.active_group.saturating_sub(1),
            Direction::Next => (self.active_group + 1).min(last),
        };
        self.cursor = 0;
    }

    /// Move the cursor within the active group without wrapping
    pub fn move_cursor(&mut self, direction: Direction) {
        let last = self
            .active_group()
            .map_or(0, LocationGroup::len)
            .saturating_sub(1);
        self.cursor = match direction {
            Direction::Prev => self.cursor.saturating_sub(1),
            Direction::Next => (self.cursor + 1).min(last),
        };
    }

    /// Flip selection of the record at `index` in the active group
    pub fn toggle_selected(&mut self, index: usize) {
        let Some(key) = self.key_at(index) else {
            return;
        };
        if let Some(record) = self.catalog.get_mut(&key) {
            record.selected = !record.selected;
        }
        self.regroup();
    }

    /// Step the tier of the record at `index` in the active group
    pub fn cycle_tier(&mut self, index: usize, direction: Direction) {
        let Some(key) = self.key_at(index) else {
            return;
        };
        if let Some(record) = self.catalog.get_mut(&key) {
            let next = record.target_tier.cycle(direction);
            record.set_tier(next);
            debug!(package = %key, tier = %next, "Tier changed");
        }
        self.regroup();
    }

    /// Step the focused record's tier and apply the result to the whole group
    pub fn cycle_group_tier(&mut self, direction: Direction) {
        let Some(tier) = self.focused().map(|r| r.target_tier.cycle(direction)) else {
            return;
        };
        let members = self
            .active_group()
            .map(|group| group.members.clone())
            .unwrap_or_default();
        for key in &members {
            if let Some(record) = self.catalog.get_mut(key) {
                record.set_tier(tier);
            }
        }
        debug!(count = members.len(), tier = %tier, "Group tier changed");
        self.regroup();
    }

    /// Select every location of the focused name at the focused tier
    pub fn equalize_across_locations(&mut self) {
        let Some((name, tier)) = self
            .focused()
            .map(|r| (r.name.clone(), r.target_tier))
        else {
            return;
        };
        for record in self.catalog.records_mut().filter(|r| r.name == name) {
            record.selected = true;
            record.set_tier(tier);
        }
        debug!(package = %name, tier = %tier, "Equalized across locations");
        self.regroup();
    }

    /// Select every record of the active group
    pub fn select_all_in_group(&mut self) {
        let members = self
            .active_group()
            .map(|group| group.members.clone())
            .unwrap_or_default();
        for key in &members {
            if let Some(record) = self.catalog.get_mut(key) {
                record.selected = true;
            }
        }
        self.regroup();
    }

    /// Deselect everything in the catalog
    pub fn clear_selection(&mut self) {
        for record in self.catalog.records_mut() {
            record.selected = false;
        }
        self.regroup();
    }

    pub fn is_at_target(&self, record: &DependencyRecord) -> bool {
        record.is_at_target()
    }

    pub fn has_higher_tier_available(&self, record: &DependencyRecord) -> bool {
        record.has_higher_tier_available()
    }

    pub fn has_diverging_versions(&self, name: &str) -> bool {
        self.catalog.has_diverging_versions(name)
    }

    pub fn selected_snapshot(&self) -> Vec<DependencyRecord> {
        self.catalog.selected_snapshot()
    }
}
