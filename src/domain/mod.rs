//! Core domain models for dep-updater
//!
//! This module contains the fundamental types used throughout the application:
//! - Declared version ranges and the dependencies carrying them
//! - Upgrade tiers and their cycle order
//! - Per-location upgrade records
//! - Manifest change plans

mod change;
mod dependency;
mod record;
mod tier;
mod version_spec;

pub use change::{ChangeEntry, PendingChange, SkipReason, SkippedChange};
pub use dependency::Dependency;
pub use record::{DependencyRecord, InstallVersion, RecordKey, TierCandidates};
pub use tier::{Direction, TargetTier};
pub use version_spec::VersionSpec;
