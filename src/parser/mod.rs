//! Version range parsing for npm manifests
//!
//! This module provides:
//! - Minimum satisfying version resolution for npm ranges
//! - Range prefix location for format-preserving rewrites
//! - Registry version parsing

mod node;

pub use node::{min_version, parse_published, version_offset};
