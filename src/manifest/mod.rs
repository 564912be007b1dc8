//! Manifest file detection, parsing and rewriting
//!
//! This module provides functionality to:
//! - Detect workspace members (pnpm-workspace.yaml, package.json workspaces)
//! - Parse declared dependencies from package.json
//! - Rewrite version entries while keeping their range operators
//! - Read the default registry from .npmrc

mod detector;
mod npmrc;
mod package_json;
mod writer;

pub use detector::{
    detect_manifests, detect_workspaces, discover_manifests, PACKAGE_JSON, PNPM_WORKSPACE,
};
pub use npmrc::{resolve_registry, NpmrcSettings, DEFAULT_REGISTRY};
pub use package_json::{
    apply_changes, parse_declared, parse_document, read_declared, to_manifest_string,
    DEPENDENCY_SECTIONS,
};
pub use writer::{CommitOutcome, ManifestRewriter, RewritePlan, WriteResult};
