//! Registry adapters for fetching package version information
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter

mod client;
mod npm;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use npm::NpmAdapter;

use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch every published version string of a package
    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>, RegistryError>;
}
