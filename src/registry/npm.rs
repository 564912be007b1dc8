//! npm Registry adapter
//!
//! Fetches the published version list of a package from an npm-compatible
//! registry using the abbreviated ("corgi") metadata document.
//! API endpoint: {registry}/{package}

use crate::error::RegistryError;
use crate::manifest::DEFAULT_REGISTRY;
use crate::registry::{HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Accept header selecting abbreviated install metadata
const ABBREVIATED_METADATA: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Available versions keyed by version string
    #[serde(default)]
    versions: Map<String, Value>,
}

impl NpmAdapter {
    /// Create an adapter for the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_registry(client, DEFAULT_REGISTRY)
    }

    /// Create an adapter for a custom registry URL
    pub fn with_registry(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package; the scope separator is escaped
    fn build_url(&self, package: &str) -> String {
        let path = if package.starts_with('@') {
            package.replacen('/', "%2f", 1)
        } else {
            package.to_string()
        };
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(
                &url,
                Some(ABBREVIATED_METADATA),
                package,
                self.registry_name(),
            )
            .await?;

        Ok(response.versions.into_iter().map(|(version, _)| version).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> NpmAdapter {
        NpmAdapter::new(HttpClient::new().unwrap())
    }

    #[test]
    fn test_npm_adapter_registry_name() {
        assert_eq!(adapter().registry_name(), "npm");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            adapter().build_url("lodash"),
            "https://registry.npmjs.org/lodash"
        );
    }

    #[test]
    fn test_build_url_scoped_package() {
        assert_eq!(
            adapter().build_url("@types/node"),
            "https://registry.npmjs.org/@types%2fnode"
        );
    }

    #[test]
    fn test_custom_registry_trailing_slash() {
        let adapter =
            NpmAdapter::with_registry(HttpClient::new().unwrap(), "https://npm.example.com/");
        assert_eq!(adapter.build_url("react"), "https://npm.example.com/react");
    }

    #[test]
    fn test_parse_response_versions() {
        let body = r#"{
            "name": "left-pad",
            "dist-tags": {"latest": "1.3.0"},
            "versions": {"1.0.0": {}, "1.1.0": {}, "1.3.0": {}}
        }"#;
        let response: NpmPackageResponse = serde_json::from_str(body).unwrap();
        let versions: Vec<String> = response.versions.into_iter().map(|(v, _)| v).collect();
        assert_eq!(versions, vec!["1.0.0", "1.1.0", "1.3.0"]);
    }

    #[test]
    fn test_parse_response_without_versions() {
        let response: NpmPackageResponse = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(response.versions.is_empty());
    }
}
