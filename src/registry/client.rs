//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use crate::error::RegistryError;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::trace;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("dep-updater/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

/// Context attached to every error produced for one request
struct RequestContext<'a> {
    package: &'a str,
    registry: &'a str,
}

impl RequestContext<'_> {
    fn network(&self, message: impl Into<String>) -> RegistryError {
        RegistryError::network_error(self.package, self.registry, message)
    }

    fn invalid(&self, message: impl Into<String>) -> RegistryError {
        RegistryError::InvalidResponse {
            package: self.package.to_string(),
            registry: self.registry.to_string(),
            message: message.into(),
        }
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before retry number `attempt` (zero based)
    fn backoff(attempt: u32) -> Duration {
        Duration::from_millis(BASE_DELAY_MS.saturating_mul(1u64 << attempt.min(16)))
    }

    /// Perform a GET request with retry logic and error context
    ///
    /// Network errors, timeouts and HTTP 429 are retried with exponential
    /// backoff. A 404 maps to `PackageNotFound` without retrying.
    pub async fn get_with_context(
        &self,
        url: &str,
        accept: Option<&'static str>,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let ctx = RequestContext { package, registry };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Self::backoff(attempt - 1);
                trace!(url, attempt, ?delay, "Retrying request");
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.get(url);
            if let Some(accept) = accept {
                request = request.header(ACCEPT, HeaderValue::from_static(accept));
            }

            match request.send().await {
                Ok(response) => match response.status() {
                    StatusCode::TOO_MANY_REQUESTS => {
                        last_error = Some(RegistryError::rate_limit_exceeded(registry));
                    }
                    StatusCode::NOT_FOUND => {
                        return Err(RegistryError::package_not_found(package, registry));
                    }
                    status if !status.is_success() => {
                        return Err(ctx.network(format!("HTTP {}", status)));
                    }
                    _ => return Ok(response),
                },
                Err(e) if e.is_timeout() => {
                    last_error = Some(RegistryError::timeout(package, registry));
                }
                Err(e) => {
                    last_error = Some(ctx.network(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ctx.network("unknown error")))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        accept: Option<&'static str>,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let ctx = RequestContext { package, registry };
        let response = self
            .get_with_context(url, accept, package, registry)
            .await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ctx.invalid(format!("failed to parse JSON: {}", e)))
    }
}
