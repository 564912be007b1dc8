//! Discovery orchestrator
//!
//! This module provides:
//! - Manifest scanning in small concurrent batches
//! - Registry lookups bounded by a semaphore
//! - A single receiver that owns and merges into the catalog
//! - A hard deadline that aborts the producer and keeps the partial catalog

use crate::catalog::{build_record, MergeOutcome, UpgradeCatalog};
use crate::domain::{Dependency, DependencyRecord};
use crate::error::{ManifestError, RegistryError};
use crate::manifest::{detect_manifests, read_declared};
use crate::progress::Progress;
use crate::registry::RegistryAdapter;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Default number of registry lookups in flight
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Number of manifests scanned concurrently
pub const MANIFEST_BATCH_SIZE: usize = 3;

/// Number of dependencies of one manifest resolved concurrently
pub const DEPENDENCY_CHUNK_SIZE: usize = 10;

/// Default deadline for the whole discovery phase
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum concurrent registry lookups
    pub concurrency: usize,
    /// Manifests per batch
    pub manifest_batch: usize,
    /// Dependencies per chunk
    pub dependency_chunk: usize,
    /// Deadline for the whole discovery phase
    pub timeout: Duration,
    /// Show a progress bar on stderr
    pub show_progress: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            manifest_batch: MANIFEST_BATCH_SIZE,
            dependency_chunk: DEPENDENCY_CHUNK_SIZE,
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
            show_progress: false,
        }
    }
}

/// Problems that did not stop discovery
#[derive(Debug)]
pub enum DiscoveryIssue {
    /// A manifest could not be read or parsed
    ManifestUnreadable { path: PathBuf, message: String },
    /// The registry lookup for a package failed
    LookupFailed { package: String, message: String },
}

impl std::fmt::Display for DiscoveryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryIssue::ManifestUnreadable { path, message } => {
                write!(f, "Skipped {}: {}", path.display(), message)
            }
            DiscoveryIssue::LookupFailed { package, message } => {
                write!(f, "Failed to fetch {}: {}", package, message)
            }
        }
    }
}

impl std::error::Error for DiscoveryIssue {}

/// Result of a discovery run
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    /// Every dependency with at least one upgrade candidate
    pub catalog: UpgradeCatalog,
    /// Manifests that were read successfully
    pub manifests_scanned: usize,
    /// Registry lookups that were started
    pub lookups: usize,
    /// Registry lookups that failed
    pub failed_lookups: usize,
    /// Non-fatal problems, in arrival order
    pub errors: Vec<DiscoveryIssue>,
    /// The deadline expired before every lookup finished
    pub timed_out: bool,
}

/// Messages from the producer task to the catalog writer
enum DiscoveryEvent {
    ManifestScanned { lookups: usize },
    ManifestFailed { path: PathBuf, error: ManifestError },
    Resolved { name: String, record: Option<DependencyRecord> },
    LookupFailed { name: String, error: RegistryError },
}

impl DiscoveryOutcome {
    fn apply(&mut self, event: DiscoveryEvent, progress: &Progress) {
        match event {
            DiscoveryEvent::ManifestScanned { lookups } => {
                self.manifests_scanned += 1;
                self.lookups += lookups;
                progress.inc_length(lookups as u64);
            }
            DiscoveryEvent::ManifestFailed { path, error } => {
                warn!(path = %path.display(), %error, "Skipping manifest");
                self.errors.push(DiscoveryIssue::ManifestUnreadable {
                    path,
                    message: error.to_string(),
                });
            }
            DiscoveryEvent::Resolved { name, record } => {
                progress.inc();
                match record {
                    Some(record) => {
                        if self.catalog.merge(record) == MergeOutcome::Replaced {
                            debug!(package = %name, "Replaced existing record");
                        }
                        progress.set_message(&format!("{} upgradable", self.catalog.len()));
                    }
                    None => trace!(package = %name, "No newer version published"),
                }
            }
            DiscoveryEvent::LookupFailed { name, error } => {
                progress.inc();
                debug!(package = %name, %error, "Registry lookup failed");
                self.failed_lookups += 1;
                self.errors.push(DiscoveryIssue::LookupFailed {
                    package: name,
                    message: error.to_string(),
                });
            }
        }
    }
}

/// Bounded-concurrency discovery over a set of manifests
pub struct Discovery {
    adapter: Arc<dyn RegistryAdapter>,
    semaphore: Arc<Semaphore>,
    config: DiscoveryConfig,
}

impl Discovery {
    /// Create a discovery run against the given registry
    pub fn new(adapter: Arc<dyn RegistryAdapter>, config: DiscoveryConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        Self {
            adapter,
            semaphore,
            config,
        }
    }

    /// Detect the manifests under `root` and discover their upgrades
    pub async fn discover(&self, root: &Path) -> DiscoveryOutcome {
        let mut progress = Progress::new(self.config.show_progress);
        progress.spinner("Detecting manifests...");
        let manifests = detect_manifests(root);
        progress.finish_and_clear();
        debug!(count = manifests.len(), root = %root.display(), "Detected manifests");

        self.run(manifests).await
    }

    /// Discover upgrades for an explicit list of manifests
    pub async fn run(&self, manifests: Vec<PathBuf>) -> DiscoveryOutcome {
        let mut outcome = DiscoveryOutcome::default();
        if manifests.is_empty() {
            return outcome;
        }

        let deadline = Instant::now() + self.config.timeout;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let producer = tokio::spawn(produce(
            Arc::clone(&self.adapter),
            Arc::clone(&self.semaphore),
            manifests,
            self.config.manifest_batch.max(1),
            self.config.dependency_chunk.max(1),
            tx,
        ));

        let mut progress = Progress::new(self.config.show_progress);
        progress.start("Resolving dependencies");

        loop {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some(event)) => outcome.apply(event, &progress),
                Ok(None) => break,
                Err(_) => {
                    producer.abort();
                    outcome.timed_out = true;
                    warn!(
                        timeout = ?self.config.timeout,
                        found = outcome.catalog.len(),
                        "Discovery timed out, continuing with partial results"
                    );
                    break;
                }
            }
        }
        progress.finish_and_clear();

        if !outcome.timed_out {
            if let Err(e) = producer.await {
                warn!(error = %e, "Discovery task failed");
            }
        }

        outcome
    }
}

/// Walk the manifests in batches and send every resolution to the writer
async fn produce(
    adapter: Arc<dyn RegistryAdapter>,
    semaphore: Arc<Semaphore>,
    manifests: Vec<PathBuf>,
    batch_size: usize,
    chunk_size: usize,
    tx: UnboundedSender<DiscoveryEvent>,
) {
    for batch in manifests.chunks(batch_size) {
        join_all(
            batch
                .iter()
                .map(|path| scan_manifest(&*adapter, &semaphore, path, chunk_size, &tx)),
        )
        .await;
    }
}

async fn scan_manifest(
    adapter: &dyn RegistryAdapter,
    semaphore: &Semaphore,
    path: &Path,
    chunk_size: usize,
    tx: &UnboundedSender<DiscoveryEvent>,
) {
    let declared = match read_declared(path) {
        Ok(declared) => declared,
        Err(error) => {
            let _ = tx.send(DiscoveryEvent::ManifestFailed {
                path: path.to_path_buf(),
                error,
            });
            return;
        }
    };

    let (resolvable, unresolvable): (Vec<_>, Vec<_>) = declared
        .into_iter()
        .partition(|dep| dep.version_spec.is_resolvable());
    for dep in &unresolvable {
        trace!(package = %dep.name, range = dep.range(), "Skipping unresolvable range");
    }

    let _ = tx.send(DiscoveryEvent::ManifestScanned {
        lookups: resolvable.len(),
    });

    for chunk in resolvable.chunks(chunk_size) {
        join_all(chunk.iter().map(|dep| resolve(adapter, semaphore, dep, tx))).await;
    }
}

async fn resolve(
    adapter: &dyn RegistryAdapter,
    semaphore: &Semaphore,
    dependency: &Dependency,
    tx: &UnboundedSender<DiscoveryEvent>,
) {
    let Ok(_permit) = semaphore.acquire().await else {
        return;
    };

    let event = match adapter.fetch_versions(&dependency.name).await {
        Ok(published) => DiscoveryEvent::Resolved {
            name: dependency.name.clone(),
            record: build_record(dependency, &published),
        },
        Err(error) => DiscoveryEvent::LookupFailed {
            name: dependency.name.clone(),
            error,
        },
    };
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockRegistry {
        versions: HashMap<String, Vec<String>>,
        delay: Option<Duration>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl MockRegistry {
        fn with(mut self, name: &str, versions: &[&str]) -> Self {
            self.versions.insert(
                name.to_string(),
                versions.iter().map(|v| v.to_string()).collect(),
            );
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl RegistryAdapter for MockRegistry {
        fn registry_name(&self) -> &'static str {
            "mock"
        }

        async fn fetch_versions(&self, package: &str) -> Result<Vec<String>, RegistryError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.versions
                .get(package)
                .cloned()
                .ok_or_else(|| RegistryError::package_not_found(package, "mock"))
        }
    }

    fn write_manifest(dir: &Path, content: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join("package.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_discovery_config_default() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.manifest_batch, 3);
        assert_eq!(config.dependency_chunk, 10);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(!config.show_progress);
    }

    #[test]
    fn test_discovery_issue_display() {
        let issue = DiscoveryIssue::LookupFailed {
            package: "lodash".to_string(),
            message: "not found".to_string(),
        };
        assert!(issue.to_string().contains("Failed to fetch lodash"));

        let issue = DiscoveryIssue::ManifestUnreadable {
            path: PathBuf::from("/tmp/package.json"),
            message: "invalid".to_string(),
        };
        assert!(issue.to_string().starts_with("Skipped /tmp/package.json"));
    }

    #[tokio::test]
    async fn test_run_without_manifests() {
        let discovery = Discovery::new(Arc::new(MockRegistry::default()), DiscoveryConfig::default());
        let outcome = discovery.run(Vec::new()).await;
        assert!(outcome.catalog.is_empty());
        assert_eq!(outcome.manifests_scanned, 0);
        assert!(!outcome.timed_out);
    }

    #[tokio::test]
    async fn test_discover_single_package() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            r#"{"dependencies": {"left-pad": "^1.0.0", "local": "workspace:*"}}"#,
        );
        let registry = MockRegistry::default().with(
            "left-pad",
            &["1.0.0", "1.0.1", "1.1.0", "2.0.0", "2.0.0-beta.1"],
        );

        let discovery = Discovery::new(Arc::new(registry), DiscoveryConfig::default());
        let outcome = discovery.discover(dir.path()).await;

        assert_eq!(outcome.manifests_scanned, 1);
        assert_eq!(outcome.lookups, 1);
        assert_eq!(outcome.catalog.len(), 1);
        let record = &outcome.catalog.records()[0];
        assert_eq!(record.name, "left-pad");
        assert_eq!(record.display_version(), "~1.0.1");
    }

    #[tokio::test]
    async fn test_lookup_failures_are_counted() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            r#"{"dependencies": {"known": "1.0.0", "missing": "^2.0.0"}}"#,
        );
        let registry = MockRegistry::default().with("known", &["1.0.0", "1.0.5"]);

        let discovery = Discovery::new(Arc::new(registry), DiscoveryConfig::default());
        let outcome = discovery.discover(dir.path()).await;

        assert_eq!(outcome.lookups, 2);
        assert_eq!(outcome.failed_lookups, 1);
        assert_eq!(outcome.catalog.len(), 1);
        assert!(matches!(
            outcome.errors.as_slice(),
            [DiscoveryIssue::LookupFailed { package, .. }] if package == "missing"
        ));
    }

    #[tokio::test]
    async fn test_invalid_manifest_is_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write_manifest(&dir.path().join("a"), r#"{"dependencies": {"x": "1.0.0"}}"#);
        let bad = write_manifest(&dir.path().join("b"), "{ not json");
        let registry = MockRegistry::default().with("x", &["1.0.0", "1.1.0"]);

        let discovery = Discovery::new(Arc::new(registry), DiscoveryConfig::default());
        let outcome = discovery.run(vec![good, bad]).await;

        assert_eq!(outcome.manifests_scanned, 1);
        assert_eq!(outcome.catalog.len(), 1);
        assert!(matches!(
            outcome.errors.as_slice(),
            [DiscoveryIssue::ManifestUnreadable { .. }]
        ));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let dir = TempDir::new().unwrap();
        let deps: Vec<String> = (0..12).map(|i| format!("\"pkg{}\": \"1.0.0\"", i)).collect();
        let path = write_manifest(
            dir.path(),
            &format!("{{\"dependencies\": {{{}}}}}", deps.join(",")),
        );
        let mut registry = MockRegistry::default().delayed(Duration::from_millis(20));
        for i in 0..12 {
            registry = registry.with(&format!("pkg{}", i), &["1.0.0", "1.0.1"]);
        }
        let registry = Arc::new(registry);

        let config = DiscoveryConfig {
            concurrency: 2,
            ..DiscoveryConfig::default()
        };
        let discovery = Discovery::new(registry.clone(), config);
        let outcome = discovery.run(vec![path]).await;

        assert_eq!(outcome.catalog.len(), 12);
        assert!(registry.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_timeout_keeps_partial_catalog() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(dir.path(), r#"{"dependencies": {"slow": "1.0.0"}}"#);
        let registry = MockRegistry::default()
            .with("slow", &["1.0.0", "1.0.1"])
            .delayed(Duration::from_secs(5));

        let config = DiscoveryConfig {
            timeout: Duration::from_millis(50),
            ..DiscoveryConfig::default()
        };
        let discovery = Discovery::new(Arc::new(registry), config);
        let outcome = discovery.run(vec![path]).await;

        assert!(outcome.timed_out);
        assert!(outcome.catalog.is_empty());
        assert_eq!(outcome.manifests_scanned, 1);
    }

    #[tokio::test]
    async fn test_same_name_in_two_locations() {
        let dir = TempDir::new().unwrap();
        let a = write_manifest(&dir.path().join("a"), r#"{"dependencies": {"react": "^18.0.0"}}"#);
        let b = write_manifest(
            &dir.path().join("b"),
            r#"{"devDependencies": {"react": "~18.1.0"}}"#,
        );
        let registry = MockRegistry::default().with("react", &["18.0.0", "18.1.0", "18.2.0"]);

        let discovery = Discovery::new(Arc::new(registry), DiscoveryConfig::default());
        let outcome = discovery.run(vec![a, b]).await;

        assert_eq!(outcome.catalog.len(), 2);
        assert!(outcome.catalog.has_diverging_versions("react"));
    }
}
