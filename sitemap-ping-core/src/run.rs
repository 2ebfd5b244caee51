//! The hook's run: resolve configuration, find the sitemap, ping targets.
//!
//! Each phase hands back a [`Phase`]; [`Hook::run`] checks it before moving
//! on, so every soft failure ends the run early without raising an error.

use crate::config::{self, Environment, HookInputs};
use crate::error::{HookError, Result};
use crate::report::{RunOutcome, RunReport};
use crate::sitemap::{self, LocalStore, SitemapStore};
use serde::Serialize;
use sitemap_ping_notifier::client::DEFAULT_TIMEOUT_SECS;
use sitemap_ping_notifier::{FanOut, HttpPinger, Notifier, PingClient, PingTarget};
use std::sync::Arc;
use tracing::info;

/// Result of a single phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Proceed(T),
    Stop(StopReason),
}

/// Why a run ended before pinging anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Neither the input nor the environment provided a site URL.
    Unresolved,
    /// Neither the configured sitemap path nor any fallback exists.
    SitemapMissing { configured: String },
}

/// Knobs for building a [`Hook`] with the live filesystem and HTTP client.
#[derive(Debug, Clone)]
pub struct HookOptions {
    pub timeout_secs: u64,
    pub fan_out: FanOut,
    pub include_default_targets: bool,
    /// Extra `NAME=URL` targets, appended after the built-in table.
    pub extra_targets: Vec<String>,
    pub dry_run: bool,
}

impl Default for HookOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fan_out: FanOut::Sequential,
            include_default_targets: true,
            extra_targets: Vec::new(),
            dry_run: false,
        }
    }
}

impl HookOptions {
    /// The target table these options describe.
    pub fn targets(&self) -> Result<Vec<PingTarget>> {
        let mut targets = if self.include_default_targets {
            PingTarget::defaults()
        } else {
            Vec::new()
        };

        for spec in &self.extra_targets {
            targets.push(PingTarget::parse_spec(spec)?);
        }

        if targets.is_empty() {
            return Err(HookError::InvalidInput(
                "no ping targets: default targets disabled and none given".to_string(),
            ));
        }

        Ok(targets)
    }
}

pub struct Hook {
    store: Arc<dyn SitemapStore>,
    client: Arc<dyn PingClient>,
    targets: Vec<PingTarget>,
    fan_out: FanOut,
    dry_run: bool,
}

impl Hook {
    pub fn new(store: Arc<dyn SitemapStore>, client: Arc<dyn PingClient>) -> Self {
        Self {
            store,
            client,
            targets: PingTarget::defaults(),
            fan_out: FanOut::Sequential,
            dry_run: false,
        }
    }

    /// Hook backed by the local filesystem and a `reqwest` client.
    pub fn from_options(options: &HookOptions) -> Result<Self> {
        let targets = options.targets()?;
        let client = HttpPinger::with_timeout(options.timeout_secs)?;

        Ok(Self::new(Arc::new(LocalStore), Arc::new(client))
            .with_targets(targets)
            .with_fan_out(options.fan_out)
            .with_dry_run(options.dry_run))
    }

    pub fn with_targets(mut self, targets: Vec<PingTarget>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn targets(&self) -> &[PingTarget] {
        &self.targets
    }

    /// Run every phase. Never fails: soft failures end up in the report.
    pub async fn run(&self, inputs: &HookInputs, env: &Environment) -> RunReport {
        let mut report = RunReport::start();

        let config = match config::resolve(inputs, env) {
            Phase::Proceed(config) => config,
            Phase::Stop(reason) => return report.finish(reason.into()),
        };

        let location = match sitemap::locate(self.store.as_ref(), &config) {
            Phase::Proceed(location) => location,
            Phase::Stop(reason) => return report.finish(reason.into()),
        };

        // Always the configured path, even when a fallback was found
        let sitemap_url = config.sitemap_url();
        report.sitemap_url = Some(sitemap_url.clone());
        report.sitemap_location = Some(location);

        if self.dry_run {
            for target in &self.targets {
                info!(
                    "[dry run] Would ping {} at {}",
                    target.name,
                    target.ping_url(&sitemap_url)
                );
            }
            return report.finish(RunOutcome::DryRun);
        }

        let notifier = Notifier::new(self.client.clone())
            .with_targets(self.targets.clone())
            .with_fan_out(self.fan_out);
        report.results = notifier.notify(&sitemap_url).await;

        info!("Done pinging search engines");
        report.finish(RunOutcome::Notified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemap_ping_notifier::{PingError, PingFuture, PingOutcome};
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;

    struct MemoryStore {
        files: HashSet<String>,
        probes: Mutex<usize>,
    }

    impl MemoryStore {
        fn with_files(files: &[&str]) -> Self {
            Self {
                files: files.iter().map(|f| f.to_string()).collect(),
                probes: Mutex::new(0),
            }
        }

        fn probes(&self) -> usize {
            *self.probes.lock().unwrap()
        }
    }

    impl SitemapStore for MemoryStore {
        fn exists(&self, _root: &Path, relative: &str) -> bool {
            *self.probes.lock().unwrap() += 1;
            self.files.contains(relative)
        }
    }

    /// Answers from a fixed list of results, in call order.
    struct FakeClient {
        responses: Mutex<Vec<std::result::Result<u16, String>>>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new(responses: Vec<std::result::Result<u16, String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PingClient for FakeClient {
        fn get<'a>(&'a self, url: &'a str) -> PingFuture<'a> {
            Box::pin(async move {
                self.requested.lock().unwrap().push(url.to_string());
                match self.responses.lock().unwrap().pop() {
                    Some(Ok(status)) => Ok(status),
                    Some(Err(message)) => Err(PingError::Transport(message)),
                    None => Ok(200),
                }
            })
        }
    }

    fn inputs(site_url: &str) -> HookInputs {
        HookInputs {
            site_url: Some(site_url.to_string()),
            sitemap_path: None,
            publish_dir: Some("/srv/dist".to_string()),
        }
    }

    #[tokio::test]
    async fn test_unresolved_site_url_touches_nothing() {
        let store = Arc::new(MemoryStore::with_files(&["/sitemap-index.xml"]));
        let client = Arc::new(FakeClient::new(Vec::new()));
        let hook = Hook::new(store.clone(), client.clone());

        let report = hook
            .run(&HookInputs::default(), &Environment::default())
            .await;

        assert_eq!(report.outcome, RunOutcome::Unresolved);
        assert_eq!(store.probes(), 0);
        assert!(client.requested().is_empty());
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_missing_sitemap_makes_no_requests() {
        let store = Arc::new(MemoryStore::with_files(&[]));
        let client = Arc::new(FakeClient::new(Vec::new()));
        let hook = Hook::new(store.clone(), client.clone());

        let report = hook
            .run(&inputs("https://example.com"), &Environment::default())
            .await;

        assert_eq!(
            report.outcome,
            RunOutcome::SitemapMissing {
                configured: "/sitemap-index.xml".to_string()
            }
        );
        assert_eq!(store.probes(), 4);
        assert!(client.requested().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_still_pings_configured_path() {
        let store = Arc::new(MemoryStore::with_files(&["/sitemap.xml"]));
        let client = Arc::new(FakeClient::new(Vec::new()));
        let hook = Hook::new(store, client.clone());

        let report = hook
            .run(&inputs("https://example.com/"), &Environment::default())
            .await;

        assert_eq!(report.outcome, RunOutcome::Notified);
        assert_eq!(
            report.sitemap_location.as_ref().map(|l| l.path()),
            Some("/sitemap.xml")
        );
        assert_eq!(
            report.sitemap_url.as_deref(),
            Some("https://example.com/sitemap-index.xml")
        );
        assert!(
            client
                .requested()
                .iter()
                .all(|url| url.ends_with("sitemap=https%3A%2F%2Fexample.com%2Fsitemap-index.xml"))
        );
    }

    #[tokio::test]
    async fn test_end_to_end_default_targets() {
        let store = Arc::new(MemoryStore::with_files(&["/sitemap-index.xml"]));
        let client = Arc::new(FakeClient::new(Vec::new()));
        let hook = Hook::new(store, client.clone());

        let env = Environment {
            url: Some("https://ignored.example".to_string()),
            publish_dir: None,
        };
        let report = hook.run(&inputs("https://example.com/"), &env).await;

        assert_eq!(report.outcome, RunOutcome::Notified);
        assert_eq!(
            client.requested(),
            vec![
                "https://www.google.com/ping?sitemap=https%3A%2F%2Fexample.com%2Fsitemap-index.xml",
                "https://www.bing.com/ping?sitemap=https%3A%2F%2Fexample.com%2Fsitemap-index.xml",
                "https://yandex.com/ping?sitemap=https%3A%2F%2Fexample.com%2Fsitemap-index.xml",
            ]
        );
    }

    #[tokio::test]
    async fn test_mixed_outcomes_complete_normally() {
        let store = Arc::new(MemoryStore::with_files(&["/sitemap-index.xml"]));
        let client = Arc::new(FakeClient::new(vec![
            Ok(200),
            Ok(404),
            Err("connection refused".to_string()),
        ]));
        let hook = Hook::new(store, client);

        let report = hook
            .run(&inputs("https://example.com"), &Environment::default())
            .await;

        assert_eq!(report.outcome, RunOutcome::Notified);
        let outcomes: Vec<PingOutcome> = report.results.iter().map(|r| r.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                PingOutcome::Success { status: 200 },
                PingOutcome::NonSuccess { status: 404 },
                PingOutcome::TransportError {
                    message: "connection refused".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_dry_run_skips_network() {
        let store = Arc::new(MemoryStore::with_files(&["/sitemap-index.xml"]));
        let client = Arc::new(FakeClient::new(Vec::new()));
        let hook = Hook::new(store, client.clone()).with_dry_run(true);

        let report = hook
            .run(&inputs("https://example.com"), &Environment::default())
            .await;

        assert_eq!(report.outcome, RunOutcome::DryRun);
        assert!(client.requested().is_empty());
        assert!(report.sitemap_url.is_some());
    }

    #[tokio::test]
    async fn test_repeated_runs_classify_identically() {
        let store = Arc::new(MemoryStore::with_files(&["/sitemap.xml"]));
        let hook = Hook::new(store, Arc::new(FakeClient::new(Vec::new())));

        let first = hook
            .run(&inputs("https://example.com"), &Environment::default())
            .await;
        let second = hook
            .run(&inputs("https://example.com"), &Environment::default())
            .await;

        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.sitemap_location, second.sitemap_location);
        assert_eq!(first.counts(), second.counts());
    }

    #[test]
    fn test_options_targets() {
        let options = HookOptions {
            extra_targets: vec!["Staging=http://localhost:9000/ping?sitemap=".to_string()],
            ..Default::default()
        };
        let names: Vec<String> = options.targets().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Google", "Bing", "Yandex", "Staging"]);
    }

    #[test]
    fn test_options_without_any_target_is_invalid() {
        let options = HookOptions {
            include_default_targets: false,
            ..Default::default()
        };
        assert!(matches!(options.targets(), Err(HookError::InvalidInput(_))));
    }

    #[test]
    fn test_options_with_bad_target_is_rejected() {
        let options = HookOptions {
            extra_targets: vec!["nonsense".to_string()],
            ..Default::default()
        };
        assert!(matches!(options.targets(), Err(HookError::Notify(_))));
    }
}
