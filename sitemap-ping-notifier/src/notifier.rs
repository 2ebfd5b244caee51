use crate::client::PingClient;
use crate::error::PingError;
use crate::result::{PingOutcome, PingResult};
use crate::target::PingTarget;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// How the targets are pinged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One at a time, in table order.
    #[default]
    Sequential,
    /// One task per target, all joined before returning.
    Concurrent,
}

/// Pings every target with a sitemap URL. Individual failures never abort
/// the remaining targets, and results always come back in target order.
pub struct Notifier {
    client: Arc<dyn PingClient>,
    targets: Vec<PingTarget>,
    fan_out: FanOut,
}

impl Notifier {
    pub fn new(client: Arc<dyn PingClient>) -> Self {
        Self {
            client,
            targets: PingTarget::defaults(),
            fan_out: FanOut::Sequential,
        }
    }

    pub fn with_targets(mut self, targets: Vec<PingTarget>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn targets(&self) -> &[PingTarget] {
        &self.targets
    }

    pub async fn notify(&self, sitemap_url: &str) -> Vec<PingResult> {
        info!(
            "Pinging {} search engine(s) with {}",
            self.targets.len(),
            sitemap_url
        );

        match self.fan_out {
            FanOut::Sequential => {
                let mut results = Vec::with_capacity(self.targets.len());
                for target in &self.targets {
                    results.push(
                        Self::ping_target(self.client.as_ref(), target.clone(), sitemap_url).await,
                    );
                }
                results
            }
            FanOut::Concurrent => self.notify_concurrently(sitemap_url).await,
        }
    }

    async fn notify_concurrently(&self, sitemap_url: &str) -> Vec<PingResult> {
        let handles: Vec<_> = self
            .targets
            .iter()
            .cloned()
            .map(|target| {
                let client = self.client.clone();
                let sitemap_url = sitemap_url.to_string();
                tokio::spawn(async move {
                    Self::ping_target(client.as_ref(), target, &sitemap_url).await
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(&self.targets)
            .map(|(joined, target)| match joined.map_err(PingError::from) {
                Ok(result) => result,
                Err(e) => {
                    // The ping task itself died; record it like any transport failure
                    let result = PingResult::new(
                        target.clone(),
                        target.ping_url(sitemap_url),
                        PingOutcome::TransportError {
                            message: e.to_string(),
                        },
                    );
                    result.log();
                    result
                }
            })
            .collect()
    }

    async fn ping_target(
        client: &dyn PingClient,
        target: PingTarget,
        sitemap_url: &str,
    ) -> PingResult {
        let url = target.ping_url(sitemap_url);
        debug!("Pinging {} at {}", target.name, url);

        let start = Instant::now();
        let outcome = match client.get(&url).await {
            Ok(status) => PingOutcome::from_status(status),
            Err(PingError::Transport(message)) => PingOutcome::TransportError { message },
            Err(e) => PingOutcome::TransportError {
                message: e.to_string(),
            },
        };

        let result = PingResult::new(target, url, outcome).with_response_time(start.elapsed());
        result.log();
        result
    }
}
