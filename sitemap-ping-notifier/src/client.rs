use crate::error::{PingError, Result};
use reqwest::Client;
use std::error::Error as _;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Boxed future returned by [`PingClient::get`], keeping the trait dyn-compatible.
pub type PingFuture<'a> = Pin<Box<dyn Future<Output = Result<u16>> + Send + 'a>>;

/// Issues a single unauthenticated GET and reports the HTTP status code.
///
/// A response of any status is `Ok`; only transport-level failures (DNS,
/// refused connections, TLS, timeouts) are `Err`.
pub trait PingClient: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> PingFuture<'a>;
}

/// [`PingClient`] backed by `reqwest`.
pub struct HttpPinger {
    client: Client,
}

impl HttpPinger {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let timeout_secs = timeout_secs.max(1);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl PingClient for HttpPinger {
    fn get<'a>(&'a self, url: &'a str) -> PingFuture<'a> {
        Box::pin(async move {
            debug!("GET {}", url);
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| PingError::Transport(describe(&e)))?;
            Ok(response.status().as_u16())
        })
    }
}

/// Flatten a reqwest error and its sources into one line.
///
/// reqwest's own message ("error sending request for url ...") hides the
/// actual cause (refused, DNS, TLS) in the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
