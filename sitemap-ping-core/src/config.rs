//! Run configuration: where the site lives and where its sitemap should be.

use crate::run::{Phase, StopReason};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_SITEMAP_PATH: &str = "/sitemap-index.xml";

/// Environment variable the orchestrator fills with the deployed site URL.
pub const SITE_URL_ENV: &str = "URL";

/// Environment variable naming the build output directory.
pub const PUBLISH_DIR_ENV: &str = "PUBLISH_DIR";

/// Values supplied by the build orchestrator's plugin configuration.
#[derive(Debug, Clone, Default)]
pub struct HookInputs {
    pub site_url: Option<String>,
    pub sitemap_path: Option<String>,
    pub publish_dir: Option<String>,
}

/// Snapshot of the environment variables the hook reads.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub url: Option<String>,
    pub publish_dir: Option<String>,
}

impl Environment {
    /// Read the relevant variables from the process environment.
    pub fn capture() -> Self {
        Self {
            url: std::env::var(SITE_URL_ENV).ok(),
            publish_dir: std::env::var(PUBLISH_DIR_ENV).ok(),
        }
    }
}

/// Resolved configuration for a single run. Never changes once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Absolute site URL without a trailing slash.
    pub site_url: String,
    /// Sitemap path relative to the site root, always starting with `/`.
    pub sitemap_path: String,
    pub publish_dir: PathBuf,
}

impl RunConfig {
    /// Public URL of the configured sitemap.
    pub fn sitemap_url(&self) -> String {
        format!("{}{}", self.site_url, self.sitemap_path)
    }
}

/// Build the run configuration, or stop if no site URL can be found.
pub fn resolve(inputs: &HookInputs, env: &Environment) -> Phase<RunConfig> {
    let Some(site_url) = resolve_site_url(inputs.site_url.as_deref(), env.url.as_deref()) else {
        warn!(
            "No site URL configured. Set the siteUrl input (--site-url) or the {} environment \
             variable. Skipping search engine ping.",
            SITE_URL_ENV
        );
        return Phase::Stop(StopReason::Unresolved);
    };

    if Url::parse(&site_url).is_err() {
        warn!("Site URL '{}' is not an absolute URL", site_url);
    }

    let config = RunConfig {
        site_url,
        sitemap_path: normalize_sitemap_path(inputs.sitemap_path.as_deref()),
        publish_dir: resolve_publish_dir(inputs.publish_dir.as_deref(), env.publish_dir.as_deref()),
    };
    debug!("Resolved configuration: {:?}", config);

    Phase::Proceed(config)
}

/// Explicit input first, then the environment. Trailing slashes are removed.
pub fn resolve_site_url(input: Option<&str>, env_url: Option<&str>) -> Option<String> {
    first_non_empty(input, env_url)
        .map(|url| url.trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
}

pub fn normalize_sitemap_path(input: Option<&str>) -> String {
    match input.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) if path.starts_with('/') => path.to_string(),
        Some(path) => format!("/{}", path),
        None => DEFAULT_SITEMAP_PATH.to_string(),
    }
}

pub fn resolve_publish_dir(input: Option<&str>, env_dir: Option<&str>) -> PathBuf {
    first_non_empty(input, env_dir)
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn first_non_empty<'a>(primary: Option<&'a str>, fallback: Option<&'a str>) -> Option<&'a str> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}
