use crate::config::RunConfig;
use crate::run::{Phase, StopReason};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Paths probed, in order, when the configured sitemap is missing.
pub const FALLBACK_SITEMAP_PATHS: [&str; 3] = ["/sitemap.xml", "/sitemap-index.xml", "/sitemap-0.xml"];

/// Answers "does this file exist under the build output?".
pub trait SitemapStore: Send + Sync {
    fn exists(&self, root: &Path, relative: &str) -> bool;
}

/// [`SitemapStore`] over the local filesystem.
///
/// Existence only: any entry at the path counts, a directory included. The
/// publish directory itself is never a sitemap.
pub struct LocalStore;

impl SitemapStore for LocalStore {
    fn exists(&self, root: &Path, relative: &str) -> bool {
        let relative = relative.trim_start_matches('/');
        !relative.is_empty() && root.join(relative).exists()
    }
}

/// Which sitemap file was found in the build output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SitemapLocation {
    Configured { path: String },
    Fallback { path: String },
}

impl SitemapLocation {
    pub fn path(&self) -> &str {
        match self {
            Self::Configured { path } | Self::Fallback { path } => path,
        }
    }
}

/// Check the configured sitemap path, then each fallback in order.
///
/// A fallback hit is only reported; the ping URL is still built from the
/// configured path.
pub fn locate(store: &dyn SitemapStore, config: &RunConfig) -> Phase<SitemapLocation> {
    let root = config.publish_dir.as_path();
    let configured = config.sitemap_path.as_str();

    debug!("Looking for {} in {}", configured, root.display());
    if store.exists(root, configured) {
        return Phase::Proceed(SitemapLocation::Configured {
            path: configured.to_string(),
        });
    }

    if let Some(fallback) = FALLBACK_SITEMAP_PATHS
        .iter()
        .find(|candidate| store.exists(root, candidate))
    {
        info!(
            "Sitemap not found at {}, found {} instead",
            configured, fallback
        );
        return Phase::Proceed(SitemapLocation::Fallback {
            path: fallback.to_string(),
        });
    }

    warn!(
        "No sitemap found at {} in {}. Skipping search engine ping.",
        configured,
        root.display()
    );
    Phase::Stop(StopReason::SitemapMissing {
        configured: configured.to_string(),
    })
}
