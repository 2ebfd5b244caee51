pub mod config;
pub mod error;
pub mod report;
pub mod run;
pub mod sitemap;

pub use config::{Environment, HookInputs, RunConfig};
pub use error::HookError;
pub use report::{RunOutcome, RunReport};
pub use run::{Hook, HookOptions, Phase, StopReason};
pub use sitemap::{LocalStore, SitemapLocation, SitemapStore};
