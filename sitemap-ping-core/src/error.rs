use sitemap_ping_notifier::PingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Notifier setup failed: {0}")]
    Notify(#[from] PingError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;
