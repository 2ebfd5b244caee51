use thiserror::Error;

#[derive(Error, Debug)]
pub enum PingError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid target '{0}': expected NAME=URL")]
    InvalidTarget(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PingError>;
