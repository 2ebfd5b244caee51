use crate::target::PingTarget;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// How a single ping ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PingOutcome {
    /// Status below 300.
    Success { status: u16 },
    /// Status of 300 or above. Recorded, not escalated.
    NonSuccess { status: u16 },
    /// No HTTP response at all.
    TransportError { message: String },
}

impl PingOutcome {
    pub fn from_status(status: u16) -> Self {
        if status < 300 {
            Self::Success { status }
        } else {
            Self::NonSuccess { status }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status } | Self::NonSuccess { status } => Some(*status),
            Self::TransportError { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PingResult {
    pub target: PingTarget,
    pub url: String,
    pub outcome: PingOutcome,
    pub response_time: Duration,
}

impl PingResult {
    pub fn new(target: PingTarget, url: String, outcome: PingOutcome) -> Self {
        Self {
            target,
            url,
            outcome,
            response_time: Duration::from_secs(0),
        }
    }

    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }

    /// One human-readable line describing the outcome.
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            PingOutcome::Success { .. } => format!("✓ Pinged {}", self.target.name),
            PingOutcome::NonSuccess { status } => {
                format!("{} responded with status {}", self.target.name, status)
            }
            PingOutcome::TransportError { message } => {
                format!("Failed to ping {}: {}", self.target.name, message)
            }
        }
    }

    /// Emit the outcome line at the level matching its classification.
    pub fn log(&self) {
        if self.outcome.is_success() {
            info!("{}", self.summary_line());
        } else {
            warn!("{}", self.summary_line());
        }
    }
}
