use crate::error::Result;
use crate::run::StopReason;
use crate::sitemap::SitemapLocation;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use sitemap_ping_notifier::{PingOutcome, PingResult};

/// How a run ended. Every variant is a successful hook run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    Unresolved,
    SitemapMissing { configured: String },
    DryRun,
    Notified,
}

impl From<StopReason> for RunOutcome {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::Unresolved => Self::Unresolved,
            StopReason::SitemapMissing { configured } => Self::SitemapMissing { configured },
        }
    }
}

/// Per-classification tally of ping results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub succeeded: usize,
    pub non_success: usize,
    pub errored: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub sitemap_url: Option<String>,
    pub sitemap_location: Option<SitemapLocation>,
    pub results: Vec<PingResult>,
}

impl RunReport {
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            outcome: RunOutcome::Notified,
            sitemap_url: None,
            sitemap_location: None,
            results: Vec::new(),
        }
    }

    pub fn finish(mut self, outcome: RunOutcome) -> Self {
        self.outcome = outcome;
        self.finished_at = Utc::now();
        self
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.results
            .iter()
            .fold(OutcomeCounts::default(), |mut counts, result| {
                match result.outcome {
                    PingOutcome::Success { .. } => counts.succeeded += 1,
                    PingOutcome::NonSuccess { .. } => counts.non_success += 1,
                    PingOutcome::TransportError { .. } => counts.errored += 1,
                }
                counts
            })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary for the terminal.
    pub fn render_text(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("{}\n", "━".repeat(60)));

        match &self.outcome {
            RunOutcome::Unresolved => {
                report.push_str(&format!(
                    "{} Skipped: no site URL configured\n",
                    "⚠".yellow().bold()
                ));
            }
            RunOutcome::SitemapMissing { configured } => {
                report.push_str(&format!(
                    "{} Skipped: no sitemap found at {}\n",
                    "⚠".yellow().bold(),
                    configured
                ));
            }
            RunOutcome::DryRun | RunOutcome::Notified => {
                if let Some(url) = &self.sitemap_url {
                    report.push_str(&format!("  Sitemap: {}\n", url.bright_white()));
                }
                if let Some(SitemapLocation::Fallback { path }) = &self.sitemap_location {
                    report.push_str(&format!(
                        "  {} found at fallback {}\n",
                        "→".blue(),
                        path
                    ));
                }
                if self.outcome == RunOutcome::DryRun {
                    report.push_str("  Dry run: no pings sent\n");
                }
            }
        }

        if !self.results.is_empty() {
            report.push('\n');
            for result in &self.results {
                let (marker, status) = match &result.outcome {
                    PingOutcome::Success { status } => {
                        ("✓".green().bold(), status.to_string().green())
                    }
                    PingOutcome::NonSuccess { status } => {
                        ("⚠".yellow().bold(), status.to_string().yellow())
                    }
                    PingOutcome::TransportError { .. } => ("✗".red().bold(), "---".red()),
                };
                report.push_str(&format!(
                    "  {} {} {:<10} {}ms\n",
                    marker,
                    status,
                    result.target.name,
                    result.response_time.as_millis()
                ));
                if let PingOutcome::TransportError { message } = &result.outcome {
                    report.push_str(&format!("        {}\n", message.dimmed()));
                }
            }

            let counts = self.counts();
            report.push_str(&format!(
                "\n  {} succeeded, {} non-success, {} failed\n",
                counts.succeeded, counts.non_success, counts.errored
            ));
        }

        report
    }
}
