use git_context_engine::git_providers::{ProviderConfig, github::GitHubClient};
use phase_a::{PhaseAConfig, PhaseAOrchestrator};
use tracing::{info, warn};

use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// GitHub client shared by all requests; `None` disables the pull-request route.
    pub github: Option<GitHubClient>,
    /// Shared secret for the pull-request route; empty disables the check.
    pub trigger_secret: String,
    /// Phase A pipeline (stateless between runs, safe to share).
    pub orchestrator: PhaseAOrchestrator,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let github = match ProviderConfig::from_env().and_then(GitHubClient::from_config) {
            Ok(client) => {
                info!(base_api = %client.base_api(), "GitHub provider configured");
                Some(client)
            }
            Err(err) => {
                warn!(error = %err, "GitHub provider disabled");
                None
            }
        };

        let phase_a = PhaseAConfig::from_env()?;
        info!(
            fetch_concurrency = phase_a.fetch_concurrency,
            high_risk_lines = phase_a.thresholds.high_risk_changed_lines,
            "phase_a configured"
        );

        Ok(Self {
            github,
            trigger_secret: std::env::var("TRIGGER_SECRET").unwrap_or_default(),
            orchestrator: PhaseAOrchestrator::new(phase_a),
        })
    }
}
