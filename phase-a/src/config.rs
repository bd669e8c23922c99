//! Runtime configuration for a Phase A run.

use crate::errors::{PhaseAError, Result};
use crate::risk::RiskThresholds;

/// Tunables of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAConfig {
    /// Maximum number of file contents fetched at once.
    pub fetch_concurrency: usize,
    pub thresholds: RiskThresholds,
}

impl Default for PhaseAConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: 4,
            thresholds: RiskThresholds::default(),
        }
    }
}

impl PhaseAConfig {
    /// Reads `PHASE_A_FETCH_CONCURRENCY` and `PHASE_A_HIGH_RISK_LINES`,
    /// falling back to defaults when unset.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(v) = read_usize("PHASE_A_FETCH_CONCURRENCY")? {
            cfg.fetch_concurrency = v;
        }
        if let Some(v) = read_usize("PHASE_A_HIGH_RISK_LINES")? {
            cfg.thresholds.high_risk_changed_lines = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch_concurrency == 0 {
            return Err(PhaseAError::Config("fetch_concurrency must be > 0".into()));
        }
        Ok(())
    }
}

fn read_usize(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(|_| {
            PhaseAError::Config(format!("{name} must be an unsigned integer, got '{raw}'"))
        }),
        _ => Ok(None),
    }
}
