//! GitHub provider facade.
//!
//! Phase A only needs three reads from the provider: PR metadata (for the
//! head SHA), the PR's unified diff, and raw file contents at a ref.

pub mod types;
pub use types::*;

pub mod github;

use std::time::Duration;

use crate::errors::{GitContextEngineConfigError, GitContextEngineResult};

/// Runtime configuration for the GitHub client.
///
/// Usually injected from environment (`GITHUB_API_BASE`, `GITHUB_TOKEN`).
/// The token is an opaque installation or personal access token.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. "https://api.github.com".
    pub base_api: String,
    /// Access token for the provider.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ProviderConfig {
    pub const DEFAULT_BASE_API: &'static str = "https://api.github.com";

    pub fn new(base_api: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_api: base_api.into(),
            token: token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Loads `GITHUB_API_BASE` (optional) and `GITHUB_TOKEN` (required).
    pub fn from_env() -> GitContextEngineResult<Self> {
        let base_api = std::env::var("GITHUB_API_BASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_API.to_string());
        let token = std::env::var("GITHUB_TOKEN").unwrap_or_default();

        let cfg = Self::new(base_api, token);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> GitContextEngineResult<()> {
        if self.token.trim().is_empty() {
            return Err(GitContextEngineConfigError::MissingToken.into());
        }
        let base = self.base_api.trim();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(GitContextEngineConfigError::InvalidBaseUrl(self.base_api.clone()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitContextEngineError;

    #[test]
    fn validate_requires_token_and_http_base() {
        assert!(ProviderConfig::new("https://api.github.com", "tok").validate().is_ok());
        assert!(matches!(
            ProviderConfig::new("https://api.github.com", " ").validate(),
            Err(GitContextEngineError::Config(
                GitContextEngineConfigError::MissingToken
            ))
        ));
        assert!(matches!(
            ProviderConfig::new("api.github.com", "tok").validate(),
            Err(GitContextEngineError::Config(
                GitContextEngineConfigError::InvalidBaseUrl(_)
            ))
        ));
    }
}
