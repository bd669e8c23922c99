use serde::Deserialize;

/// Request body for running Phase A on a GitHub pull request.
#[derive(Debug, Deserialize)]
pub struct PhaseAGithubRequest {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    /// Commit to read file contents at; the PR head when omitted.
    #[serde(default)]
    pub head_sha: Option<String>,
    /// Shared secret used to protect the endpoint from unauthorized calls.
    #[serde(default)]
    pub secret: Option<String>,
}
