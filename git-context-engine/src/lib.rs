//! GitHub-side collaborator of the Phase A pipeline.
//!
//! Fetches a pull request's unified diff, pins a content provider to the PR
//! head commit and hands both to the `phase-a` orchestrator.

pub mod content;
pub mod errors;
pub mod git_providers;

use phase_a::{PhaseAOrchestrator, PhaseAResult};
use serde::Serialize;
use tracing::{debug, info};

pub use crate::content::GitHubContentProvider;
pub use crate::errors::{GitContextEngineError, GitContextEngineResult};
use crate::git_providers::{ChangeRequestId, github::GitHubClient};

/// Phase A output for one pull request at one head commit.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestAnalysis {
    pub id: ChangeRequestId,
    pub head_sha: String,
    pub result: PhaseAResult,
}

/// Runs Phase A for a single pull request.
///
/// `client` is built once by the caller and cloned per run, so every run
/// shares one connection pool. When `head_sha` is `None` the current PR head
/// is resolved first. Only the diff download and metadata lookup can fail;
/// per-file content failures are absorbed by the orchestrator.
pub async fn run_phase_a_for_pull(
    client: &GitHubClient,
    id: ChangeRequestId,
    head_sha: Option<String>,
    orchestrator: &PhaseAOrchestrator,
) -> GitContextEngineResult<PullRequestAnalysis> {
    info!(project = %id.project, iid = id.iid, "phase_a for pull request started");

    let head_sha = match head_sha.filter(|s| !s.trim().is_empty()) {
        Some(sha) => sha,
        None => {
            let meta = client.get_meta(&id).await?;
            debug!(head_sha = %meta.head_sha, state = %meta.state, "resolved PR head");
            meta.head_sha
        }
    };

    let diff = client.fetch_pr_diff(&id).await?;
    let provider = GitHubContentProvider::new(client.clone(), id.clone(), head_sha.clone());
    let result = orchestrator.run(&diff, &provider).await;

    info!(
        project = %id.project,
        iid = id.iid,
        head_sha = %head_sha,
        files = result.file_diffs.len(),
        "phase_a for pull request finished"
    );

    Ok(PullRequestAnalysis {
        id,
        head_sha,
        result,
    })
}
