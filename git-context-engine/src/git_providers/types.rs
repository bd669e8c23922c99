//! Data model for pull requests as seen by Phase A.

use serde::{Deserialize, Serialize};

/// A unique reference to a pull request.
///
/// * `project` – "owner/repo".
/// * `iid`     – pull request number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeRequestId {
    pub project: String,
    pub iid: u64,
}

impl ChangeRequestId {
    pub fn new(owner: &str, repo: &str, number: u64) -> Self {
        Self {
            project: format!("{owner}/{repo}"),
            iid: number,
        }
    }
}

/// Pull request metadata Phase A reads before fetching content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: ChangeRequestId,
    /// "open" / "closed".
    pub state: String,
    /// Commit the PR currently points at.
    pub head_sha: String,
}
