//! `ContentProvider` over the GitHub contents API, pinned to one ref.

use phase_a::{ContentProvider, FetchOutcome};
use tracing::debug;

use crate::errors::GitContextEngineResult;
use crate::git_providers::{ChangeRequestId, github::GitHubClient};

/// Reads changed files of one pull request at a fixed commit.
#[derive(Debug, Clone)]
pub struct GitHubContentProvider {
    client: GitHubClient,
    id: ChangeRequestId,
    git_ref: String,
}

impl GitHubContentProvider {
    pub fn new(client: GitHubClient, id: ChangeRequestId, git_ref: impl Into<String>) -> Self {
        Self {
            client,
            id,
            git_ref: git_ref.into(),
        }
    }
}

impl ContentProvider for GitHubContentProvider {
    async fn fetch_content(&self, path: &str) -> FetchOutcome {
        let fetched = self
            .client
            .get_file_raw(&self.id, path, &self.git_ref)
            .await;
        debug!(path, git_ref = %self.git_ref, ok = fetched.is_ok(), "content fetched");
        outcome_from_fetch(fetched)
    }
}

/// Folds a raw fetch into the three-way outcome the orchestrator expects.
fn outcome_from_fetch(fetched: GitContextEngineResult<Option<Vec<u8>>>) -> FetchOutcome {
    match fetched {
        Ok(Some(bytes)) => match String::from_utf8(bytes) {
            Ok(text) => FetchOutcome::Found(text),
            Err(_) => FetchOutcome::Failed("content is not valid UTF-8".into()),
        },
        Ok(None) => FetchOutcome::NotFound,
        Err(e) => FetchOutcome::Failed(e.to_string()),
    }
}
