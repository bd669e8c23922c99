//! GitHub provider (REST v3) for PR metadata, diffs and file contents.
//!
//! Endpoints used:
//!   * GET /repos/{owner}/{repo}/pulls/{number}            (json)
//!   * GET /repos/{owner}/{repo}/pulls/{number}            (v3.diff)
//!   * GET /repos/{owner}/{repo}/contents/{path}?ref={ref} (v3.raw)

use crate::errors::{GitContextEngineError, GitContextEngineProviderError, GitContextEngineResult};
use crate::git_providers::ProviderConfig;
use crate::git_providers::types::*;
use reqwest::{Client, Response, header::HeaderMap};
use serde::Deserialize;
use tracing::debug;

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
    auth: String,     // "Bearer <token>"
}

impl GitHubClient {
    /// Constructs a GitHub client with a shared HTTP instance and auth token.
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        debug!("Creating GitHubClient with base_api={}", base_api);
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            auth: format!("Bearer {token}"),
        }
    }

    /// Builds the HTTP client once; clones share its connection pool.
    pub fn from_config(cfg: ProviderConfig) -> GitContextEngineResult<Self> {
        cfg.validate()?;
        let http = Client::builder()
            .user_agent("reviewflow-worker/0.1")
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self::new(http, cfg.base_api, cfg.token))
    }

    pub fn base_api(&self) -> &str {
        &self.base_api
    }

    /// Fetches PR state and head commit.
    pub async fn get_meta(&self, id: &ChangeRequestId) -> GitContextEngineResult<ChangeRequest> {
        let (owner, repo) = split_owner_repo(&id.project)?;
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, owner, repo, id.iid
        );
        debug!("GitHub get_meta: {}", url);

        let resp = self
            .http
            .get(url)
            .header("Authorization", &self.auth)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        let pr: GitHubPr = ensure_success(resp)?.json().await?;

        Ok(ChangeRequest {
            id: id.clone(),
            state: pr.state,
            head_sha: pr.head.sha,
        })
    }

    /// Fetches the whole PR as one unified diff text blob.
    pub async fn fetch_pr_diff(&self, id: &ChangeRequestId) -> GitContextEngineResult<String> {
        let (owner, repo) = split_owner_repo(&id.project)?;
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, owner, repo, id.iid
        );
        debug!("GitHub fetch_pr_diff: {}", url);

        let resp = self
            .http
            .get(url)
            .header("Authorization", &self.auth)
            .header("Accept", "application/vnd.github.v3.diff")
            .send()
            .await?;
        let text = ensure_success(resp)?.text().await?;

        debug!(bytes = text.len(), "GitHub diff received");
        Ok(text)
    }

    /// Fetches raw file bytes at a specific ref in the repository.
    ///
    /// Returns `Ok(Some(bytes))` on success, `Ok(None)` if the file does not
    /// exist at the given ref (404).
    pub async fn get_file_raw(
        &self,
        id: &ChangeRequestId,
        repo_relative_path: &str,
        git_ref: &str,
    ) -> GitContextEngineResult<Option<Vec<u8>>> {
        let (owner, repo) = split_owner_repo(&id.project)?;
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_api,
            owner,
            repo,
            encode_path(repo_relative_path)
        );
        debug!("GitHub get_file_raw: url={}, ref={}", url, git_ref);

        let resp = self
            .http
            .get(url)
            .query(&[("ref", git_ref)])
            .header("Authorization", &self.auth)
            .header("Accept", "application/vnd.github.v3.raw")
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            debug!("GitHub file not found at given ref");
            return Ok(None);
        }

        let bytes = ensure_success(resp)?.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }
}

/// Turns a non-2xx response into a provider error, keeping the
/// `Retry-After` hint GitHub sends with rate-limit responses.
fn ensure_success(resp: Response) -> GitContextEngineResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let retry_after = retry_after_secs(resp.headers());
    debug!(status = status.as_u16(), ?retry_after, "GitHub request failed");
    Err(GitContextEngineProviderError::from_status_with_retry(status.as_u16(), retry_after).into())
}

/// `Retry-After` in delta-seconds form; HTTP-date values are ignored.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Splits "owner/repo" into components or returns a validation error.
fn split_owner_repo(project: &str) -> GitContextEngineResult<(String, String)> {
    let mut parts = project.split('/');
    let owner = parts.next().unwrap_or("").trim();
    let repo = parts.next().unwrap_or("").trim();

    if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
        return Err(GitContextEngineError::Validation(format!(
            "invalid GitHub project id '{}', expected 'owner/repo'",
            project
        )));
    }

    Ok((owner.to_string(), repo.to_string()))
}

/// Percent-encodes each path segment, keeping `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// GitHub PR response (subset).
#[derive(Debug, Deserialize)]
struct GitHubPr {
    state: String,
    head: GitHubRef,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    sha: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_repo_must_have_two_parts() {
        assert_eq!(
            split_owner_repo("octo/hello").unwrap(),
            ("octo".to_string(), "hello".to_string())
        );
        assert!(split_owner_repo("octo").is_err());
        assert!(split_owner_repo("octo/").is_err());
        assert!(split_owner_repo("a/b/c").is_err());
    }

    #[test]
    fn path_segments_are_encoded() {
        assert_eq!(encode_path("src/app.py"), "src/app.py");
        assert_eq!(encode_path("docs/my file#1.md"), "docs/my%20file%231.md");
    }

    #[test]
    fn pr_payload_subset_deserializes() {
        let json = r#"{
            "title": "Add handler",
            "state": "open",
            "html_url": "https://github.com/octo/hello/pull/7",
            "created_at": "2025-01-02T03:04:05Z",
            "updated_at": "2025-01-02T03:04:06Z",
            "base": { "ref": "main", "sha": "aaa" },
            "head": { "ref": "feature", "sha": "bbb", "label": "octo:feature" },
            "user": { "login": "octo" }
        }"#;
        let pr: GitHubPr = serde_json::from_str(json).unwrap();
        assert_eq!(pr.head.sha, "bbb");
        assert_eq!(pr.state, "open");
    }

    #[test]
    fn retry_after_header_is_read_in_seconds() {
        use reqwest::header::{HeaderValue, RETRY_AFTER};

        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("60"));
        assert_eq!(retry_after_secs(&headers), Some(60));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_secs(&headers), None);
    }

    #[test]
    fn base_api_trailing_slash_is_trimmed() {
        let c = GitHubClient::new(Client::new(), "https://api.github.com/".into(), "t".into());
        assert_eq!(c.base_api, "https://api.github.com");
        assert_eq!(c.auth, "Bearer t");
    }
}
