use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use git_context_engine::{
    PullRequestAnalysis, git_providers::ChangeRequestId, run_phase_a_for_pull,
};
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiErrorDetail, ApiResponse},
    },
    error_handler::{AppError, AppResult},
    routes::phase_a_github::phase_a_github_request::PhaseAGithubRequest,
};

/// POST /phase_a/github
///
/// Fetches the pull request diff and changed files at `head_sha` from GitHub
/// and returns the Phase A result.
#[instrument(name = "phase_a_github_route", skip_all)]
pub async fn phase_a_github_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PhaseAGithubRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<PullRequestAnalysis>>> {
    let Json(body) = payload?;

    // --- Validate shared secret -------------------------------------------------
    if !secret_matches(&state.trigger_secret, body.secret.as_deref()) {
        warn!(owner = %body.owner, repo = %body.repo, "rejected: secret mismatch");
        return Err(AppError::Unauthorized);
    }

    let Some(client) = state.github.as_ref() else {
        return Err(AppError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "GITHUB_NOT_CONFIGURED",
            message: "GitHub access is not configured on the server (GITHUB_TOKEN).".into(),
        });
    };

    let blank: Vec<ApiErrorDetail> = [("owner", &body.owner), ("repo", &body.repo)]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| ApiErrorDetail::new(field, "must not be blank"))
        .collect();
    if !blank.is_empty() {
        return Err(AppError::BadRequest {
            message: "owner and repo are required".into(),
            details: blank,
        });
    }

    let id = ChangeRequestId::new(body.owner.trim(), body.repo.trim(), body.pr_number);
    info!(project = %id.project, iid = id.iid, "phase_a for pull request requested");

    let analysis = run_phase_a_for_pull(client, id, body.head_sha, &state.orchestrator).await?;

    Ok(Json(ApiResponse::success(analysis)))
}

/// An empty configured secret disables the check. Comparison is constant-time
/// over the trimmed bytes.
fn secret_matches(expected: &str, provided: Option<&str>) -> bool {
    let expected = expected.trim();
    if expected.is_empty() {
        return true;
    }
    let provided = provided.map(str::trim).unwrap_or_default();
    bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
}

#[cfg(test)]
mod tests {
    use git_context_engine::git_providers::{ProviderConfig, github::GitHubClient};
    use phase_a::PhaseAOrchestrator;

    use super::*;

    fn request(secret: Option<&str>) -> PhaseAGithubRequest {
        PhaseAGithubRequest {
            owner: "octo".into(),
            repo: "hello".into(),
            pr_number: 7,
            head_sha: None,
            secret: secret.map(String::from),
        }
    }

    fn client() -> GitHubClient {
        GitHubClient::from_config(ProviderConfig::new("https://api.github.com", "tok")).unwrap()
    }

    fn state(github: Option<GitHubClient>, secret: &str) -> Arc<AppState> {
        Arc::new(AppState {
            github,
            trigger_secret: secret.into(),
            orchestrator: PhaseAOrchestrator::default(),
        })
    }

    #[tokio::test]
    async fn wrong_secret_is_unauthorized() {
        let st = state(Some(client()), "s3cret");
        let err = phase_a_github_route(State(st.clone()), Ok(Json(request(Some("nope")))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let err = phase_a_github_route(State(st), Ok(Json(request(None))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn missing_github_config_is_unavailable() {
        let err = phase_a_github_route(State(state(None, "")), Ok(Json(request(None))))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), "GITHUB_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn blank_owner_is_bad_request() {
        let mut req = request(Some("s"));
        req.owner = "  ".into();
        req.repo = String::new();
        let st = state(Some(client()), "s");
        let err = phase_a_github_route(State(st), Ok(Json(req)))
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest { details, .. } => {
                let fields: Vec<_> = details.iter().map(|d| d.path.as_str()).collect();
                assert_eq!(fields, ["owner", "repo"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn secret_check() {
        assert!(secret_matches("", None));
        assert!(secret_matches("  ", Some("anything")));
        assert!(secret_matches("s3cret", Some(" s3cret ")));
        assert!(!secret_matches("s3cret", Some("s3cre")));
        assert!(!secret_matches("s3cret", Some("s3cret!")));
        assert!(!secret_matches("s3cret", None));
    }
}
