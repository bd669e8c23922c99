use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body of every API response: `data` on success, `error` otherwise.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Machine-readable code, e.g. "GITHUB_NOT_CONFIGURED".
    pub code: &'static str,
    pub message: String,
    /// Which parts of the request were rejected; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

/// One rejected part of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorDetail {
    /// Request field (`owner`, `repo`) or `body` for the payload as a whole.
    pub path: String,
    pub hint: String,
}

impl ApiErrorDetail {
    pub fn new(path: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hint: hint.into(),
        }
    }
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(
        code: &'static str,
        message: impl Into<String>,
        details: Vec<ApiErrorDetail>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details,
            }),
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_lists_rejected_fields() {
        let body = ApiResponse::<()>::error(
            "BAD_REQUEST",
            "owner and repo are required",
            vec![ApiErrorDetail::new("repo", "must not be blank")],
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["details"][0]["path"], "repo");
        assert_eq!(json["error"]["details"][0]["hint"], "must not be blank");
    }

    #[test]
    fn empty_details_are_omitted() {
        let json = serde_json::to_value(ApiResponse::<()>::error("X", "m", Vec::new())).unwrap();
        assert!(json["error"].get("details").is_none());
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert!(ok.get("error").is_none());
    }
}
