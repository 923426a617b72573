//! 统一的请求错误类型与 HTML 响应转换。

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use crate::render::{Fragment, render};
use crate::validate::UploadError;

pub(crate) const GENERIC_FAILURE: &str = "An error occurred during upload. Please try again.";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Policy(UploadError),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => failure(StatusCode::BAD_REQUEST, "Error", &msg),
            ApiError::Policy(err) => {
                failure(StatusCode::BAD_REQUEST, err.title(), &err.user_message())
            }
            ApiError::NotFound(msg) => failure(StatusCode::NOT_FOUND, "Not Found", &msg),
            ApiError::Internal(detail) => {
                error!(error = %detail, "upload failed");
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Error", GENERIC_FAILURE)
            }
        }
    }
}

fn failure(status: StatusCode, title: &str, message: &str) -> Response {
    (status, Html(render(&Fragment::Failure { title, message }))).into_response()
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        ApiError::Policy(error)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::Internal(error.to_string())
    }
}

/// multipart 读取错误：超出请求体上限视为文件过大，其余为请求格式错误。
pub fn from_multipart(error: MultipartError, limit: u64) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::Policy(UploadError::FileTooLarge { limit });
    }
    ApiError::BadRequest(format!("Malformed upload request: {}", error.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response =
            ApiError::Internal("disk quota exceeded at /srv/uploads".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert!(body.contains(GENERIC_FAILURE));
        assert!(!body.contains("/srv/uploads"));
    }

    #[tokio::test]
    async fn policy_error_uses_policy_title() {
        let response = ApiError::from(UploadError::InvalidFileType).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert!(body.contains("Invalid File Type"));
        assert!(body.contains("Only PDF, JPG, and PNG files are allowed."));
    }
}
