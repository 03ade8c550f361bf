use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use markerscan::DetectError;
use serde_json::json;

/// Request failures, rendered as `{"detail": "..."}` with a matching status.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("No file provided")]
    MissingFile,

    #[error("File too large. Maximum size: {}", format_limit(*max_bytes))]
    TooLarge { max_bytes: usize },

    #[error("Unsupported file format: {extension}. Supported formats: {supported}")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },

    #[error("Invalid content type: {0}. Expected image file.")]
    InvalidContentType(String),

    #[error("Invalid multipart upload: {1}")]
    Multipart(StatusCode, String),

    #[error("Could not decode image: {0}")]
    Decode(#[source] DetectError),

    #[error("Error processing image: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::UnsupportedFormat { .. }
            | ApiError::InvalidContentType(_)
            | ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Multipart(status, _) => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `10MB` for whole mebibytes, otherwise the exact byte count.
fn format_limit(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

impl From<DetectError> for ApiError {
    fn from(err: DetectError) -> Self {
        ApiError::Decode(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err.status(), err.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Multipart(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_failure_kind() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::TooLarge { max_bytes: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::Internal("join".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn size_limit_wording() {
        let ten_mib = 10 * 1024 * 1024;
        assert_eq!(
            ApiError::TooLarge { max_bytes: ten_mib }.to_string(),
            "File too large. Maximum size: 10MB"
        );
        assert_eq!(
            ApiError::TooLarge { max_bytes: 2048 }.to_string(),
            "File too large. Maximum size: 2048 bytes"
        );
    }

    #[test]
    fn decode_failures_are_client_errors() {
        let err = markerscan::decode_image(b"nope").unwrap_err();
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert!(api.to_string().starts_with("Could not decode image"));
    }
}
