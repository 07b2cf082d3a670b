//! HTTP error mapping
//!
//! Only the empty-transcript fault is a client error; every other pipeline
//! fault is a 500. Bodies carry a single human-readable `detail`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::application::MinutesError;

/// Shown when the server started without working clients
const DETAIL_SERVICE_UNAVAILABLE: &str = "サーバーのAIモデルが正しく設定されていません。";

/// Shown when no speech was recognized
const DETAIL_EMPTY_TRANSCRIPT: &str = "音声からテキストを抽出出来ませんでした。";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Pipeline fault
    #[error(transparent)]
    Minutes(#[from] MinutesError),

    /// Required form field absent (422)
    #[error("Missing form field '{0}'")]
    MissingField(&'static str),

    /// Malformed or oversized multipart body
    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Minutes(MinutesError::EmptyTranscript) => StatusCode::BAD_REQUEST,
            ApiError::Minutes(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Multipart(err) => err.status(),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Minutes(MinutesError::ServiceUnavailable) => {
                DETAIL_SERVICE_UNAVAILABLE.to_string()
            }
            ApiError::Minutes(MinutesError::EmptyTranscript) => DETAIL_EMPTY_TRANSCRIPT.to_string(),
            ApiError::Minutes(err) => format!("処理中にエラーが発生しました：{}", err),
            ApiError::MissingField(name) => format!("Field '{}' is required", name),
            ApiError::Multipart(err) => err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail() }));
        (self.status(), body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
