use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_shortener::{ErrorKind, ServiceError};

use crate::model::{ApiResponse, ApiStatus};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    EmptyBody,
    MalformedBody(serde_json::Error),
    MissingUrl,
    /// A failed save; internal failures read "failed to add url".
    Save(ServiceError),
    /// A failed lookup; internal failures read "failed to find url".
    Resolve(ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status, message) = match self {
            AppError::EmptyBody => (StatusCode::BAD_REQUEST, ApiStatus::Error, "empty request"),
            AppError::MalformedBody(_) => (
                StatusCode::BAD_REQUEST,
                ApiStatus::Error,
                "failed to decode request",
            ),
            AppError::MissingUrl => (
                StatusCode::BAD_REQUEST,
                ApiStatus::BadRequest,
                "field url is a required field",
            ),
            AppError::Save(err) => match err.kind() {
                ErrorKind::InvalidUrl => (
                    StatusCode::BAD_REQUEST,
                    ApiStatus::BadRequest,
                    "Passed invalid url to shorten",
                ),
                ErrorKind::MaxRetriesExceeded => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiStatus::Error,
                    "max retries exceeded",
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiStatus::Error,
                    "failed to add url",
                ),
            },
            AppError::Resolve(err) => match err.kind() {
                ErrorKind::InvalidLink => (
                    StatusCode::BAD_REQUEST,
                    ApiStatus::BadRequest,
                    "Passed invalid short link",
                ),
                ErrorKind::NotFound => (
                    StatusCode::NOT_FOUND,
                    ApiStatus::NotFound,
                    "url was not found",
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiStatus::Error,
                    "failed to find url",
                ),
            },
        };

        (code, Json(ApiResponse::error(status, message))).into_response()
    }
}
