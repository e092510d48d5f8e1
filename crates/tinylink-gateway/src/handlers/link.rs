use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use tinylink_shortener::{ErrorKind, ServiceError};
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::model::{ApiResponse, SaveLinkRequest};
use crate::state::AppState;

pub async fn save_link_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse>> {
    if body.is_empty() {
        warn!("request body is empty");
        return Err(AppError::EmptyBody);
    }

    let request: SaveLinkRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "failed to decode request body");
        AppError::MalformedBody(e)
    })?;

    let original_url = request
        .url
        .filter(|url| !url.is_empty())
        .ok_or(AppError::MissingUrl)?;

    let short_url = state
        .service()
        .save(&original_url, state.max_retries())
        .await
        .map_err(|e| {
            log_failure(&e, "failed to add url");
            AppError::Save(e)
        })?;

    info!(original_url = %original_url, short_url = %short_url, "url added");
    Ok(Json(ApiResponse::ok(short_url)))
}

pub async fn get_link_handler(
    Path(link): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse>> {
    let original_url = state.service().get_original_url(&link).await.map_err(|e| {
        log_failure(&e, "failed to find url");
        AppError::Resolve(e)
    })?;

    info!(link = %link, original_url = %original_url, "original url retrieved");
    Ok(Json(ApiResponse::ok(original_url)))
}

fn log_failure(err: &ServiceError, message: &str) {
    match err.kind() {
        ErrorKind::Internal => error!(error = %err, "{message}"),
        _ => info!(error = %err, "request rejected"),
    }
}
