use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SaveLinkRequest {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiStatus {
    #[serde(rename = "OK")]
    Ok,
    Error,
    BadRequest,
    NotFound,
}

/// Envelope shared by every link endpoint. `link` carries the short URL on
/// save and the original URL on lookup.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ApiResponse {
    pub fn ok(link: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Ok,
            error: None,
            link: Some(link.into()),
        }
    }

    pub fn error(status: ApiStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            error: Some(message.into()),
            link: None,
        }
    }
}
