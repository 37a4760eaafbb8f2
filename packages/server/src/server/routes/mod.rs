// HTTP routes
pub mod download;
pub mod extract;
pub mod health;
pub mod meta;

pub use download::*;
pub use extract::*;
pub use health::*;
pub use meta::*;

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub const INVALID_BODY: &str = "Invalid request body";

/// `{ "success": false, "error": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }
}

/// Malformed or mistyped JSON bodies get the regular error envelope instead
/// of axum's plain-text rejection.
pub(crate) fn invalid_body(rejection: JsonRejection) -> (StatusCode, Json<ErrorBody>) {
    let details = rejection.body_text();
    warn!(error = %details, "Rejected request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new(INVALID_BODY).with_details(Some(details))),
    )
}

/// Parse an optional free-form enum field the same way serde would.
/// Unknown or blank values come back as `None`.
pub(crate) fn parse_loose<T: DeserializeOwned>(value: Option<&str>) -> Option<T> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase())).ok()
}

/// Plain OPTIONS handler for clients that skip the CORS preflight headers.
pub async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}
