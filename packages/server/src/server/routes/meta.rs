use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::domains::meta::{generate_meta, GeneratedMeta, MetaError, MetaRequest};
use crate::server::app::AppState;

use super::{invalid_body, ErrorBody};

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub success: bool,
    pub data: GeneratedMeta,
}

pub fn meta_error_status(err: &MetaError) -> StatusCode {
    match err {
        MetaError::EmptyContent => StatusCode::BAD_REQUEST,
        MetaError::InvalidApiKey => StatusCode::UNAUTHORIZED,
        MetaError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        MetaError::NotConfigured | MetaError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /api/generate-meta
pub async fn generate_meta_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<MetaRequest>, JsonRejection>,
) -> Result<Json<MetaResponse>, (StatusCode, Json<ErrorBody>)> {
    let Json(body) = payload.map_err(invalid_body)?;
    match generate_meta(&state.deps, &body).await {
        Ok(data) => Ok(Json(MetaResponse {
            success: true,
            data,
        })),
        Err(e) => {
            tracing::error!(error = %e, "Meta generation failed");
            Err((meta_error_status(&e), Json(ErrorBody::new(e.to_string()))))
        }
    }
}
