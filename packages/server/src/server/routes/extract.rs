//! Extraction endpoints: `/api/extract`, `/api/simple-extract`,
//! `/api/fetch-reel` and the `/api/download-zip` echo.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::{ExtractionOutcome, MediaType, Platform};
use crate::domains::extraction::{
    extract_media, fetch_reel, reel_request, ExtractError, ExtractionRequest,
};
use crate::server::app::AppState;

use super::{invalid_body, parse_loose, ErrorBody};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractBody {
    pub url: Option<String>,
    pub platform: Option<String>,
    pub media_type: Option<String>,
}

impl ExtractBody {
    /// An explicit but unrecognised platform is rejected rather than
    /// silently replaced by URL detection.
    fn to_request(&self) -> Result<ExtractionRequest, ExtractError> {
        let url = self.url.as_deref();
        let platform = match self.platform.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_loose::<Platform>(Some(raw)).ok_or_else(|| {
                ExtractError::UnsupportedUrl {
                    url: url.unwrap_or_default().to_string(),
                }
            })?),
        };
        let media_type = parse_loose::<MediaType>(self.media_type.as_deref());
        ExtractionRequest::from_input(url, platform, media_type)
    }
}

fn outcome_response(
    outcome: ExtractionOutcome,
    failure_status: StatusCode,
) -> (StatusCode, Json<ExtractionOutcome>) {
    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        failure_status
    };
    (status, Json(outcome))
}

/// POST /api/extract (also mounted at /api/simple-extract)
pub async fn extract_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ExtractBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection).into_response(),
    };
    let request = match body.to_request() {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected extraction request");
            let status = if e.is_validation() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            return outcome_response(ExtractionOutcome::Failure(e.to_string()), status)
                .into_response();
        }
    };

    let outcome = extract_media(&state.deps, &request).await;
    outcome_response(outcome, StatusCode::BAD_REQUEST).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchReelBody {
    pub url: Option<String>,
}

/// POST /api/fetch-reel
pub async fn fetch_reel_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<FetchReelBody>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection).into_response(),
    };
    let request = match reel_request(body.url.as_deref()) {
        Ok(request) => request,
        Err(e) => {
            return outcome_response(
                ExtractionOutcome::Failure(e.to_string()),
                StatusCode::BAD_REQUEST,
            )
            .into_response()
        }
    };

    let outcome = fetch_reel(&state.deps, &request).await;
    outcome_response(outcome, StatusCode::NOT_FOUND).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadZipBody {
    #[serde(default)]
    pub images: Vec<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadZipResponse {
    pub success: bool,
    pub images: Vec<String>,
    pub title: String,
    pub message: &'static str,
}

/// POST /api/download-zip
///
/// Archives are built client-side; this only validates and echoes the list.
pub async fn download_zip_handler(
    payload: Result<Json<DownloadZipBody>, JsonRejection>,
) -> Result<Json<DownloadZipResponse>, (StatusCode, Json<ErrorBody>)> {
    let Json(body) = payload.map_err(invalid_body)?;
    let images: Vec<String> = body
        .images
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();

    if images.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("No images provided")),
        ));
    }

    let title = body
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Instagram Carousel".to_string());

    Ok(Json(DownloadZipResponse {
        success: true,
        images,
        title,
        message: "Use frontend zip creation",
    }))
}
