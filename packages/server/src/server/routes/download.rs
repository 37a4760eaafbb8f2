//! Binary proxy endpoints. All three share one handler body and differ only
//! in their `DownloadProfile`.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::common::{MediaType, Platform};
use crate::domains::download::{
    download_media, DownloadError, DownloadProfile, DownloadRequest, DownloadedMedia,
    DOWNLOAD_MEDIA, DOWNLOAD_VIDEO, PROXY_DOWNLOAD,
};
use crate::server::app::AppState;

use super::{invalid_body, parse_loose, ErrorBody};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBody {
    pub url: Option<String>,
    pub platform: Option<String>,
    pub media_type: Option<String>,
    pub filename: Option<String>,
}

impl DownloadBody {
    fn to_request(&self) -> Result<DownloadRequest, DownloadError> {
        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(DownloadError::MissingUrl)?;

        Ok(DownloadRequest {
            url: url.to_string(),
            platform: parse_loose::<Platform>(self.platform.as_deref()),
            media_type: parse_loose::<MediaType>(self.media_type.as_deref()),
            filename: self.filename.clone(),
        })
    }
}

pub fn download_error_status(err: &DownloadError) -> StatusCode {
    match err {
        DownloadError::MissingUrl
        | DownloadError::NotMedia { .. }
        | DownloadError::TooSmall { .. } => StatusCode::BAD_REQUEST,
        DownloadError::NotAccessible { status } | DownloadError::UpstreamStatus { status } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        DownloadError::Timeout => StatusCode::REQUEST_TIMEOUT,
        DownloadError::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn attachment(media: DownloadedMedia) -> Response {
    let length = media.bytes.len().to_string();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, media.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", media.filename),
            ),
            (header::CONTENT_LENGTH, length),
            (header::CACHE_CONTROL, "no-cache".to_string()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        media.bytes,
    )
        .into_response()
}

async fn proxy(
    state: &AppState,
    payload: Result<Json<DownloadBody>, JsonRejection>,
    profile: &DownloadProfile,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection).into_response(),
    };
    let result = match body.to_request() {
        Ok(request) => download_media(state.deps.http.as_ref(), &request, profile).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(media) => attachment(media),
        Err(e) => {
            warn!(error = %e, "Download failed");
            let status = download_error_status(&e);
            let details = e.details();
            (status, Json(ErrorBody::new(e.to_string()).with_details(details))).into_response()
        }
    }
}

/// POST /api/download-media
pub async fn download_media_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<DownloadBody>, JsonRejection>,
) -> Response {
    proxy(&state, payload, &DOWNLOAD_MEDIA).await
}

/// POST /api/download-video
pub async fn download_video_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<DownloadBody>, JsonRejection>,
) -> Response {
    proxy(&state, payload, &DOWNLOAD_VIDEO).await
}

/// POST /api/proxy-download
pub async fn proxy_download_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<DownloadBody>, JsonRejection>,
) -> Response {
    proxy(&state, payload, &PROXY_DOWNLOAD).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            download_error_status(&DownloadError::TooSmall { size: 10 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            download_error_status(&DownloadError::UpstreamStatus { status: 403 }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            download_error_status(&DownloadError::Timeout),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            download_error_status(&DownloadError::NotMedia {
                content_type: "text/html".into()
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_url() {
        let body = DownloadBody {
            url: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(body.to_request(), Err(DownloadError::MissingUrl)));
    }
}
