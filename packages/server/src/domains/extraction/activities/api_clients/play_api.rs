//! TikWM-style APIs (TikWM, SnapTik, SSSTikTok).
//!
//! All three answer `{code, data: {hdplay, play, wmplay, ...}}` with `code == 0`
//! on success, so one client is parameterized by a service profile.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::common::text::non_empty;
use crate::common::{MediaKind, MediaResult, MediaType, Platform};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::api_headers;
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::{BaseHttpClient, HttpRequest};

use super::{default_title, format_duration, format_megabytes, url_form};

#[derive(Debug, Clone, Copy)]
pub struct PlayApiProfile {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub origin: &'static str,
    /// Ask for the HD rendition (`hd=1`)
    pub request_hd: bool,
}

pub const TIKWM: PlayApiProfile = PlayApiProfile {
    name: "tikwm",
    endpoint: "https://www.tikwm.com/api/",
    origin: "https://www.tikwm.com",
    request_hd: true,
};

pub const SNAPTIK: PlayApiProfile = PlayApiProfile {
    name: "snaptik",
    endpoint: "https://snaptik.app/v2/download",
    origin: "https://snaptik.app",
    request_hd: false,
};

pub const SSSTIK: PlayApiProfile = PlayApiProfile {
    name: "ssstik",
    endpoint: "https://ssstik.io/download",
    origin: "https://ssstik.io",
    request_hd: false,
};

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayApiResponse {
    pub code: Option<i64>,
    pub data: Option<PlayApiVideo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayApiVideo {
    pub hdplay: Option<String>,
    pub play: Option<String>,
    pub wmplay: Option<String>,
    pub cover: Option<String>,
    pub title: Option<String>,
    pub author: Option<PlayApiAuthor>,
    pub duration: Option<f64>,
    pub size: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayApiAuthor {
    pub unique_id: Option<String>,
}

/// Highest available rendition with its quality label.
fn best_rendition(video: &PlayApiVideo) -> Option<(String, &'static str)> {
    [
        (&video.hdplay, "HD (1080p)"),
        (&video.play, "Standard (720p)"),
        (&video.wmplay, "Watermarked"),
    ]
    .into_iter()
    .find_map(|(url, label)| non_empty(url.clone()).map(|url| (url, label)))
}

/// Map a decoded response into a result.
pub fn map_play_response(
    response: PlayApiResponse,
    platform: Platform,
    media_type: MediaType,
) -> Result<MediaResult> {
    if response.code != Some(0) {
        return Err(ExtractError::NoMedia("service reported failure"));
    }
    let video = response
        .data
        .ok_or(ExtractError::NoMedia("service returned no data"))?;
    let (url, quality) =
        best_rendition(&video).ok_or(ExtractError::NoMedia("service returned no play URL"))?;

    let mut media = MediaResult::new(MediaKind::playable(media_type), url);
    media.thumbnail = non_empty(video.cover);
    media.title = Some(non_empty(video.title).unwrap_or_else(|| default_title(platform)));
    media.author = Some(
        video
            .author
            .and_then(|a| non_empty(a.unique_id))
            .unwrap_or_else(|| "Unknown".to_string()),
    );
    media.duration = format_duration(video.duration);
    media.quality = Some(if media_type.is_audio() {
        "Audio Only".to_string()
    } else {
        quality.to_string()
    });
    media.file_size = format_megabytes(video.size);
    Ok(media)
}

// =============================================================================
// Client
// =============================================================================

pub struct PlayApiClient {
    http: Arc<dyn BaseHttpClient>,
    profile: PlayApiProfile,
}

impl PlayApiClient {
    pub fn new(http: Arc<dyn BaseHttpClient>, profile: PlayApiProfile) -> Self {
        Self { http, profile }
    }
}

#[async_trait]
impl Extractor for PlayApiClient {
    fn name(&self) -> &'static str {
        self.profile.name
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let extra: &[(&str, &str)] = if self.profile.request_hd {
            &[("hd", "1")]
        } else {
            &[]
        };

        let response = self
            .http
            .send(
                HttpRequest::post_form(self.profile.endpoint, url_form(&request.url, extra))
                    .headers(api_headers(self.profile.origin)),
            )
            .await?;

        if !response.is_success() {
            return Err(ExtractError::UpstreamStatus {
                status: response.status,
            });
        }

        let parsed: PlayApiResponse = serde_json::from_slice(&response.body)?;
        map_play_response(parsed, request.platform, request.media_type)
    }
}
