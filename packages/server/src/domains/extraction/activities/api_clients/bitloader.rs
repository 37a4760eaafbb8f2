//! BitLoader download API.

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

use super::{default_title, format_duration, format_megabytes, single_quality, url_form};

const ENDPOINT: &str = "https://www.bitloader.app/api/v1/download";
const ORIGIN: &str = "https://www.bitloader.app";

#[derive(Debug, Deserialize)]
pub struct BitLoaderResponse {
    pub code: Option<i64>,
    pub data: Option<BitLoaderMedia>,
}

#[derive(Debug, Deserialize)]
pub struct BitLoaderMedia {
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration: Option<f64>,
    pub size: Option<f64>,
}

pub fn map_bitloader_response(
    response: BitLoaderResponse,
    platform: Platform,
    media_type: MediaType,
) -> Result<MediaResult> {
    if response.code != Some(0) {
        return Err(ExtractError::NoMedia("service reported failure"));
    }
    let data = response
        .data
        .ok_or(ExtractError::NoMedia("service returned no data"))?;
    let url = non_empty(data.url).ok_or(ExtractError::NoMedia("service returned no media URL"))?;

    let mut media = MediaResult::new(MediaKind::playable(media_type), url);
    media.thumbnail = non_empty(data.thumbnail);
    media.title = Some(non_empty(data.title).unwrap_or_else(|| default_title(platform)));
    media.author = Some(non_empty(data.author).unwrap_or_else(|| "Unknown".to_string()));
    media.duration = format_duration(data.duration);
    media.quality = Some(single_quality(media_type).to_string());
    media.file_size = format_megabytes(data.size);
    Ok(media)
}

pub struct BitLoaderClient {
    http: Arc<dyn BaseHttpClient>,
}

impl BitLoaderClient {
    pub fn new(http: Arc<dyn BaseHttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for BitLoaderClient {
    fn name(&self) -> &'static str {
        "bitloader"
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let response = self
            .http
            .send(
                HttpRequest::post_form(ENDPOINT, url_form(&request.url, &[]))
                    .headers(api_headers(ORIGIN)),
            )
            .await?;

        if !response.is_success() {
            return Err(ExtractError::UpstreamStatus {
                status: response.status,
            });
        }

        let parsed: BitLoaderResponse = serde_json::from_slice(&response.body)?;
        map_bitloader_response(parsed, request.platform, request.media_type)
    }
}
