//! Instagram downloader on RapidAPI. Requires `RAPIDAPI_KEY`.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use crate::common::text::{clean_post_url, non_empty};
use crate::common::{MediaKind, MediaResult, MediaType, Platform};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::DESKTOP_USER_AGENT;
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::{BaseHttpClient, HttpRequest};

use super::{default_title, single_quality};

const HOST: &str = "instagram-downloader-download-instagram-videos-stories.p.rapidapi.com";

#[derive(Debug, Deserialize)]
pub struct RapidApiResponse {
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

pub fn map_rapidapi_response(
    response: RapidApiResponse,
    platform: Platform,
    media_type: MediaType,
) -> Result<MediaResult> {
    let url = non_empty(response.url).ok_or(ExtractError::NoMedia("service returned no media URL"))?;

    let mut media = MediaResult::new(MediaKind::playable(media_type), url);
    media.thumbnail = non_empty(response.thumbnail);
    media.title = Some(non_empty(response.title).unwrap_or_else(|| default_title(platform)));
    media.author = Some(non_empty(response.author).unwrap_or_else(|| "Unknown".to_string()));
    media.quality = Some(single_quality(media_type).to_string());
    Ok(media)
}

pub struct RapidApiClient {
    http: Arc<dyn BaseHttpClient>,
    api_key: String,
}

impl RapidApiClient {
    pub fn new(http: Arc<dyn BaseHttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    fn endpoint(post_url: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &format!("https://{}/index", HOST),
            &[("url", clean_post_url(post_url))],
        )
        .map_err(|e| ExtractError::Parse(e.to_string()))?;
        Ok(url.into())
    }
}

#[async_trait]
impl Extractor for RapidApiClient {
    fn name(&self) -> &'static str {
        "rapidapi"
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        if self.api_key.is_empty() {
            return Err(ExtractError::NotConfigured("RAPIDAPI_KEY"));
        }

        let response = self
            .http
            .send(
                HttpRequest::get(Self::endpoint(&request.url)?)
                    .header("User-Agent", DESKTOP_USER_AGENT)
                    .header("X-RapidAPI-Key", self.api_key.as_str())
                    .header("X-RapidAPI-Host", HOST),
            )
            .await?;

        if !response.is_success() {
            return Err(ExtractError::UpstreamStatus {
                status: response.status,
            });
        }

        let parsed: RapidApiResponse = serde_json::from_slice(&response.body)?;
        map_rapidapi_response(parsed, request.platform, request.media_type)
    }
}
