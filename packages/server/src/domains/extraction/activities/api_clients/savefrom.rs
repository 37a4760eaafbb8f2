//! SaveFrom converter API.

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

use super::{default_title, single_quality, url_form};

const ENDPOINT: &str = "https://savefrom.net/api/convert";
const ORIGIN: &str = "https://savefrom.net";

#[derive(Debug, Deserialize)]
pub struct SaveFromResponse {
    #[serde(default)]
    pub url: Vec<SaveFromLink>,
    pub thumb: Option<String>,
    pub meta: Option<SaveFromMeta>,
}

#[derive(Debug, Deserialize)]
pub struct SaveFromLink {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveFromMeta {
    pub title: Option<String>,
    pub author: Option<String>,
}

pub fn map_savefrom_response(
    response: SaveFromResponse,
    platform: Platform,
    media_type: MediaType,
) -> Result<MediaResult> {
    let url = response
        .url
        .into_iter()
        .next()
        .and_then(|link| non_empty(link.url))
        .ok_or(ExtractError::NoMedia("service returned no media URL"))?;
    let meta = response.meta.unwrap_or_default();

    let mut media = MediaResult::new(MediaKind::playable(media_type), url);
    media.thumbnail = non_empty(response.thumb);
    media.title = Some(non_empty(meta.title).unwrap_or_else(|| default_title(platform)));
    media.author = Some(non_empty(meta.author).unwrap_or_else(|| "Unknown".to_string()));
    media.quality = Some(single_quality(media_type).to_string());
    Ok(media)
}

pub struct SaveFromClient {
    http: Arc<dyn BaseHttpClient>,
}

impl SaveFromClient {
    pub fn new(http: Arc<dyn BaseHttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for SaveFromClient {
    fn name(&self) -> &'static str {
        "savefrom"
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

        let parsed: SaveFromResponse = serde_json::from_slice(&response.body)?;
        map_savefrom_response(parsed, request.platform, request.media_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_first_link() {
        let parsed: SaveFromResponse = serde_json::from_str(
            r#"{"url":[{"url":"https://cdn/first.mp4"},{"url":"https://cdn/second.mp4"}],
                "thumb":"https://cdn/t.jpg","meta":{"title":"Clip"}}"#,
        )
        .unwrap();
        let media = map_savefrom_response(parsed, Platform::Instagram, MediaType::Video).unwrap();

        assert_eq!(media.url, "https://cdn/first.mp4");
        assert_eq!(media.title.as_deref(), Some("Clip"));
        assert_eq!(media.author.as_deref(), Some("Unknown"));
    }

    #[test]
    fn test_empty_link_list_fails() {
        let parsed: SaveFromResponse = serde_json::from_str(r#"{"url":[]}"#).unwrap();
        assert!(map_savefrom_response(parsed, Platform::Instagram, MediaType::Video).is_err());
    }
}
