//! Open Graph meta-tag extraction.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::common::text::clean_post_url;
use crate::common::{MediaKind, MediaResult, MediaType, Platform};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::{page_headers, DESKTOP_USER_AGENT};
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::{BaseHttpClient, HttpRequest};

lazy_static! {
    // `og:video:secure_url` is checked before `og:video`
    static ref RE_OG_VIDEO_SECURE: Regex =
        Regex::new(r#"<meta\s+property="og:video:secure_url"\s+content="([^"]+)""#).unwrap();
    static ref RE_OG_VIDEO: Regex =
        Regex::new(r#"<meta\s+property="og:video"\s+content="([^"]+)""#).unwrap();
    static ref RE_OG_IMAGE: Regex =
        Regex::new(r#"<meta\s+property="og:image"\s+content="([^"]+)""#).unwrap();
    static ref RE_OG_TITLE: Regex =
        Regex::new(r#"<meta\s+property="og:title"\s+content="([^"]+)""#).unwrap();
    static ref RE_OG_DESCRIPTION: Regex =
        Regex::new(r#"<meta\s+property="og:description"\s+content="([^"]+)""#).unwrap();
    static ref RE_HANDLE: Regex = Regex::new(r"@([a-zA-Z0-9_.]+)").unwrap();
}

fn capture(regex: &Regex, html: &str) -> Option<String> {
    regex
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// The Open Graph tags this service cares about. Each is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenGraph {
    /// `og:video:secure_url` when present, else `og:video`
    pub video: Option<String>,
    pub image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl OpenGraph {
    pub fn parse(html: &str) -> Self {
        Self {
            video: capture(&RE_OG_VIDEO_SECURE, html).or_else(|| capture(&RE_OG_VIDEO, html)),
            image: capture(&RE_OG_IMAGE, html),
            title: capture(&RE_OG_TITLE, html),
            description: capture(&RE_OG_DESCRIPTION, html),
        }
    }
}

/// First `@handle` in the text, without the `@`.
pub fn handle_from(text: &str) -> Option<String> {
    capture(&RE_HANDLE, text)
}

/// Build a result from page HTML.
pub fn parse_meta_tags(html: &str, platform: Platform, media_type: MediaType) -> Result<MediaResult> {
    let og = OpenGraph::parse(html);
    let title = og
        .title
        .clone()
        .unwrap_or_else(|| format!("{} Media", platform.display_name()));
    let author = og
        .description
        .as_deref()
        .and_then(handle_from)
        .unwrap_or_else(|| "Unknown".to_string());

    let mut media = if let Some(video) = og.video {
        let mut media = MediaResult::new(MediaKind::playable(media_type), video);
        media.thumbnail = og.image;
        media.quality = Some(
            if media_type.is_audio() {
                "Audio Only"
            } else {
                "Standard"
            }
            .to_string(),
        );
        media
    } else if let (Some(image), Platform::Instagram) = (og.image, platform) {
        let mut media = MediaResult::new(MediaKind::Image, image.clone());
        media.thumbnail = Some(image);
        media.quality = Some("High Resolution".to_string());
        media
    } else {
        return Err(ExtractError::NoMedia("no media found in meta tags"));
    };

    media.title = Some(title);
    media.author = Some(author);
    Ok(media)
}

pub struct MetaTagExtractor {
    http: Arc<dyn BaseHttpClient>,
}

impl MetaTagExtractor {
    pub fn new(http: Arc<dyn BaseHttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for MetaTagExtractor {
    fn name(&self) -> &'static str {
        "meta_tags"
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let response = self
            .http
            .send(
                HttpRequest::get(clean_post_url(&request.url))
                    .headers(page_headers(request.platform, DESKTOP_USER_AGENT)),
            )
            .await?;

        if !response.is_success() {
            return Err(ExtractError::UpstreamStatus {
                status: response.status,
            });
        }

        parse_meta_tags(&response.text(), request.platform, request.media_type)
    }
}
