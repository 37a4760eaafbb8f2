//! Raw-HTML regex scan for embedded media URLs.
//!
//! Used when a page carries no Open Graph video tag but still inlines the
//! player state as JSON.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::common::text::{clean_post_url, unescape_embedded_url};
use crate::common::{MediaKind, MediaResult, MediaType, Platform};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::{page_headers, pattern_user_agent};
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::{BaseHttpClient, HttpRequest};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static TIKTOK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""playAddr":"([^"]*\.mp4[^"]*)""#,
        r#""downloadAddr":"([^"]*\.mp4[^"]*)""#,
        r#"https://[^"'\s]*\.mp4[^"'\s]*"#,
        r#""video_url":"([^"]+)""#,
        r#""play_url":"([^"]+)""#,
    ])
});

static INSTAGRAM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""video_url":"([^"]+)""#,
        r#"https://[^"'\s]*\.mp4[^"'\s]*"#,
        r#""src":"([^"]*\.mp4[^"]*)""#,
    ])
});

static RE_IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https://[^"]*\.(?:jpg|jpeg|png|webp)[^"]*"#).unwrap());

/// Substrings that mark a URL as a still image rather than the video itself.
const BLOCKLIST: &[&str] = &["thumbnail", "cover", "preview", "avatar"];

fn patterns_for(platform: Platform) -> &'static [Regex] {
    match platform {
        Platform::Tiktok => &TIKTOK_PATTERNS,
        Platform::Instagram => &INSTAGRAM_PATTERNS,
    }
}

fn accept_candidate(candidate: &str) -> bool {
    candidate.contains("video")
        && !BLOCKLIST.iter().any(|blocked| candidate.contains(blocked))
        && Url::parse(candidate).is_ok()
}

/// First embedded video URL that survives the filters, in pattern order.
pub fn find_video_url(html: &str, platform: Platform) -> Option<String> {
    patterns_for(platform).iter().find_map(|regex| {
        regex.captures_iter(html).find_map(|cap| {
            let raw = cap.get(1).or_else(|| cap.get(0))?.as_str();
            let candidate = unescape_embedded_url(raw);
            accept_candidate(&candidate).then_some(candidate)
        })
    })
}

pub fn first_image_url(html: &str) -> Option<String> {
    RE_IMAGE_URL.find(html).map(|m| m.as_str().to_string())
}

pub fn parse_html_patterns(
    html: &str,
    platform: Platform,
    media_type: MediaType,
) -> Result<MediaResult> {
    let url = find_video_url(html, platform)
        .ok_or(ExtractError::NoMedia("no media URL matched in page source"))?;

    let label = if media_type.is_audio() { "Audio" } else { "Video" };
    let mut media = MediaResult::new(MediaKind::playable(media_type), url);
    media.thumbnail = first_image_url(html);
    media.title = Some(format!("{} {}", platform.display_name(), label));
    media.author = Some("Unknown".to_string());
    media.quality = Some(
        if media_type.is_audio() {
            "Audio Only"
        } else {
            "Standard"
        }
        .to_string(),
    );
    Ok(media)
}

pub struct HtmlPatternExtractor {
    http: Arc<dyn BaseHttpClient>,
}

impl HtmlPatternExtractor {
    pub fn new(http: Arc<dyn BaseHttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for HtmlPatternExtractor {
    fn name(&self) -> &'static str {
        "html_patterns"
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let response = self
            .http
            .send(HttpRequest::get(clean_post_url(&request.url)).headers(page_headers(
                request.platform,
                pattern_user_agent(request.platform),
            )))
            .await?;

        if !response.is_success() {
            return Err(ExtractError::UpstreamStatus {
                status: response.status,
            });
        }

        parse_html_patterns(&response.text(), request.platform, request.media_type)
    }
}
