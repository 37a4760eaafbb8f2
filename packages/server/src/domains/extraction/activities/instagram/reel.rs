//! Reel page parser: og:video, then shared data, then script regexes.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::common::text::unescape_embedded_url;
use crate::common::{MediaKind, MediaResult, Platform};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::DESKTOP_USER_AGENT;
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::BaseHttpClient;

use super::page::{fetch_post_page, InstagramPage};
use super::shared_data::SharedData;

static REEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""video_url"\s*:\s*"([^"]+)""#,
        r#""contentUrl"\s*:\s*"([^"]+)""#,
        r#""src"\s*:\s*"([^"]*\.mp4[^"]*)""#,
        r#"https:[^"'\s<>]*\.mp4[^"'\s<>]*"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn is_reel_video(candidate: &str) -> bool {
    candidate.contains(".mp4")
        && (candidate.contains("scontent") || candidate.contains(Platform::Instagram.keyword()))
        && Url::parse(candidate).is_ok()
}

/// First mp4 URL in script content that looks like Instagram's CDN.
pub fn scan_reel_video(html: &str) -> Option<String> {
    REEL_PATTERNS.iter().find_map(|regex| {
        regex.captures_iter(html).find_map(|cap| {
            let raw = cap.get(1).or_else(|| cap.get(0))?.as_str();
            let candidate = unescape_embedded_url(raw);
            is_reel_video(&candidate).then_some(candidate)
        })
    })
}

pub fn parse_reel(page: &InstagramPage) -> Result<MediaResult> {
    let og = page.open_graph();

    let video = og
        .video
        .clone()
        .or_else(|| {
            SharedData::from_html(&page.html)
                .ok()
                .and_then(|data| data.video_url())
        })
        .or_else(|| scan_reel_video(&page.html))
        .ok_or(ExtractError::NoMedia("no reel video found in page"))?;

    let mut media = MediaResult::new(MediaKind::Reel, video);
    media.thumbnail = og.image;
    media.title = Some(page.title("Instagram Reel"));
    media.author = Some(page.author());
    media.quality = Some("High Quality".to_string());
    Ok(media)
}

pub struct ReelPageExtractor {
    http: Arc<dyn BaseHttpClient>,
}

impl ReelPageExtractor {
    pub fn new(http: Arc<dyn BaseHttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Extractor for ReelPageExtractor {
    fn name(&self) -> &'static str {
        "reel_page"
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let page = fetch_post_page(self.http.as_ref(), &request.url, DESKTOP_USER_AGENT).await?;
        parse_reel(&page)
    }
}
