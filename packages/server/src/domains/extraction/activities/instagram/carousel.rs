//! Carousel page parser.
//!
//! Candidate image URLs are gathered from every source on the page, then
//! filtered, deduplicated and sorted. Sorting is lexicographic by URL, so
//! the output order is stable but need not match the slide order.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};
use url::Url;

use crate::common::text::unescape_embedded_url;
use crate::common::{MediaKind, MediaResult, Platform};
use crate::domains::extraction::activities::meta_tags::OpenGraph;
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::headers::{DESKTOP_USER_AGENT, MOBILE_USER_AGENT};
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::BaseHttpClient;

use super::page::{fetch_post_page, InstagramPage};
use super::shared_data::SharedData;

static RE_JSON_LD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type="application/ld\+json"[^>]*>(.*?)</script>"#).unwrap()
});
static RE_DISPLAY_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""display_url"\s*:\s*"([^"]+)""#).unwrap());
static RE_CAROUSEL_MEDIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)"carousel_media"\s*:\s*\[(.*?)\]"#).unwrap());
static RE_SIDECAR_EDGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"edge_sidecar_to_children"\s*:\s*\{\s*"edges"\s*:\s*\[(.*?)\]\s*\}"#)
        .unwrap()
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static STANDARD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""src"\s*:\s*"([^"]*scontent[^"]*\.jpg[^"]*)""#,
        r#""url"\s*:\s*"([^"]*scontent[^"]*\.jpg[^"]*)""#,
        r#"https://[^"'<>\s]*scontent[^"'<>\s]*\.(?:jpg|jpeg|png|webp)[^"'<>\s]*"#,
    ])
});

static BROAD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""display_src"\s*:\s*"([^"]+)""#,
        r#""thumbnail_src"\s*:\s*"([^"]+)""#,
        r#""candidates"\s*:\s*\[\s*\{[^{}]*?"url"\s*:\s*"([^"]+)""#,
        r#"https:[^"'<>\s]*(?:cdninstagram|fbcdn)[^"'<>\s]*\.(?:jpg|jpeg|png|webp)[^"'<>\s]*"#,
    ])
});

/// Which regex set to scan with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselScan {
    Standard,
    /// Adds legacy and image_versions2 fields, escaped CDN URLs, and fetches
    /// with a mobile User-Agent.
    Broad,
}

fn captures_of(regex: &Regex, text: &str, out: &mut Vec<String>) {
    for cap in regex.captures_iter(text) {
        if let Some(m) = cap.get(1).or_else(|| cap.get(0)) {
            out.push(m.as_str().to_string());
        }
    }
}

/// `image` fields from JSON-LD blocks: a string, a list of strings, or
/// objects carrying `url`/`contentUrl`.
fn json_ld_images(html: &str, out: &mut Vec<String>) {
    fn push_image(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(url) => out.push(url.clone()),
            Value::Array(items) => items.iter().for_each(|item| push_image(item, out)),
            Value::Object(map) => {
                if let Some(Value::String(url)) = map.get("url").or_else(|| map.get("contentUrl")) {
                    out.push(url.clone());
                }
            }
            _ => {}
        }
    }

    fn visit(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::Array(items) => items.iter().for_each(|item| visit(item, out)),
            Value::Object(map) => {
                if let Some(image) = map.get("image") {
                    push_image(image, out);
                }
            }
            _ => {}
        }
    }

    for cap in RE_JSON_LD.captures_iter(html) {
        if let Ok(value) = serde_json::from_str::<Value>(cap[1].trim()) {
            visit(&value, out);
        }
    }
}

fn is_post_image(candidate: &str) -> bool {
    let parsed = match Url::parse(candidate) {
        Ok(url) => url,
        Err(_) => return false,
    };
    matches!(parsed.scheme(), "http" | "https")
        && (candidate.contains("scontent") || candidate.contains(Platform::Instagram.keyword()))
}

/// All image URLs found on the page, filtered, deduplicated and sorted.
pub fn collect_carousel_images(html: &str, scan: CarouselScan) -> Vec<String> {
    let mut raw = Vec::new();

    json_ld_images(html, &mut raw);

    if let Ok(data) = SharedData::from_html(html) {
        raw.extend(data.sidecar_display_urls());
    }

    captures_of(&RE_DISPLAY_URL, html, &mut raw);
    for block in RE_CAROUSEL_MEDIA
        .captures_iter(html)
        .chain(RE_SIDECAR_EDGES.captures_iter(html))
    {
        captures_of(&RE_DISPLAY_URL, &block[1], &mut raw);
    }
    for regex in STANDARD_PATTERNS.iter() {
        captures_of(regex, html, &mut raw);
    }
    if scan == CarouselScan::Broad {
        for regex in BROAD_PATTERNS.iter() {
            captures_of(regex, html, &mut raw);
        }
    }

    if let Some(image) = OpenGraph::parse(html).image {
        raw.push(image);
    }

    raw.iter()
        .map(|candidate| unescape_embedded_url(candidate.trim()))
        .filter(|candidate| is_post_image(candidate))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn parse_carousel(page: &InstagramPage, scan: CarouselScan) -> Result<MediaResult> {
    let images = collect_carousel_images(&page.html, scan);
    let first = images
        .first()
        .cloned()
        .ok_or(ExtractError::NoMedia("no images found in post"))?;

    let kind = if images.len() > 1 {
        MediaKind::Carousel
    } else {
        MediaKind::Image
    };

    let mut media = MediaResult::new(kind, first.clone());
    media.thumbnail = Some(first);
    media.title = Some(page.title("Instagram Carousel"));
    media.author = Some(page.author());
    media.quality = Some("High Resolution".to_string());
    media.images = (images.len() > 1).then_some(images);
    Ok(media)
}

pub struct CarouselExtractor {
    http: Arc<dyn BaseHttpClient>,
    scan: CarouselScan,
}

impl CarouselExtractor {
    pub fn new(http: Arc<dyn BaseHttpClient>, scan: CarouselScan) -> Self {
        Self { http, scan }
    }
}

#[async_trait]
impl Extractor for CarouselExtractor {
    fn name(&self) -> &'static str {
        match self.scan {
            CarouselScan::Standard => "carousel",
            CarouselScan::Broad => "carousel_broad",
        }
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let user_agent = match self.scan {
            CarouselScan::Standard => DESKTOP_USER_AGENT,
            CarouselScan::Broad => MOBILE_USER_AGENT,
        };
        let page = fetch_post_page(self.http.as_ref(), &request.url, user_agent).await?;
        parse_carousel(&page, self.scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> InstagramPage {
        InstagramPage::new("https://www.instagram.com/p/abc/", html)
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let html = r#"<script>{"display_url":"https://scontent/b.jpg"},{"display_url":"https://scontent/a.jpg"},
            {"display_url":"https://scontent/b.jpg"}</script>"#;

        let media = parse_carousel(&page(html), CarouselScan::Standard).unwrap();

        assert_eq!(media.kind, MediaKind::Carousel);
        assert_eq!(
            media.images,
            Some(vec![
                "https://scontent/a.jpg".to_string(),
                "https://scontent/b.jpg".to_string()
            ])
        );
        assert_eq!(media.url, "https://scontent/a.jpg");
        assert_eq!(media.thumbnail.as_deref(), Some("https://scontent/a.jpg"));
        assert_eq!(media.title.as_deref(), Some("Instagram Carousel"));
    }

    #[test]
    fn test_merges_every_source() {
        let html = r#"
            <meta property="og:image" content="https://scontent.cdninstagram.com/og.jpg">
            <script type="application/ld+json">{"@type":"ImageObject","image":[
                "https://scontent.cdninstagram.com/ld1.jpg",{"url":"https://scontent.cdninstagram.com/ld2.jpg"}]}</script>
            <script>window._sharedData = {"entry_data":{"PostPage":[{"graphql":{"shortcode_media":{
                "edge_sidecar_to_children":{"edges":[{"node":{"display_url":"https://scontent.cdninstagram.com/side.jpg"}}]}}}}]}};</script>
            <script>{"carousel_media":[{"image_versions2":{}},{"display_url":"https:\/\/scontent.cdninstagram.com\/cm.jpg?a=1&b=2"}]}</script>
            <img src="https://example.com/not-instagram.jpg">
        "#;

        let images = collect_carousel_images(html, CarouselScan::Standard);

        assert_eq!(
            images,
            vec![
                "https://scontent.cdninstagram.com/cm.jpg?a=1&b=2",
                "https://scontent.cdninstagram.com/ld1.jpg",
                "https://scontent.cdninstagram.com/ld2.jpg",
                "https://scontent.cdninstagram.com/og.jpg",
                "https://scontent.cdninstagram.com/side.jpg",
            ]
        );
    }

    #[test]
    fn test_single_image_has_no_images_list() {
        let html = r#"<meta property="og:image" content="https://scontent.cdninstagram.com/only.jpg">"#;
        let media = parse_carousel(&page(html), CarouselScan::Standard).unwrap();
        assert_eq!(media.kind, MediaKind::Image);
        assert!(media.images.is_none());
    }

    #[test]
    fn test_broad_scan_finds_more() {
        let html = r#"{"image_versions2":{"candidates":[{"width":1080,"url":"https://instagram.fxyz1-1.fna.fbcdn.net/v/p1.webp"}]}}
                      {"thumbnail_src":"https://instagram.fxyz1-1.fna.fbcdn.net/v/p2.webp"}"#;

        assert!(collect_carousel_images(html, CarouselScan::Standard).is_empty());
        assert_eq!(
            collect_carousel_images(html, CarouselScan::Broad),
            vec![
                "https://instagram.fxyz1-1.fna.fbcdn.net/v/p1.webp",
                "https://instagram.fxyz1-1.fna.fbcdn.net/v/p2.webp",
            ]
        );
    }

    #[test]
    fn test_empty_page_fails() {
        assert!(parse_carousel(&page("<html></html>"), CarouselScan::Broad).is_err());
    }
}
