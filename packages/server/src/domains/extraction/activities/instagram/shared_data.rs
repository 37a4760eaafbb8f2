//! Typed view of the legacy `window._sharedData` blob.
//!
//! Every level is optional. A blob whose shape does not match simply yields
//! no URLs.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::domains::extraction::error::{ExtractError, Result};

static RE_SHARED_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.+?\});\s*</script>").unwrap()
});

#[derive(Debug, Default, Deserialize)]
pub struct SharedData {
    #[serde(default)]
    pub entry_data: EntryData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryData {
    #[serde(rename = "PostPage", default)]
    pub post_page: Vec<PostPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostPage {
    pub graphql: Option<Graphql>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Graphql {
    pub shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShortcodeMedia {
    pub video_url: Option<String>,
    pub display_url: Option<String>,
    pub edge_sidecar_to_children: Option<SidecarChildren>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SidecarChildren {
    #[serde(default)]
    pub edges: Vec<SidecarEdge>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SidecarEdge {
    pub node: Option<SidecarNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SidecarNode {
    pub display_url: Option<String>,
}

impl SharedData {
    /// Locate and decode the blob in page HTML.
    pub fn from_html(html: &str) -> Result<Self> {
        let json = RE_SHARED_DATA
            .captures(html)
            .and_then(|c| c.get(1))
            .ok_or(ExtractError::NoMedia("no shared data blob in page"))?;
        Ok(serde_json::from_str(json.as_str())?)
    }

    /// `entry_data.PostPage[0].graphql.shortcode_media`
    pub fn shortcode_media(&self) -> Option<&ShortcodeMedia> {
        self.entry_data
            .post_page
            .first()?
            .graphql
            .as_ref()?
            .shortcode_media
            .as_ref()
    }

    pub fn video_url(&self) -> Option<String> {
        self.shortcode_media()?
            .video_url
            .clone()
            .filter(|u| !u.is_empty())
    }

    /// `display_url` of every sidecar child, in document order.
    pub fn sidecar_display_urls(&self) -> Vec<String> {
        self.shortcode_media()
            .and_then(|media| media.edge_sidecar_to_children.as_ref())
            .map(|children| {
                children
                    .edges
                    .iter()
                    .filter_map(|edge| edge.node.as_ref()?.display_url.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
