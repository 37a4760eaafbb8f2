//! yt-dlp strategy: `yt-dlp -j <url>` and read the dumped info JSON.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::common::text::non_empty;
use crate::common::{MediaKind, MediaResult};
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::Extractor;
use crate::kernel::BaseProcessRunner;

use super::api_clients::format_duration;

pub const YT_DLP: &str = "yt-dlp";

#[derive(Debug, Deserialize)]
pub struct YtDlpInfo {
    pub url: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub uploader: Option<String>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
pub struct YtDlpFormat {
    pub url: Option<String>,
    pub height: Option<u32>,
}

impl YtDlpInfo {
    /// Top-level URL, else the tallest format. Ties keep yt-dlp's order.
    pub fn best_url(&self) -> Option<String> {
        if let Some(url) = non_empty(self.url.clone()) {
            return Some(url);
        }
        let mut best: Option<&YtDlpFormat> = None;
        for format in self.formats.iter().filter(|f| {
            f.url.as_deref().is_some_and(|u| !u.trim().is_empty())
        }) {
            if best.map_or(true, |b| format.height.unwrap_or(0) > b.height.unwrap_or(0)) {
                best = Some(format);
            }
        }
        best.and_then(|f| f.url.clone())
    }
}

pub fn map_ytdlp_info(info: YtDlpInfo) -> Result<MediaResult> {
    let url = info
        .best_url()
        .ok_or(ExtractError::NoMedia("yt-dlp returned no playable format"))?;

    let mut media = MediaResult::new(MediaKind::Reel, url);
    media.thumbnail = non_empty(info.thumbnail);
    media.title = Some(non_empty(info.title).unwrap_or_else(|| "Instagram Reel".to_string()));
    media.author = non_empty(info.uploader);
    media.duration = format_duration(info.duration);
    media.quality = Some("High Quality (via yt-dlp)".to_string());
    Ok(media)
}

/// Skipped (fails) when the binary is not installed.
pub struct YtDlpExtractor {
    process: Arc<dyn BaseProcessRunner>,
}

impl YtDlpExtractor {
    pub fn new(process: Arc<dyn BaseProcessRunner>) -> Self {
        Self { process }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult> {
        let output = self.process.run(YT_DLP, &["-j", request.url.as_str()]).await?;

        if !output.success {
            debug!(stderr = %output.stderr.trim(), "yt-dlp exited with an error");
            return Err(ExtractError::NoMedia("yt-dlp could not read the post"));
        }

        let info: YtDlpInfo = serde_json::from_slice(&output.stdout)?;
        map_ytdlp_info(info)
    }
}
