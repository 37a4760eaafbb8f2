// Common types used across the extraction, download and routing layers.
//
// These are the wire shapes the HTTP API speaks, so serde naming follows
// the JSON contract (camelCase, lowercase enum tags).

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Platform
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Instagram,
}

impl Platform {
    /// Detect the platform from a URL by domain substring.
    pub fn detect(url: &str) -> Option<Self> {
        [Self::Tiktok, Self::Instagram]
            .into_iter()
            .find(|platform| platform.recognizes(url))
    }

    /// Whether the URL carries one of this platform's domain substrings.
    pub fn recognizes(&self, url: &str) -> bool {
        let url = url.to_ascii_lowercase();
        self.domains().iter().any(|domain| url.contains(domain))
    }

    pub fn domains(&self) -> &'static [&'static str] {
        match self {
            // short links live on vm./vt.
            Self::Tiktok => &["tiktok.com", "vm.tiktok.com", "vt.tiktok.com"],
            Self::Instagram => &["instagram.com"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tiktok => "TikTok",
            Self::Instagram => "Instagram",
        }
    }

    pub fn origin(&self) -> &'static str {
        match self {
            Self::Tiktok => "https://www.tiktok.com",
            Self::Instagram => "https://www.instagram.com",
        }
    }

    /// Referer sent with page fetches and proxied downloads.
    pub fn referer(&self) -> String {
        format!("{}/", self.origin())
    }

    /// Keyword used to accept CDN URLs as belonging to this platform.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Tiktok => "tiktok",
            Self::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// Requested media type
// =============================================================================

/// What the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Video,
    Audio,
    #[serde(alias = "photo", alias = "images")]
    Image,
    #[serde(alias = "reels")]
    Reel,
    #[serde(alias = "stories")]
    Story,
    #[serde(alias = "carousels")]
    Carousel,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Reel => "reel",
            Self::Story => "story",
            Self::Carousel => "carousel",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio)
    }
}

// =============================================================================
// Extraction result
// =============================================================================

/// What kind of media a result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Reel,
    Carousel,
}

impl MediaKind {
    /// Video or audio depending on what was requested.
    pub fn playable(media_type: MediaType) -> Self {
        if media_type.is_audio() {
            Self::Audio
        } else {
            Self::Video
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResult {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    /// Only set for carousels with at least two images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl MediaResult {
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            thumbnail: None,
            title: None,
            author: None,
            duration: None,
            quality: None,
            file_size: None,
            images: None,
        }
    }
}

/// Final answer of an extraction, in the shape the API returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Success(MediaResult),
    Failure(String),
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn media(&self) -> Option<&MediaResult> {
        match self {
            Self::Success(media) => Some(media),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }
}

impl Serialize for ExtractionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExtractionOutcome", 2)?;
        match self {
            Self::Success(media) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", media)?;
            }
            Self::Failure(message) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", message)?;
            }
        }
        state.end()
    }
}
