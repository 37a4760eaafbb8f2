use crate::common::{MediaType, Platform};

use super::error::{ExtractError, Result};

/// A validated extraction request.
///
/// Construction fails for URLs that do not belong to the platform, so every
/// value of this type is safe to hand to a network-touching strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub platform: Platform,
    pub url: String,
    pub media_type: MediaType,
}

impl ExtractionRequest {
    pub fn new(platform: Platform, url: &str, media_type: MediaType) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractError::MissingUrl);
        }
        if !platform.recognizes(url) {
            return Err(ExtractError::UnsupportedUrl {
                url: url.to_string(),
            });
        }
        Ok(Self {
            platform,
            url: url.to_string(),
            media_type,
        })
    }

    /// Build from loosely-typed API input. The platform is detected from the
    /// URL when not given; the media type defaults to video.
    pub fn from_input(
        url: Option<&str>,
        platform: Option<Platform>,
        media_type: Option<MediaType>,
    ) -> Result<Self> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ExtractError::MissingUrl)?;

        let platform = platform
            .or_else(|| Platform::detect(url))
            .ok_or_else(|| ExtractError::UnsupportedUrl {
                url: url.to_string(),
            })?;

        Self::new(platform, url, media_type.unwrap_or_default())
    }
}
