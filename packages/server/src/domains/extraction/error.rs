//! Extraction error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Why a request was rejected or a single strategy failed.
///
/// Validation variants are reported to callers verbatim. Everything else is
/// logged and swallowed by the strategy chain.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Only TikTok and Instagram URLs are supported")]
    UnsupportedUrl { url: String },

    #[error("Please provide a valid Instagram reel URL")]
    NotAReel { url: String },

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Could not parse response: {0}")]
    Parse(String),

    #[error("{0}")]
    NoMedia(&'static str),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl ExtractError {
    /// Input problems detected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingUrl | Self::UnsupportedUrl { .. } | Self::NotAReel { .. }
        )
    }
}

impl From<anyhow::Error> for ExtractError {
    fn from(err: anyhow::Error) -> Self {
        Self::Network(format!("{:#}", err))
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
