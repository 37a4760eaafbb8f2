use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Media not accessible: {status}")]
    NotAccessible { status: u16 },

    /// The HEAD check reported a Content-Type that is neither video nor image.
    #[error("URL does not point to a media file")]
    NotMedia { content_type: String },

    #[error("Failed to download: {status}")]
    UpstreamStatus { status: u16 },

    #[error("Download timeout - file may be too large")]
    Timeout,

    /// Undersized payloads are error pages or placeholders, not media.
    #[error("Downloaded file is too small")]
    TooSmall { size: usize },

    #[error("Failed to download media: {0}")]
    Network(String),
}

impl DownloadError {
    pub fn details(&self) -> Option<String> {
        match self {
            Self::TooSmall { size } => Some(format!(
                "File size: {} bytes. This might be an error page or placeholder.",
                size
            )),
            Self::NotMedia { content_type } => Some(format!("Content-Type: {}", content_type)),
            _ => None,
        }
    }
}
