//! Download domain - proxy resolved media URLs back to the browser.

pub mod error;
pub mod proxy;

pub use error::DownloadError;
pub use proxy::{
    download_media, DownloadProfile, DownloadRequest, DownloadedMedia, DOWNLOAD_MEDIA,
    DOWNLOAD_VIDEO, PROXY_DOWNLOAD,
};
