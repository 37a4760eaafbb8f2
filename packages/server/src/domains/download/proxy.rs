//! Server-side media download proxy.
//!
//! Re-fetches a resolved media URL with platform Referer/Origin headers,
//! buffers the whole body and hands it back as an attachment.

use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::common::{MediaType, Platform};
use crate::domains::extraction::headers::DESKTOP_USER_AGENT;
use crate::kernel::{BaseHttpClient, HttpRequest, HttpTimeout};

use super::error::DownloadError;

/// Per-route proxy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProfile {
    /// Payloads below this many bytes are rejected
    pub min_bytes: usize,
    /// Send a HEAD first and stop on a non-2xx answer
    pub head_check: bool,
    pub head_timeout: Option<Duration>,
    /// Reject when the HEAD Content-Type is neither video nor image
    pub require_media_type: bool,
    pub get_timeout: Option<Duration>,
    /// Used when the upstream sends no Content-Type
    pub fallback_content_type: &'static str,
    pub filename_prefix: &'static str,
}

pub const DOWNLOAD_MEDIA: DownloadProfile = DownloadProfile {
    min_bytes: 50 * 1024,
    head_check: true,
    head_timeout: None,
    require_media_type: false,
    get_timeout: None,
    fallback_content_type: "video/mp4",
    filename_prefix: "media",
};

pub const DOWNLOAD_VIDEO: DownloadProfile = DownloadProfile {
    min_bytes: 50 * 1024,
    head_check: true,
    head_timeout: Some(Duration::from_secs(10)),
    require_media_type: false,
    get_timeout: Some(Duration::from_secs(60)),
    fallback_content_type: "video/mp4",
    filename_prefix: "video",
};

pub const PROXY_DOWNLOAD: DownloadProfile = DownloadProfile {
    min_bytes: 100 * 1024,
    head_check: true,
    head_timeout: None,
    require_media_type: true,
    get_timeout: Some(Duration::from_secs(30)),
    fallback_content_type: "application/octet-stream",
    filename_prefix: "media",
};

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub platform: Option<Platform>,
    pub media_type: Option<MediaType>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: String,
}

/// Platform whose Referer to send: the given one, else guessed from the URL.
fn referer_platform(request: &DownloadRequest) -> Option<Platform> {
    request.platform.or_else(|| {
        let url = request.url.to_ascii_lowercase();
        if url.contains("tiktok") {
            Some(Platform::Tiktok)
        } else if url.contains("instagram") || url.contains("cdninstagram") || url.contains("fbcdn") {
            Some(Platform::Instagram)
        } else {
            None
        }
    })
}

fn download_headers(platform: Option<Platform>) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = vec![
        ("User-Agent".into(), DESKTOP_USER_AGENT.into()),
        ("Accept".into(), "*/*".into()),
        ("Accept-Language".into(), "en-US,en;q=0.9".into()),
        ("Accept-Encoding".into(), "identity".into()),
        ("Cache-Control".into(), "no-cache".into()),
        ("Sec-Fetch-Dest".into(), "video".into()),
        ("Sec-Fetch-Mode".into(), "cors".into()),
        ("Sec-Fetch-Site".into(), "cross-site".into()),
    ];
    if let Some(platform) = platform {
        headers.push(("Referer".into(), platform.referer()));
        headers.push(("Origin".into(), platform.origin().into()));
    }
    headers
}

/// File extension for a Content-Type.
pub fn extension_for(content_type: &str) -> &'static str {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("webm") {
        "webm"
    } else if content_type.starts_with("image/") {
        if content_type.contains("png") {
            "png"
        } else {
            "jpg"
        }
    } else if content_type.starts_with("audio/") {
        "mp3"
    } else {
        "mp4"
    }
}

fn fallback_content_type(media_type: Option<MediaType>, profile: &DownloadProfile) -> &'static str {
    match media_type {
        Some(MediaType::Image | MediaType::Carousel) => "image/jpeg",
        Some(MediaType::Audio) => "audio/mpeg",
        _ => profile.fallback_content_type,
    }
}

/// Keep the name usable inside a quoted Content-Disposition value.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

fn filename_for(request: &DownloadRequest, profile: &DownloadProfile, extension: &str) -> String {
    request
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(sanitize_filename)
        .unwrap_or_else(|| {
            format!(
                "{}_{}.{}",
                profile.filename_prefix,
                chrono::Utc::now().timestamp_millis(),
                extension
            )
        })
}

fn map_send_error(err: anyhow::Error) -> DownloadError {
    if err.downcast_ref::<HttpTimeout>().is_some() {
        DownloadError::Timeout
    } else {
        DownloadError::Network(format!("{:#}", err))
    }
}

fn is_media_content_type(content_type: &str) -> bool {
    content_type.contains("video") || content_type.contains("image")
}

/// Best-effort HEAD: transport errors are ignored, a non-2xx answer is not.
async fn check_head(
    http: &dyn BaseHttpClient,
    url: &str,
    headers: &[(String, String)],
    profile: &DownloadProfile,
) -> Result<(), DownloadError> {
    let mut head = HttpRequest::head(url).headers(headers.to_vec());
    if let Some(head_timeout) = profile.head_timeout {
        head = head.timeout(head_timeout);
    }

    let response = match http.send(head).await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "HEAD request failed, continuing with GET");
            return Ok(());
        }
    };

    if !response.is_success() {
        return Err(DownloadError::NotAccessible {
            status: response.status,
        });
    }

    let content_type = response.header("content-type").filter(|ct| !ct.is_empty());
    debug!(
        content_type = content_type.unwrap_or("unknown"),
        content_length = response.header("content-length").unwrap_or("unknown"),
        "HEAD check ok"
    );

    match content_type {
        Some(ct) if profile.require_media_type && !is_media_content_type(ct) => {
            Err(DownloadError::NotMedia {
                content_type: ct.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Download `request.url` through the proxy.
pub async fn download_media(
    http: &dyn BaseHttpClient,
    request: &DownloadRequest,
    profile: &DownloadProfile,
) -> Result<DownloadedMedia, DownloadError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(DownloadError::MissingUrl);
    }

    let headers = download_headers(referer_platform(request));

    if profile.head_check {
        check_head(http, url, &headers, profile).await?;
    }

    let mut get = HttpRequest::get(url).headers(headers);
    if let Some(get_timeout) = profile.get_timeout {
        get = get.timeout(get_timeout);
    }
    let response = http.send(get).await.map_err(map_send_error)?;

    if !response.is_success() {
        warn!(status = response.status, url = %url, "Upstream refused download");
        return Err(DownloadError::UpstreamStatus {
            status: response.status,
        });
    }

    let size = response.body.len();
    if size < profile.min_bytes {
        warn!(size, min = profile.min_bytes, url = %url, "Downloaded payload too small");
        return Err(DownloadError::TooSmall { size });
    }

    let content_type = response
        .header("content-type")
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| fallback_content_type(request.media_type, profile))
        .to_string();
    let filename = filename_for(request, profile, extension_for(&content_type));

    info!(size, content_type = %content_type, filename = %filename, "Proxied download");

    Ok(DownloadedMedia {
        bytes: response.body,
        content_type,
        filename,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("video/webm"), "webm");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("audio/mpeg"), "mp3");
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for("application/octet-stream"), "mp4");
    }

    #[test]
    fn test_every_route_sends_head_but_only_proxy_checks_type() {
        for profile in [DOWNLOAD_MEDIA, DOWNLOAD_VIDEO, PROXY_DOWNLOAD] {
            assert!(profile.head_check);
        }
        assert!(PROXY_DOWNLOAD.require_media_type);
        assert!(!DOWNLOAD_MEDIA.require_media_type);
        assert!(is_media_content_type("image/webp"));
        assert!(!is_media_content_type("text/html; charset=utf-8"));
    }

    #[test]
    fn test_referer_guessed_from_url() {
        let request = DownloadRequest {
            url: "https://v16-webapp.tiktok.com/video/a.mp4".into(),
            platform: None,
            media_type: None,
            filename: None,
        };
        assert_eq!(referer_platform(&request), Some(Platform::Tiktok));

        let headers = download_headers(Some(Platform::Instagram));
        assert!(headers
            .iter()
            .any(|(k, v)| k == "Referer" && v == "https://www.instagram.com/"));
    }

    #[test]
    fn test_generated_filename() {
        let request = DownloadRequest {
            url: "https://cdn/x".into(),
            platform: None,
            media_type: None,
            filename: Some("  ".into()),
        };
        let name = filename_for(&request, &DOWNLOAD_VIDEO, "webm");
        assert!(name.starts_with("video_"));
        assert!(name.ends_with(".webm"));

        let request = DownloadRequest {
            filename: Some("my \"clip\"/é.mp4".into()),
            ..request
        };
        assert_eq!(filename_for(&request, &DOWNLOAD_VIDEO, "mp4"), "my _clip___.mp4");
    }
}
