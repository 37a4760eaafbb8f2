//! Clients for third-party download-proxy APIs.
//!
//! Each client POSTs (or GETs) the post URL to an external service and maps
//! its JSON into a `MediaResult`. Any non-2xx status, malformed body, or
//! missing media URL is a strategy failure.

pub mod bitloader;
pub mod play_api;
pub mod rapidapi;
pub mod savefrom;

pub use bitloader::BitLoaderClient;
pub use play_api::{PlayApiClient, PlayApiProfile, SNAPTIK, SSSTIK, TIKWM};
pub use rapidapi::RapidApiClient;
pub use savefrom::SaveFromClient;

use url::form_urlencoded;

use crate::common::text::clean_post_url;
use crate::common::{MediaType, Platform};

/// Quality label for single-rendition services.
pub(crate) fn single_quality(media_type: MediaType) -> &'static str {
    if media_type.is_audio() {
        "Audio Only"
    } else {
        "High Quality"
    }
}

pub(crate) fn default_title(platform: Platform) -> String {
    format!("{} Video", platform.display_name())
}

/// Seconds rendered as "{n}s". Zero means the service did not know.
pub(crate) fn format_duration(seconds: Option<f64>) -> Option<String> {
    seconds.filter(|s| *s > 0.0).map(|s| format!("{}s", s))
}

/// Bytes rendered as whole megabytes, e.g. "12MB". Zero is treated as absent.
pub(crate) fn format_megabytes(bytes: Option<f64>) -> Option<String> {
    bytes
        .filter(|b| *b > 0.0)
        .map(|b| format!("{}MB", (b / 1024.0 / 1024.0).round() as u64))
}

/// Form body carrying the cleaned post URL plus any extra pairs.
pub(crate) fn url_form(post_url: &str, extra: &[(&str, &str)]) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("url", &clean_post_url(post_url));
    for (key, value) in extra {
        form.append_pair(key, value);
    }
    form.finish()
}
