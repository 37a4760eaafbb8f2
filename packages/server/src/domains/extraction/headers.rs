//! Browser-like header sets for third-party APIs and platform pages.

use crate::common::Platform;

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Headers for a JSON download-proxy API hosted at `origin`.
pub fn api_headers(origin: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".into(), DESKTOP_USER_AGENT.into()),
        ("Accept".into(), "application/json, text/plain, */*".into()),
        ("Accept-Language".into(), "en-US,en;q=0.9".into()),
        ("Origin".into(), origin.into()),
        ("Referer".into(), format!("{}/", origin)),
    ]
}

/// Headers for fetching a post page on `platform`.
pub fn page_headers(platform: Platform, user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".into(), user_agent.into()),
        ("Accept".into(), HTML_ACCEPT.into()),
        ("Accept-Language".into(), "en-US,en;q=0.9".into()),
        ("Cache-Control".into(), "no-cache".into()),
        ("Referer".into(), platform.referer()),
    ]
}

/// TikTok serves lighter markup with embedded play URLs to mobile browsers.
pub fn pattern_user_agent(platform: Platform) -> &'static str {
    match platform {
        Platform::Tiktok => MOBILE_USER_AGENT,
        Platform::Instagram => DESKTOP_USER_AGENT,
    }
}
