//! Canned upstream responses.
//!
//! Page HTML is trimmed down to the tags and script fragments the
//! extractors actually look at.

#![allow(dead_code)]

use mediaforge_core::kernel::HttpResponse;
use serde_json::{json, Value};

pub const TIKTOK_URL: &str = "https://www.tiktok.com/@baker/video/7301234567890";
pub const INSTAGRAM_POST_URL: &str = "https://www.instagram.com/p/Cabc123/";
pub const INSTAGRAM_REEL_URL: &str = "https://www.instagram.com/reel/Cxyz789/";
/// `INSTAGRAM_POST_URL` with the trailing slash removed.
pub const INSTAGRAM_POST_URL_CLEAN: &str = "https://www.instagram.com/p/Cabc123";

pub const TIKWM_API: &str = "https://www.tikwm.com/api/";
pub const BITLOADER_API: &str = "https://www.bitloader.app/api/v1/download";
pub const SAVEFROM_API: &str = "https://savefrom.net/api/convert";
pub const SNAPTIK_API: &str = "https://snaptik.app/v2/download";
pub const SSSTIK_API: &str = "https://ssstik.io/download";
pub const RAPIDAPI_HOST: &str =
    "https://instagram-downloader-download-instagram-videos-stories.p.rapidapi.com";

pub const CDN_VIDEO: &str = "https://cdn.example.com/media/clip.mp4";

/// `code: 0` TikWM body carrying only a watermarked rendition.
pub fn tikwm_watermarked_only() -> Value {
    json!({
        "code": 0,
        "data": {
            "hdplay": "",
            "play": null,
            "wmplay": "https://v16.tikwm.com/wm/clip.mp4",
            "cover": "https://p16.tikwm.com/cover.jpg",
            "title": "Sourdough in 60 seconds",
            "author": { "unique_id": "baker" },
            "duration": 61,
            "size": 3145728
        }
    })
}

pub fn tikwm_hd() -> Value {
    json!({
        "code": 0,
        "data": {
            "hdplay": "https://v16.tikwm.com/hd/clip.mp4",
            "play": "https://v16.tikwm.com/sd/clip.mp4",
            "wmplay": "https://v16.tikwm.com/wm/clip.mp4",
            "title": "Sourdough in 60 seconds",
            "author": { "unique_id": "baker" }
        }
    })
}

pub fn play_api_failure() -> Value {
    json!({ "code": -1, "msg": "Url parsing is failed!" })
}

/// A TikTok page exposing both Open Graph video tags.
pub fn tiktok_page_with_og_video() -> String {
    r#"<!DOCTYPE html><html><head>
<meta property="og:title" content="Sourdough in 60 seconds">
<meta property="og:description" content="Video by @baker on TikTok">
<meta property="og:image" content="https://p16-sign.tiktokcdn.com/cover.jpeg">
<meta property="og:video:secure_url" content="https://v16-webapp.tiktok.com/secure/clip.mp4">
<meta property="og:video" content="http://v16-webapp.tiktok.com/plain/clip.mp4">
</head><body></body></html>"#
        .to_string()
}

/// Mobile TikTok markup: no Open Graph video, only an escaped play address.
pub fn tiktok_page_with_play_addr() -> String {
    r#"<!DOCTYPE html><html><head><title>TikTok</title></head><body>
<script id="SIGI_STATE">{"video":{"cover":"https://p16-sign.tiktokcdn.com/still.jpeg",
"playAddr":"https:\u002F\u002Fv16-webapp.tiktok.com\u002Fvideo\u002Ftos\u002Fx.mp4?a=1\u0026b=2"}}</script>
</body></html>"#
        .to_string()
}

/// yt-dlp `-j` output without a top-level URL.
pub fn ytdlp_reel_info() -> Value {
    json!({
        "title": "Crumb shot",
        "uploader": "weekendbaker",
        "thumbnail": "https://scontent.cdninstagram.com/v/reel-cover.jpg",
        "duration": 14.0,
        "formats": [
            { "url": "https://scontent.cdninstagram.com/v/reel-480.mp4", "height": 480 },
            { "url": "https://scontent.cdninstagram.com/v/reel-1080.mp4", "height": 1080 },
            { "url": "https://scontent.cdninstagram.com/v/reel-audio.m4a" }
        ]
    })
}

/// A page with nothing extractable.
pub fn empty_page() -> String {
    "<!DOCTYPE html><html><head><title>Page not available</title></head><body></body></html>"
        .to_string()
}

/// Carousel page whose display URLs appear out of lexicographic order.
pub fn carousel_page() -> String {
    r#"<!DOCTYPE html><html><head><title>Weekend bakes &#x2022; Instagram</title></head><body>
<script type="text/javascript">
{"edge_sidecar_to_children":{"edges":[
  {"node":{"display_url":"https://scontent.cdninstagram.com/v/b.jpg"}},
  {"node":{"display_url":"https://scontent.cdninstagram.com/v/a.jpg"}}
]},"owner":{"username":"weekendbaker"}}
</script>
</body></html>"#
        .to_string()
}

pub fn reel_page() -> String {
    r#"<!DOCTYPE html><html><head>
<meta property="og:title" content="Crumb shot">
<meta property="og:image" content="https://scontent.cdninstagram.com/v/reel-cover.jpg">
<meta property="og:video" content="https://scontent.cdninstagram.com/v/reel.mp4">
</head><body></body></html>"#
        .to_string()
}

/// Redirect to another path on the Instagram origin.
pub fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::new(302, "").with_header("location", location)
}

/// Binary payload of `size` bytes.
pub fn media_payload(size: usize, content_type: &str) -> HttpResponse {
    HttpResponse::ok(vec![0u8; size]).with_header("content-type", content_type)
}
