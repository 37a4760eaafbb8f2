//! End-to-end extraction through the strategy chains, with every upstream
//! served by `MockHttpClient`.

mod common;

use common::*;
use mediaforge_core::common::{ExtractionOutcome, MediaKind, MediaType, Platform};
use mediaforge_core::domains::extraction::actions::extract_media::{
    INSTAGRAM_FAILURE, TIKTOK_FAILURE,
};
use mediaforge_core::domains::extraction::headers::MOBILE_USER_AGENT;
use mediaforge_core::domains::extraction::{
    extract_from_input, extract_media, fetch_reel, reel_request, ExtractionRequest,
};
use mediaforge_core::kernel::{
    HttpResponse, MockHttpClient, MockProcessRunner, SpyAuditLog, TestDependencies,
};

fn tiktok_request() -> ExtractionRequest {
    ExtractionRequest::new(Platform::Tiktok, TIKTOK_URL, MediaType::Video).unwrap()
}

#[tokio::test]
async fn unsupported_url_never_touches_the_network() {
    let deps = TestDependencies::new();

    let outcome = extract_from_input(
        &deps.server_deps(),
        Some("https://www.youtube.com/watch?v=abc"),
        None,
        None,
    )
    .await;

    assert_eq!(
        outcome.error(),
        Some("Only TikTok and Instagram URLs are supported")
    );
    assert_eq!(deps.http.call_count(), 0);
    assert!(deps.audit.extractions().is_empty());
}

#[tokio::test]
async fn tikwm_hd_rendition_wins() {
    let deps =
        TestDependencies::new().mock_http(MockHttpClient::new().on_json(TIKWM_API, tikwm_hd()));

    let outcome = extract_media(&deps.server_deps(), &tiktok_request()).await;

    let media = outcome.media().expect("extraction should succeed");
    assert_eq!(media.url, "https://v16.tikwm.com/hd/clip.mp4");
    assert_eq!(media.quality.as_deref(), Some("HD (1080p)"));
    assert_eq!(media.author.as_deref(), Some("baker"));

    let calls = deps.http.calls_to(TIKWM_API);
    assert_eq!(calls.len(), 1);
    let body = calls[0].body.clone().unwrap_or_default();
    assert!(body.contains("hd=1"));
    assert!(body.contains("url=https%3A%2F%2Fwww.tiktok.com"));
}

#[tokio::test]
async fn watermarked_rendition_is_labelled_not_upgraded() {
    let deps = TestDependencies::new()
        .mock_http(MockHttpClient::new().on_json(TIKWM_API, tikwm_watermarked_only()));

    let outcome = extract_media(&deps.server_deps(), &tiktok_request()).await;

    let media = outcome.media().unwrap();
    assert_eq!(media.url, "https://v16.tikwm.com/wm/clip.mp4");
    assert_eq!(media.quality.as_deref(), Some("Watermarked"));
    assert_eq!(media.duration.as_deref(), Some("61s"));
}

#[tokio::test]
async fn tiktok_falls_back_to_meta_tags_and_prefers_secure_url() {
    let http = MockHttpClient::new()
        .on_json(TIKWM_API, play_api_failure())
        .on_html(TIKTOK_URL, &tiktok_page_with_og_video());
    let deps = TestDependencies::new().mock_http(http);

    let outcome = extract_media(&deps.server_deps(), &tiktok_request()).await;

    let media = outcome.media().unwrap();
    assert_eq!(media.url, "https://v16-webapp.tiktok.com/secure/clip.mp4");
    assert_eq!(media.kind, MediaKind::Video);
    assert_eq!(media.title.as_deref(), Some("Sourdough in 60 seconds"));
    assert_eq!(media.author.as_deref(), Some("baker"));
    assert_eq!(
        deps.http.requested_urls(),
        vec![TIKWM_API.to_string(), TIKTOK_URL.to_string()]
    );
}

#[tokio::test]
async fn tiktok_pattern_scan_runs_last_with_mobile_agent() {
    let http = MockHttpClient::new()
        .on_json(TIKWM_API, play_api_failure())
        .on_html(TIKTOK_URL, &tiktok_page_with_play_addr());
    let deps = TestDependencies::new().mock_http(http);
    let request = ExtractionRequest::new(
        Platform::Tiktok,
        &format!("{}?is_from_webapp=1&sender_device=pc", TIKTOK_URL),
        MediaType::Video,
    )
    .unwrap();

    let outcome = extract_media(&deps.server_deps(), &request).await;

    let media = outcome.media().unwrap();
    assert_eq!(media.url, "https://v16-webapp.tiktok.com/video/tos/x.mp4?a=1&b=2");
    assert_eq!(media.quality.as_deref(), Some("Standard"));
    assert_eq!(media.title.as_deref(), Some("TikTok Video"));

    let pages = deps.http.calls_to(TIKTOK_URL);
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.url == TIKTOK_URL));
    assert_ne!(pages[0].header_value("User-Agent"), Some(MOBILE_USER_AGENT));
    assert_eq!(pages[1].header_value("User-Agent"), Some(MOBILE_USER_AGENT));

    let rows = deps.audit.extractions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].input_url, TIKTOK_URL);
}

#[tokio::test]
async fn audio_requests_keep_the_audio_kind() {
    let deps =
        TestDependencies::new().mock_http(MockHttpClient::new().on_json(TIKWM_API, tikwm_hd()));
    let request = ExtractionRequest::new(Platform::Tiktok, TIKTOK_URL, MediaType::Audio).unwrap();

    let media = extract_media(&deps.server_deps(), &request)
        .await
        .media()
        .cloned()
        .unwrap();

    assert_eq!(media.kind, MediaKind::Audio);
    assert_eq!(media.quality.as_deref(), Some("Audio Only"));
}

#[tokio::test]
async fn exhausted_tiktok_chain_returns_one_message_and_no_audit_row() {
    let http = MockHttpClient::new()
        .fail(TIKWM_API, "connection reset")
        .on(TIKTOK_URL, HttpResponse::new(404, empty_page()));
    let deps = TestDependencies::new().mock_http(http);

    let outcome = extract_media(&deps.server_deps(), &tiktok_request()).await;

    assert_eq!(outcome, ExtractionOutcome::Failure(TIKTOK_FAILURE.to_string()));
    assert!(deps.audit.extractions().is_empty());
}

#[tokio::test]
async fn instagram_video_walks_the_api_chain_in_order() {
    let http = MockHttpClient::new()
        .fail(BITLOADER_API, "timeout")
        .on(SAVEFROM_API, HttpResponse::new(500, "oops"))
        .on_json(RAPIDAPI_HOST, serde_json::json!({ "error": "quota" }))
        .on_json(SNAPTIK_API, play_api_failure())
        .on_json(SSSTIK_API, play_api_failure())
        .on_html(INSTAGRAM_POST_URL_CLEAN, &empty_page());
    let deps = TestDependencies::new().mock_http(http).rapidapi_key("rk-test");
    let request =
        ExtractionRequest::new(Platform::Instagram, INSTAGRAM_POST_URL, MediaType::Video).unwrap();

    let outcome = extract_media(&deps.server_deps(), &request).await;

    assert_eq!(outcome.error(), Some(INSTAGRAM_FAILURE));
    let urls = deps.http.requested_urls();
    assert_eq!(urls.len(), 7);
    assert_eq!(urls[0], BITLOADER_API);
    assert_eq!(urls[1], SAVEFROM_API);
    assert!(urls[2].starts_with(RAPIDAPI_HOST));
    assert_eq!(urls[3], SNAPTIK_API);
    assert_eq!(urls[4], SSSTIK_API);
    assert_eq!(urls[5], INSTAGRAM_POST_URL_CLEAN);
    assert_eq!(urls[6], INSTAGRAM_POST_URL_CLEAN);

    let rapid = &deps.http.calls_to(RAPIDAPI_HOST)[0];
    assert_eq!(rapid.header_value("X-RapidAPI-Key"), Some("rk-test"));
}

#[tokio::test]
async fn carousel_images_are_sorted_and_audited() {
    let http = MockHttpClient::new().on_html(INSTAGRAM_POST_URL, &carousel_page());
    let deps = TestDependencies::new().mock_http(http);

    let outcome = extract_from_input(
        &deps.server_deps(),
        Some(INSTAGRAM_POST_URL),
        None,
        Some(MediaType::Carousel),
    )
    .await;

    let media = outcome.media().unwrap();
    assert_eq!(media.kind, MediaKind::Carousel);
    assert_eq!(
        media.images,
        Some(vec![
            "https://scontent.cdninstagram.com/v/a.jpg".to_string(),
            "https://scontent.cdninstagram.com/v/b.jpg".to_string(),
        ])
    );
    assert_eq!(media.url, "https://scontent.cdninstagram.com/v/a.jpg");
    assert_eq!(media.author.as_deref(), Some("weekendbaker"));

    let rows = deps.audit.extractions();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].platform, Platform::Instagram);
    assert_eq!(rows[0].media_type, MediaType::Carousel);
}

#[tokio::test]
async fn instagram_page_redirect_is_followed_once() {
    let http = MockHttpClient::new()
        .on(INSTAGRAM_POST_URL, redirect_to("/p/Cnew456/"))
        .on_html("https://www.instagram.com/p/Cnew456/", &carousel_page());
    let deps = TestDependencies::new().mock_http(http);
    let request =
        ExtractionRequest::new(Platform::Instagram, INSTAGRAM_POST_URL, MediaType::Carousel)
            .unwrap();

    let outcome = extract_media(&deps.server_deps(), &request).await;

    assert!(outcome.is_success());
    let calls = deps.http.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].follow_redirects);
    assert_eq!(calls[1].url, "https://www.instagram.com/p/Cnew456/");
}

#[tokio::test]
async fn reel_lookup_uses_bitloader_then_page() {
    let http = MockHttpClient::new()
        .on_json(BITLOADER_API, serde_json::json!({ "code": 1 }))
        .on_html(INSTAGRAM_REEL_URL, &reel_page());
    let deps = TestDependencies::new().mock_http(http);

    let request = reel_request(Some(INSTAGRAM_REEL_URL)).unwrap();
    let outcome = fetch_reel(&deps.server_deps(), &request).await;

    let media = outcome.media().unwrap();
    assert_eq!(media.kind, MediaKind::Reel);
    assert_eq!(media.url, "https://scontent.cdninstagram.com/v/reel.mp4");
    assert_eq!(media.title.as_deref(), Some("Crumb shot"));

    // yt-dlp is not installed in the default test deps, so it was tried and skipped
    assert_eq!(
        deps.process.invocations(),
        vec![vec!["yt-dlp".to_string(), "-j".to_string(), INSTAGRAM_REEL_URL.to_string()]]
    );
}

#[tokio::test]
async fn reel_lookup_prefers_ytdlp_tallest_format() {
    let deps = TestDependencies::new()
        .mock_process(MockProcessRunner::with_stdout(&ytdlp_reel_info().to_string()));

    let request = reel_request(Some(INSTAGRAM_REEL_URL)).unwrap();
    let outcome = fetch_reel(&deps.server_deps(), &request).await;

    let media = outcome.media().unwrap();
    assert_eq!(media.url, "https://scontent.cdninstagram.com/v/reel-1080.mp4");
    assert_eq!(media.quality.as_deref(), Some("High Quality (via yt-dlp)"));
    assert_eq!(media.duration.as_deref(), Some("14s"));
    assert_eq!(deps.http.call_count(), 0);
    assert_eq!(deps.audit.extractions().len(), 1);
}

#[tokio::test]
async fn failing_ytdlp_falls_back_to_bitloader() {
    let http = MockHttpClient::new().on_json(
        BITLOADER_API,
        serde_json::json!({ "code": 0, "data": { "url": "https://scontent.cdninstagram.com/v/bl.mp4" } }),
    );
    let deps = TestDependencies::new()
        .mock_http(http)
        .mock_process(MockProcessRunner::exiting_with("ERROR: login required"));

    let request = reel_request(Some(INSTAGRAM_REEL_URL)).unwrap();
    let outcome = fetch_reel(&deps.server_deps(), &request).await;

    assert_eq!(
        outcome.media().unwrap().url,
        "https://scontent.cdninstagram.com/v/bl.mp4"
    );
    assert_eq!(deps.process.invocations().len(), 1);
    assert_eq!(deps.http.requested_urls(), vec![BITLOADER_API.to_string()]);
}

#[tokio::test]
async fn extraction_is_idempotent_for_fixed_upstreams() {
    let http = MockHttpClient::new()
        .on_json(TIKWM_API, play_api_failure())
        .on_html(TIKTOK_URL, &tiktok_page_with_og_video());
    let deps = TestDependencies::new()
        .mock_http(http)
        .mock_audit(SpyAuditLog::new());
    let server_deps = deps.server_deps();

    let first = extract_media(&server_deps, &tiktok_request()).await;
    let second = extract_media(&server_deps, &tiktok_request()).await;

    assert_eq!(first, second);
    assert_eq!(deps.audit.extractions().len(), 2);
}
