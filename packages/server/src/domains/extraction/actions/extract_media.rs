//! Platform extraction orchestrator.

use tracing::info;

use crate::common::{ExtractionOutcome, MediaType, Platform};
use crate::domains::extraction::activities::api_clients::{
    BitLoaderClient, PlayApiClient, RapidApiClient, SaveFromClient, SNAPTIK, SSSTIK, TIKWM,
};
use crate::domains::extraction::activities::instagram::{
    CarouselExtractor, CarouselScan, ReelPageExtractor,
};
use crate::domains::extraction::activities::{HtmlPatternExtractor, MetaTagExtractor};
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::ExtractionChain;
use crate::kernel::ServerDeps;

pub const TIKTOK_FAILURE: &str =
    "Could not extract video from TikTok. The video might be private, deleted, or region-restricted.";

pub const INSTAGRAM_FAILURE: &str =
    "Could not extract media from Instagram. The post might be private, deleted, or region-restricted.";

pub fn failure_message(platform: Platform) -> &'static str {
    match platform {
        Platform::Tiktok => TIKTOK_FAILURE,
        Platform::Instagram => INSTAGRAM_FAILURE,
    }
}

/// Ordered strategies for a request.
///
/// - TikTok: TikWM, meta tags, HTML patterns.
/// - Instagram reel: reel page parser only.
/// - Instagram carousel: carousel parser, broad carousel parser, meta tags,
///   HTML patterns.
/// - Instagram video: BitLoader, SaveFrom, RapidAPI (when keyed), SnapTik,
///   SSSTikTok, meta tags, HTML patterns.
/// - Anything else: meta tags, HTML patterns.
pub fn build_chain(deps: &ServerDeps, request: &ExtractionRequest) -> ExtractionChain {
    let http = &deps.http;
    let chain = ExtractionChain::new(failure_message(request.platform));

    let chain = match (request.platform, request.media_type) {
        (Platform::Tiktok, _) => chain.then(PlayApiClient::new(http.clone(), TIKWM)),
        (Platform::Instagram, MediaType::Reel) => {
            return chain.then(ReelPageExtractor::new(http.clone()));
        }
        (Platform::Instagram, MediaType::Carousel) => chain
            .then(CarouselExtractor::new(http.clone(), CarouselScan::Standard))
            .then(CarouselExtractor::new(http.clone(), CarouselScan::Broad)),
        (Platform::Instagram, MediaType::Video) => {
            let mut chain = chain
                .then(BitLoaderClient::new(http.clone()))
                .then(SaveFromClient::new(http.clone()));
            if let Some(key) = &deps.rapidapi_key {
                chain = chain.then(RapidApiClient::new(http.clone(), key.clone()));
            }
            chain
                .then(PlayApiClient::new(http.clone(), SNAPTIK))
                .then(PlayApiClient::new(http.clone(), SSSTIK))
        }
        (Platform::Instagram, _) => chain,
    };

    chain
        .then(MetaTagExtractor::new(http.clone()))
        .then(HtmlPatternExtractor::new(http.clone()))
}

/// Resolve a validated request to a direct media URL.
pub async fn extract_media(deps: &ServerDeps, request: &ExtractionRequest) -> ExtractionOutcome {
    let chain = build_chain(deps, request);
    info!(
        platform = %request.platform,
        media_type = request.media_type.as_str(),
        url = %request.url,
        strategies = ?chain.strategy_names(),
        "Extracting media"
    );
    chain.run(request, deps.audit.as_ref()).await
}

/// Validate raw input, then extract. Invalid input never reaches the network.
pub async fn extract_from_input(
    deps: &ServerDeps,
    url: Option<&str>,
    platform: Option<Platform>,
    media_type: Option<MediaType>,
) -> ExtractionOutcome {
    match ExtractionRequest::from_input(url, platform, media_type) {
        Ok(request) => extract_media(deps, &request).await,
        Err(e) => ExtractionOutcome::Failure(e.to_string()),
    }
}
