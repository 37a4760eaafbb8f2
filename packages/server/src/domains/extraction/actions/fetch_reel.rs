//! Dedicated reel lookup: yt-dlp, then BitLoader, then the reel page parser.

use crate::common::{ExtractionOutcome, MediaType, Platform};
use crate::domains::extraction::activities::api_clients::BitLoaderClient;
use crate::domains::extraction::activities::instagram::ReelPageExtractor;
use crate::domains::extraction::activities::YtDlpExtractor;
use crate::domains::extraction::error::{ExtractError, Result};
use crate::domains::extraction::request::ExtractionRequest;
use crate::domains::extraction::strategy::ExtractionChain;
use crate::kernel::ServerDeps;

pub const REEL_FAILURE: &str =
    "Could not extract the reel. It might be private, deleted, or region-restricted.";

/// Reject anything that is not an `instagram.com/reel/` link.
pub fn reel_request(url: Option<&str>) -> Result<ExtractionRequest> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ExtractError::MissingUrl)?;
    if !url.contains("instagram.com/reel/") {
        return Err(ExtractError::NotAReel {
            url: url.to_string(),
        });
    }
    ExtractionRequest::new(Platform::Instagram, url, MediaType::Reel)
}

pub async fn fetch_reel(deps: &ServerDeps, request: &ExtractionRequest) -> ExtractionOutcome {
    ExtractionChain::new(REEL_FAILURE)
        .then(YtDlpExtractor::new(deps.process.clone()))
        .then(BitLoaderClient::new(deps.http.clone()))
        .then(ReelPageExtractor::new(deps.http.clone()))
        .run(request, deps.audit.as_ref())
        .await
}
