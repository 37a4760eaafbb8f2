//! Ordered fallback over extraction strategies.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::common::text::clean_post_url;
use crate::common::{ExtractionOutcome, MediaResult};
use crate::kernel::{log_extraction, AuditRecord, BaseAuditLog};

use super::error::Result;
use super::request::ExtractionRequest;

/// One self-contained way of resolving a media URL.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    async fn attempt(&self, request: &ExtractionRequest) -> Result<MediaResult>;
}

/// Strategies tried sequentially until the first success.
pub struct ExtractionChain {
    strategies: Vec<Box<dyn Extractor>>,
    failure_message: String,
}

impl ExtractionChain {
    pub fn new(failure_message: impl Into<String>) -> Self {
        Self {
            strategies: Vec::new(),
            failure_message: failure_message.into(),
        }
    }

    pub fn then(mut self, strategy: impl Extractor + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain. A success writes one audit row; total failure writes none
    /// and returns the chain's single failure message.
    pub async fn run(
        &self,
        request: &ExtractionRequest,
        audit: &dyn BaseAuditLog,
    ) -> ExtractionOutcome {
        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), url = %request.url, "Trying extraction strategy");

            match strategy.attempt(request).await {
                Ok(media) => {
                    info!(
                        strategy = strategy.name(),
                        platform = %request.platform,
                        kind = ?media.kind,
                        "Extraction succeeded"
                    );
                    log_extraction(
                        audit,
                        AuditRecord::from_result(
                            request.platform,
                            &clean_post_url(&request.url),
                            request.media_type,
                            &media,
                        ),
                    )
                    .await;
                    return ExtractionOutcome::Success(media);
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Extraction strategy failed");
                }
            }
        }

        ExtractionOutcome::Failure(self.failure_message.clone())
    }
}
