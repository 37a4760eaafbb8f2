//! Server dependencies (using traits for testability)
//!
//! Central container handed to every domain function and route handler.
//! All external services sit behind `Base*` traits so tests can swap in the
//! mocks from `test_dependencies`.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::audit::{NoopAuditLog, PostgresAuditLog};
use crate::kernel::{
    BaseAI, BaseAuditLog, BaseHttpClient, BaseProcessRunner, OpenAIAdapter, ReqwestHttpClient,
    TokioProcessRunner,
};

#[derive(Clone)]
pub struct ServerDeps {
    /// Present only when DATABASE_URL is configured
    pub db_pool: Option<PgPool>,
    pub http: Arc<dyn BaseHttpClient>,
    pub audit: Arc<dyn BaseAuditLog>,
    /// Runs yt-dlp for reel lookups
    pub process: Arc<dyn BaseProcessRunner>,
    /// Meta generation is unavailable without an OpenAI key
    pub ai: Option<Arc<dyn BaseAI>>,
    /// Enables the RapidAPI Instagram strategy
    pub rapidapi_key: Option<String>,
}

impl ServerDeps {
    pub fn new(
        db_pool: Option<PgPool>,
        http: Arc<dyn BaseHttpClient>,
        audit: Arc<dyn BaseAuditLog>,
        process: Arc<dyn BaseProcessRunner>,
        ai: Option<Arc<dyn BaseAI>>,
        rapidapi_key: Option<String>,
    ) -> Self {
        Self {
            db_pool,
            http,
            audit,
            process,
            ai,
            rapidapi_key,
        }
    }

    /// Wire production implementations from configuration.
    pub fn from_config(config: &Config, db_pool: Option<PgPool>) -> Result<Self> {
        let audit: Arc<dyn BaseAuditLog> = match &db_pool {
            Some(pool) => Arc::new(PostgresAuditLog::new(pool.clone())),
            None => {
                tracing::warn!("DATABASE_URL not set, audit logging disabled");
                Arc::new(NoopAuditLog)
            }
        };

        let ai = config
            .openai_api_key
            .as_ref()
            .map(|key| Arc::new(OpenAIAdapter::new(key.clone())) as Arc<dyn BaseAI>);

        Ok(Self::new(
            db_pool,
            Arc::new(ReqwestHttpClient::new()?),
            audit,
            Arc::new(TokioProcessRunner::default()),
            ai,
            config.rapidapi_key.clone(),
        ))
    }
}
