// Audit sinks for the `generations` table
//
// The store is write-only from this service's point of view. Callers go
// through `log_extraction` / `log_generation`, which never fail.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::{AuditRecord, BaseAuditLog, GenerationRecord};
use crate::common::text::truncate_chars;

pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAuditLog for PostgresAuditLog {
    async fn record_extraction(&self, record: &AuditRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO generations (input_type, input_content, tone, generated_title, generated_description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.platform.keyword())
        .bind(record.input_url_column())
        .bind(record.media_type.as_str())
        .bind(record.title_column())
        .bind(record.author_column())
        .execute(&self.pool)
        .await
        .context("Failed to insert extraction audit row")?;
        Ok(())
    }

    async fn record_generation(&self, record: &GenerationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO generations (input_type, input_content, focus_keyword, tone, generated_title, generated_description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&record.input_type)
        .bind(truncate_chars(&record.input_content, 1000))
        .bind(record.focus_keyword.as_deref().map(|k| truncate_chars(k, 255)))
        .bind(&record.tone)
        .bind(&record.title)
        .bind(&record.description)
        .execute(&self.pool)
        .await
        .context("Failed to insert generation audit row")?;
        Ok(())
    }
}

/// Used when no database is configured.
pub struct NoopAuditLog;

#[async_trait]
impl BaseAuditLog for NoopAuditLog {
    async fn record_extraction(&self, record: &AuditRecord) -> Result<()> {
        debug!(platform = %record.platform, url = %record.input_url, "Audit disabled, skipping extraction row");
        Ok(())
    }

    async fn record_generation(&self, record: &GenerationRecord) -> Result<()> {
        debug!(input_type = %record.input_type, "Audit disabled, skipping generation row");
        Ok(())
    }
}

/// Write an extraction row, logging and discarding any failure.
pub async fn log_extraction(audit: &dyn BaseAuditLog, record: AuditRecord) {
    if let Err(e) = audit.record_extraction(&record).await {
        warn!(error = %e, platform = %record.platform, "Failed to write extraction audit row");
    }
}

/// Write a generation row, logging and discarding any failure.
pub async fn log_generation(audit: &dyn BaseAuditLog, record: GenerationRecord) {
    if let Err(e) = audit.record_generation(&record).await {
        warn!(error = %e, "Failed to write generation audit row");
    }
}
