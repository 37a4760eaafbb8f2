//! Postgres audit sink against a real database.
//!
//! These start a Postgres container. Run with:
//! `cargo test --test audit_tests -- --ignored`

mod common;

use common::*;
use mediaforge_core::common::{MediaKind, MediaResult, MediaType, Platform};
use mediaforge_core::kernel::{
    log_extraction, AuditRecord, BaseAuditLog, GenerationRecord, PostgresAuditLog,
};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn extraction_row_uses_column_defaults(ctx: &mut TestHarness) {
    let audit = PostgresAuditLog::new(ctx.db_pool.clone());
    let url = "https://www.tiktok.com/@audit/video/1001";
    let media = MediaResult::new(MediaKind::Video, CDN_VIDEO);

    log_extraction(
        &audit,
        AuditRecord::from_result(Platform::Tiktok, url, MediaType::Video, &media),
    )
    .await;

    let rows = ctx.generation_rows(url).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.user_email, "anonymous");
    assert_eq!(row.input_type, "tiktok");
    assert_eq!(row.tone.as_deref(), Some("video"));
    assert_eq!(row.generated_title.as_deref(), Some("TikTok Media"));
    assert_eq!(row.generated_description.as_deref(), Some("Unknown"));
    assert_eq!(row.focus_keyword, None);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn generation_row_round_trips(ctx: &mut TestHarness) {
    let audit = PostgresAuditLog::new(ctx.db_pool.clone());
    let content = "Crusty loaves delivered every Saturday";

    audit
        .record_generation(&GenerationRecord {
            input_type: "text".into(),
            input_content: content.into(),
            focus_keyword: Some("bread delivery".into()),
            tone: "friendly".into(),
            title: "Fresh Bread Delivery".into(),
            description: "Crusty loaves at your door.".into(),
        })
        .await
        .unwrap();

    let rows = ctx.generation_rows(content).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].input_type, "text");
    assert_eq!(rows[0].focus_keyword.as_deref(), Some("bread delivery"));
    assert_eq!(rows[0].generated_title.as_deref(), Some("Fresh Bread Delivery"));
}
