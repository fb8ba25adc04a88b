//! Store open / reopen / close tests

use crate::*;
use std::time::Duration;
use testdb::prelude::*;
use testdb::SchemaStatus;

#[tokio::test]
async fn test_reopen_keeps_data() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("campaign.db");

    let db = TestDb::open(&path).await.unwrap();
    assert_eq!(db.schema_status(), SchemaStatus::Created);
    assert!(db.path().is_absolute());
    let run_id = db.runs.new_run("fuzzingclient", &json!({"cases": ["1.*"]})).await.unwrap();
    let result_id = db
        .results
        .save_result(run_id, &CaseOutcome::new("1.2.8", "OK"))
        .await
        .unwrap();
    db.close().await.unwrap();

    let db = TestDb::open(&path).await.unwrap();
    assert_eq!(db.schema_status(), SchemaStatus::Verified);
    let run = db.runs.get_run(run_id).await.unwrap().unwrap();
    assert!(run.status().is_open());
    let stored = db.results.get_result::<CaseOutcome>(result_id).await.unwrap();
    assert_eq!(stored.case.as_deref(), Some("1.2.8"));
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_operations_after_close_unavailable() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingclient", &json!({})).await.unwrap();
    let results = store.db.results.clone();

    store.db.close().await.unwrap();
    assert!(store.db.pool_stats().closed);

    let err = results
        .save_result(run_id, &CaseOutcome::new("1.1.1", "OK"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PoolUnavailable { .. }));
    assert!(err.is_infrastructure());

    // closing again is harmless
    store.db.close().await.unwrap();
}

#[tokio::test]
async fn test_builder_settings_applied() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let builder = TestDb::builder()
        .path(dir.path().join("tuned.db"))
        .pool_size(2)
        .acquire_timeout(Duration::from_millis(500))
        .busy_timeout(Duration::from_millis(250));
    assert_eq!(builder.config().pool_size, 2);

    let db = builder.open().await.unwrap();
    for _ in 0..5 {
        db.runs.new_run("fuzzingserver", &json!({})).await.unwrap();
    }
    assert!(db.pool_stats().open <= 2);
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_zero_pool_size_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let err = TestDb::builder()
        .path(dir.path().join("never.db"))
        .pool_size(0)
        .open()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PoolUnavailable { .. }));
}
