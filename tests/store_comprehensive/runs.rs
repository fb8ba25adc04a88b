//! Run lifecycle tests

use crate::*;
use std::collections::HashSet;
use testdb::prelude::*;

#[tokio::test]
async fn test_new_run_every_mode() {
    let store = create_store().await;
    let mut seen = HashSet::new();

    for mode in TestMode::ALL {
        let spec = json!({"mode": mode.as_str(), "cases": ["*"]});
        let run_id = store.db.runs.new_run(mode.as_str(), &spec).await.unwrap();
        assert!(seen.insert(run_id), "run id reused");

        let run = store.db.runs.get_run(run_id).await.unwrap().unwrap();
        assert_eq!(run.mode, mode);
        assert_eq!(run.ended, None);
        assert_eq!(run.status(), RunStatus::Open);
        assert_eq!(run.spec, spec);
    }
}

#[tokio::test]
async fn test_new_run_unknown_modes() {
    let store = create_store().await;
    for mode in ["echoclient", "wampserver", "massconnect", "FUZZINGCLIENT", ""] {
        let err = store.db.runs.new_run(mode, &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMode { .. }), "mode {:?}", mode);
    }
}

#[tokio::test]
async fn test_spec_stored_verbatim() {
    let store = create_store().await;
    let spec = json!({
        "options": {"failByDrop": false},
        "outdir": "./reports/servers",
        "servers": [{"agent": "AutobahnServer", "url": "ws://localhost:9001"}],
        "cases": ["*"],
        "exclude-cases": ["9.*", "12.*", "13.*"],
        "exclude-agent-cases": {}
    });
    let run_id = store.db.runs.new_run("fuzzingclient", &spec).await.unwrap();
    let run = store.db.runs.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.spec, spec);
}

#[tokio::test]
async fn test_close_run_lifecycle() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingserver", &json!({})).await.unwrap();
    assert!(store.db.runs.exists(run_id).await.unwrap());

    let ended = store.db.runs.close_run(run_id).await.unwrap();
    let run = store.db.runs.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.status(), RunStatus::Closed);
    assert_eq!(run.ended, Some(ended));
    assert!(run.duration().is_some());

    let err = store.db.runs.close_run(run_id).await.unwrap_err();
    assert!(err.is_run_closed());
    assert!(!err.is_infrastructure());

    // closed runs stay readable
    assert!(store.db.runs.exists(run_id).await.unwrap());
}

#[tokio::test]
async fn test_close_unknown_run() {
    let store = create_store().await;
    let err = store.db.runs.close_run(RunId::new()).await.unwrap_err();
    assert!(matches!(err, Error::RunNotFound { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_closing_one_run_leaves_others_open() {
    let store = create_store().await;
    let a = store.db.runs.new_run("fuzzingclient", &json!({})).await.unwrap();
    let b = store.db.runs.new_run("fuzzingclient", &json!({})).await.unwrap();

    store.db.runs.close_run(a).await.unwrap();

    let b_run = store.db.runs.get_run(b).await.unwrap().unwrap();
    assert!(b_run.status().is_open());
    store
        .db
        .results
        .save_result(b, &CaseOutcome::new("1.1.1", "OK"))
        .await
        .unwrap();
}
