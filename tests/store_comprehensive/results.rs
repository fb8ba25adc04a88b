//! Result persistence tests

use crate::*;
use serde::{Deserialize, Serialize};
use testdb::prelude::*;

/// Payload entity of a WAMP fuzzing executor, distinct from `CaseOutcome`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct WampOutcome {
    case: Option<String>,
    passed: Option<bool>,
    log: Option<Vec<String>>,
}

impl AttributeSet for WampOutcome {
    const KIND: &'static str = "WampOutcome";
    const ATTRIBUTES: &'static [&'static str] = &["case", "passed", "log"];
}

#[tokio::test]
async fn test_save_then_get_deep_equal() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingclient", &json!({})).await.unwrap();

    let outcome = CaseOutcome {
        case: Some("6.4.1".into()),
        behavior: Some("NON-STRICT".into()),
        behavior_close: Some("OK".into()),
        description: Some("Send invalid UTF-8 text message in 3 fragments.".into()),
        expectation: Some("The connection is failed immediately.".into()),
        expected: Some(json!({"NON-STRICT": [], "OK": []})),
        received: Some(json!([["timeout", "A"]])),
        passed: Some(true),
        duration: Some(2004),
    };
    let result_id = store.db.results.save_result(run_id, &outcome).await.unwrap();

    let stored = store.db.results.get_result::<CaseOutcome>(result_id).await.unwrap();
    assert_eq!(stored.id, result_id);
    assert_eq!(stored.run_id, run_id);
    assert_eq!(stored.result, outcome);
}

#[tokio::test]
async fn test_result_ids_are_unique() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingclient", &json!({})).await.unwrap();

    let mut ids = Vec::new();
    for i in 0..20 {
        let outcome = CaseOutcome::new(format!("1.1.{}", i), "OK");
        ids.push(store.db.results.save_result(run_id, &outcome).await.unwrap());
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    for (i, id) in ids.iter().enumerate() {
        let stored = store.db.results.get_result::<CaseOutcome>(*id).await.unwrap();
        assert_eq!(stored.case, Some(format!("1.1.{}", i)));
    }
}

#[tokio::test]
async fn test_save_to_unknown_run() {
    let store = create_store().await;
    let err = store
        .db
        .results
        .save_result(RunId::new(), &CaseOutcome::new("1.1.1", "OK"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RunNotFound { .. }));
}

#[tokio::test]
async fn test_save_to_closed_run() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingserver", &json!({})).await.unwrap();
    store.db.runs.close_run(run_id).await.unwrap();

    let err = store
        .db
        .results
        .save_result(run_id, &CaseOutcome::new("1.1.1", "OK"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RunAlreadyClosed { .. }));
}

#[tokio::test]
async fn test_results_readable_after_close() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingclient", &json!({})).await.unwrap();
    let result_id = store
        .db
        .results
        .save_result(run_id, &CaseOutcome::new("2.1", "OK"))
        .await
        .unwrap();
    store.db.runs.close_run(run_id).await.unwrap();

    let stored = store.db.results.get_result::<CaseOutcome>(result_id).await.unwrap();
    assert_eq!(stored.behavior.as_deref(), Some("OK"));
}

#[tokio::test]
async fn test_get_unknown_result() {
    let store = create_store().await;
    let err = store
        .db
        .results
        .get_result::<CaseOutcome>(ResultId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ResultNotFound { .. }));
}

#[tokio::test]
async fn test_custom_entity_roundtrip() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingwampclient", &json!({})).await.unwrap();

    let outcome = WampOutcome {
        case: Some("wamp.1".into()),
        passed: Some(false),
        log: Some(vec!["CALL".into(), "ERROR".into()]),
    };
    let result_id = store.db.results.save_result(run_id, &outcome).await.unwrap();

    let stored = store.db.results.get_result::<WampOutcome>(result_id).await.unwrap();
    assert_eq!(stored.result, outcome);
}

#[tokio::test]
async fn test_reading_as_other_entity_skips_foreign_attributes() {
    let store = create_store().await;
    let run_id = store.db.runs.new_run("fuzzingwampclient", &json!({})).await.unwrap();
    let outcome = WampOutcome {
        case: Some("wamp.2".into()),
        passed: Some(true),
        log: None,
    };
    let result_id = store.db.results.save_result(run_id, &outcome).await.unwrap();

    // `log` is not a CaseOutcome attribute; `case` and `passed` are
    let stored = store.db.results.get_result::<CaseOutcome>(result_id).await.unwrap();
    assert_eq!(stored.case.as_deref(), Some("wamp.2"));
    assert_eq!(stored.passed, Some(true));
    assert_eq!(stored.behavior, None);
}
