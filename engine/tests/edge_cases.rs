//! Edge case tests for strand-engine
//!
//! These tests cover boundary conditions and unusual inputs.

mod common;

use common::{client, Todo};
use proptest::prelude::*;
use std::sync::Arc;
use strand_engine::{
    AddOp, Client, MemoryOperationLog, MemoryRecordStore, Operation, OperationKind, OperationLog,
};

// ============================================================================
// String Edge Cases
// ============================================================================

#[tokio::test]
async fn unicode_titles_round_trip() {
    let (client, _) = client();

    let titles = [
        "日本語テスト",
        "Привет мир",
        "مرحبا بالعالم",
        "🎉🚀💯",
        "Hello\nWorld\tTab",
        "Null\0Test",
        "",
    ];

    for title in titles {
        let mut todo = Todo::new(title);
        client.save(&mut todo).await.unwrap();

        let stored: Todo = client
            .get_by_id(todo.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, title);
    }

    assert_eq!(client.log().len().await.unwrap(), titles.len());
}

#[tokio::test]
async fn caller_supplied_ids_are_kept_verbatim() {
    let (client, _) = client();
    let mut todo = Todo {
        id: Some("todo/with spaces:and#symbols".into()),
        ..Todo::new("odd id")
    };

    client.save(&mut todo).await.unwrap();

    let ops = client.log().get_operations(None).await.unwrap();
    assert_eq!(ops[0].record_id(), "todo/with spaces:and#symbols");
}

// ============================================================================
// Save Semantics
// ============================================================================

#[tokio::test]
async fn saving_unchanged_record_still_logs_modify() {
    let (client, _) = client();
    let mut todo = Todo::new("same");
    client.save(&mut todo).await.unwrap();
    client.save(&mut todo).await.unwrap();

    let ops = client.log().get_operations(None).await.unwrap();
    assert_eq!(ops.len(), 2);
    let Operation::Modify(modify) = &ops[1] else {
        panic!("expected modify");
    };
    // Frozen clock: updatedAt is re-stamped with the same value.
    assert!(modify.changes.is_empty());
}

#[tokio::test]
async fn untracked_then_tracked_save_stamps_on_update_only() {
    let (client, _) = client();
    let mut todo = Todo::new("late tracking");
    client
        .save_with(&mut todo, strand_engine::WriteOptions::UNTRACKED)
        .await
        .unwrap();

    client.save(&mut todo).await.unwrap();

    assert!(todo.created_at.is_none());
    assert!(todo.updated_at.is_some());
    let ops = client.log().get_operations(None).await.unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind(), OperationKind::Modify);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_of_distinct_records_each_log_once() {
    let client = Client::new(
        Arc::new(MemoryRecordStore::new()),
        Arc::new(MemoryOperationLog::new()),
        common::tables(),
    );

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let mut todo = Todo::new(&format!("parallel {i}"));
                client.save(&mut todo).await.map(|_| todo)
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 32);

    assert_eq!(client.store().count("todos"), 32);
    assert_eq!(client.log().len().await.unwrap(), 32);
}

// ============================================================================
// Operation Log Pagination
// ============================================================================

proptest! {
    #[test]
    fn get_operations_is_an_ordered_prefix(total in 0usize..40, limit in 0usize..60) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let log = MemoryOperationLog::new();
            let ops: Vec<Operation> = (0..total)
                .map(|i| Operation::Add(AddOp::new("t", format!("r{i}"), serde_json::json!({}), chrono::Utc::now())))
                .collect();
            log.add_operations(&ops).await.unwrap();

            let page = log.get_operations(Some(limit)).await.unwrap();
            assert_eq!(page.len(), limit.min(total));
            assert_eq!(page, ops[..limit.min(total)].to_vec());
            assert_eq!(log.get_operations(None).await.unwrap(), ops);
        });
    }
}
