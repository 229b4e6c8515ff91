// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state, knowledge-base lifecycle and uploads through `HiveApp`.

use std::sync::Arc;

use hive_agent::{HiveApp, PendingFile, SendRequest};
use hive_config::HiveConfig;
use hive_core::HiveError;
use hive_test_utils::{MockBackend, TestHarness};

#[tokio::test]
async fn register_twice_and_unknown_login_are_rejected() {
    let harness = TestHarness::new().await.unwrap();
    harness.app.register("alice").await.unwrap();
    assert!(matches!(
        harness.app.register("alice").await,
        Err(HiveError::DuplicateUser(_))
    ));
    assert!(matches!(
        harness.app.login("bob").await,
        Err(HiveError::UserNotFound(_))
    ));
}

#[tokio::test]
async fn login_and_logout_drive_the_session() {
    let harness = TestHarness::new().await.unwrap();
    let alice = harness.app.register("alice").await.unwrap();
    harness.app.logout().await;
    assert!(harness.app.active_user().await.is_none());

    harness.app.login("alice").await.unwrap();
    assert_eq!(harness.app.active_user().await, Some(alice));
}

#[tokio::test]
async fn deleting_active_base_clears_selection() {
    let harness = TestHarness::new().await.unwrap();
    harness.app.register("alice").await.unwrap();
    let kb = harness.app.create_knowledge_base("Docs").await.unwrap();
    let other = harness.app.create_knowledge_base("Other").await.unwrap();

    harness.app.select_knowledge_base(&kb.id).await.unwrap();
    assert_eq!(harness.app.active_knowledge_base().await.unwrap().id, kb.id);

    harness.app.delete_knowledge_base(&other.id).await.unwrap();
    assert_eq!(harness.app.session().await.knowledge_base_id, Some(kb.id.clone()));

    assert!(harness.app.delete_knowledge_base(&kb.id).await.unwrap());
    assert!(harness.app.session().await.knowledge_base_id.is_none());
    assert!(harness.app.active_knowledge_base().await.is_none());
    assert!(matches!(
        harness.app.send_active(SendRequest::text("hi")).await,
        Err(HiveError::Validation(_))
    ));
}

#[tokio::test]
async fn selecting_unknown_base_is_not_found() {
    let harness = TestHarness::new().await.unwrap();
    assert!(matches!(
        harness.app.select_knowledge_base("nope").await,
        Err(HiveError::NotFound { .. })
    ));
}

#[tokio::test]
async fn send_active_uses_session() {
    let harness = TestHarness::builder().with_texts(["ok"]).build().await.unwrap();
    let user = harness.app.register("alice").await.unwrap();
    let kb = harness.app.create_knowledge_base("Docs").await.unwrap();
    harness.app.select_knowledge_base(&kb.id).await.unwrap();

    let answer = harness.app.send_active(SendRequest::text("hello")).await.unwrap().answer;
    assert_eq!(answer.text, "ok");
    assert_eq!(harness.app.conversation(&user.id, &kb.id).await.len(), 2);
}

#[tokio::test]
async fn upload_batch_skips_oversized_files() {
    let harness = TestHarness::builder()
        .with_config(|c| c.uploads.max_file_bytes = 8)
        .build()
        .await
        .unwrap();
    let kb = harness.app.create_knowledge_base("Docs").await.unwrap();

    let batch = harness
        .app
        .add_files(
            &kb.id,
            vec![
                PendingFile::new("small.txt", "text/plain", b"tiny".to_vec()),
                PendingFile::new("large.txt", "text/plain", b"way too large".to_vec()),
                PendingFile::new("also.txt", "text/plain", b"ok".to_vec()),
            ],
        )
        .await
        .unwrap();
    assert_eq!(batch.accepted.len(), 2);
    assert_eq!(batch.rejected.len(), 1);

    let stored = harness.app.knowledge_base(&kb.id).await.unwrap();
    let names: Vec<&str> = stored.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["small.txt", "also.txt"]);

    let removed = harness
        .app
        .remove_file(&kb.id, &stored.files[0].id)
        .await
        .unwrap();
    assert_eq!(removed.files.len(), 1);
    assert_eq!(removed.files[0].name, "also.txt");
}

#[tokio::test]
async fn upload_to_unknown_knowledge_base_is_not_found() {
    let harness = TestHarness::builder()
        .with_config(|c| c.uploads.max_file_bytes = 2)
        .build()
        .await
        .unwrap();

    // Every file is oversized, so nothing would reach the store.
    let result = harness
        .app
        .add_files(
            "no-such-kb",
            vec![PendingFile::new("large.txt", "text/plain", b"too large".to_vec())],
        )
        .await;
    assert!(matches!(result, Err(HiveError::NotFound { .. })));
}

#[tokio::test]
async fn histories_are_private_per_user() {
    let harness = TestHarness::builder().with_texts(["a", "b"]).build().await.unwrap();
    let alice = harness.app.register("alice").await.unwrap();
    let bob = harness.app.register("bob").await.unwrap();
    let kb = harness.app.create_knowledge_base("Shared").await.unwrap();

    harness
        .app
        .send(&alice.id, &kb.id, SendRequest::text("alice asks"))
        .await
        .unwrap();
    assert!(harness.app.conversation(&bob.id, &kb.id).await.is_empty());
    assert_eq!(harness.app.conversation(&alice.id, &kb.id).await.len(), 2);
}

#[tokio::test]
async fn open_fails_when_store_path_is_unusable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = HiveConfig::default();
    config.storage.database_path = blocker.join("hive.db").to_string_lossy().to_string();
    let result = HiveApp::open(config, Arc::new(MockBackend::new())).await;
    assert!(matches!(result, Err(HiveError::StoreOpen { .. })));
}

#[tokio::test]
async fn data_persists_across_app_instances() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = HiveConfig::default();
    config.storage.database_path = dir.path().join("hive.db").to_string_lossy().to_string();

    let kb_id = {
        let app = HiveApp::open(config.clone(), Arc::new(MockBackend::new()))
            .await
            .unwrap();
        app.register("alice").await.unwrap();
        let kb = app.create_knowledge_base("Docs").await.unwrap();
        app.shutdown().await.unwrap();
        kb.id
    };

    let app = HiveApp::open(config, Arc::new(MockBackend::new()))
        .await
        .unwrap();
    assert!(app.login("alice").await.is_ok());
    assert_eq!(app.knowledge_bases().await[0].id, kb_id);
}
