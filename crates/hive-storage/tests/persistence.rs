// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data written through every repository survives a close and reopen.

use std::sync::Arc;

use hive_core::types::{ChatMessage, Feedback, SharedInsight, StoredFile};
use hive_storage::{
    ChatHistoryRepository, KnowledgeBaseRepository, SettingsRepository, SharedInsightRepository,
    Store, UserRepository,
};

#[tokio::test]
async fn every_collection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hive.db");
    let path = path.to_str().unwrap();

    let (user_id, kb_id, answer_id) = {
        let store = Arc::new(Store::open(path).await.unwrap());
        let users = UserRepository::new(store.clone());
        let bases = KnowledgeBaseRepository::new(store.clone());
        let history = ChatHistoryRepository::new(store.clone());
        let insights = SharedInsightRepository::new(store.clone());
        let settings = SettingsRepository::new(store.clone());

        let user = users.register("alice").await.unwrap();
        let kb = bases.create("Handbook").await.unwrap();
        bases
            .add_files(
                &kb.id,
                vec![StoredFile::new("a.txt", "text/plain", b"alpha".to_vec())],
            )
            .await
            .unwrap();
        let answer = ChatMessage::model("forty-two", vec![]);
        let answer_id = answer.id.clone();
        history
            .append(
                &user.id,
                &kb.id,
                vec![ChatMessage::user("what?", vec![]), answer],
            )
            .await
            .unwrap();
        history
            .set_feedback(&user.id, &kb.id, &answer_id, Feedback::Up)
            .await
            .unwrap();
        insights
            .add_insight(&SharedInsight::new("Q: what?\nA: forty-two...", Some(kb.id.clone())))
            .await
            .unwrap();
        settings.set_api_key("secret").await.unwrap();

        drop((users, bases, history, insights, settings));
        let store = Arc::into_inner(store).expect("sole owner");
        store.close().await.unwrap();
        (user.id, kb.id, answer_id)
    };

    let store = Arc::new(Store::open(path).await.unwrap());
    assert_eq!(store.schema_version(), 2);

    let user = UserRepository::new(store.clone()).login("alice").await.unwrap();
    assert_eq!(user.id, user_id);

    let kb = KnowledgeBaseRepository::new(store.clone())
        .get(&kb_id)
        .await
        .unwrap();
    assert_eq!(kb.files.len(), 1);
    assert_eq!(kb.files[0].content, b"alpha");

    let conversation = ChatHistoryRepository::new(store.clone())
        .conversation(&user_id, &kb_id)
        .await;
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[1].id, answer_id);
    assert_eq!(conversation[1].feedback, Some(Feedback::Up));

    let insights = SharedInsightRepository::new(store.clone()).list().await;
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].source_base_id.as_deref(), Some(kb_id.as_str()));

    assert_eq!(
        SettingsRepository::new(store).api_key().await.as_deref(),
        Some("secret")
    );
}
