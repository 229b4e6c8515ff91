// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thumbs-up learning loop.

use hive_agent::SendRequest;
use hive_core::HiveError;
use hive_core::types::{ChatMessage, Feedback};
use hive_test_utils::{MockReply, TestHarness};

#[tokio::test]
async fn thumbs_up_creates_one_truncated_insight() {
    let long_answer = "x".repeat(500);
    let harness = TestHarness::builder()
        .with_texts([long_answer.clone()])
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("How do I reset my password?"))
        .await
        .unwrap()
        .answer;

    let outcome = harness
        .app
        .feedback(&user_id, &kb_id, &answer.id, Feedback::Up)
        .await
        .unwrap();
    let insight = outcome.insight.unwrap();
    assert!(insight.content.contains("How do I reset my password?"));
    assert_eq!(
        insight.content,
        format!("Q: How do I reset my password?\nA: {}...", "x".repeat(200))
    );
    assert_eq!(insight.source_base_id.as_deref(), Some(kb_id.as_str()));

    let all = harness.app.insights().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, insight.id);

    let conversation = harness.app.conversation(&user_id, &kb_id).await;
    assert_eq!(conversation[1].feedback, Some(Feedback::Up));
}

#[tokio::test]
async fn thumbs_down_records_tag_only() {
    let harness = TestHarness::builder().with_texts(["meh"]).build().await.unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("q"))
        .await
        .unwrap()
        .answer;

    let outcome = harness
        .app
        .feedback(&user_id, &kb_id, &answer.id, Feedback::Down)
        .await
        .unwrap();
    assert!(outcome.insight.is_none());
    assert!(harness.app.insights().await.is_empty());
    assert_eq!(
        harness.app.conversation(&user_id, &kb_id).await[1].feedback,
        Some(Feedback::Down)
    );
}

#[tokio::test]
async fn thumbs_down_keeps_earlier_insight() {
    let harness = TestHarness::builder().with_texts(["good"]).build().await.unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("q"))
        .await
        .unwrap()
        .answer;

    harness
        .app
        .feedback(&user_id, &kb_id, &answer.id, Feedback::Up)
        .await
        .unwrap();
    harness
        .app
        .feedback(&user_id, &kb_id, &answer.id, Feedback::Down)
        .await
        .unwrap();
    assert_eq!(harness.app.insights().await.len(), 1);
}

#[tokio::test]
async fn thumbs_up_without_preceding_question_only_tags() {
    let harness = TestHarness::new().await.unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();

    // A model turn first in its sequence, stored directly.
    let orphan = ChatMessage::model("unprompted", vec![]);
    let history = hive_storage::ChatHistoryRepository::new(harness.app.store().clone());
    history
        .append(&user_id, &kb_id, vec![orphan.clone()])
        .await
        .unwrap();

    let outcome = harness
        .app
        .feedback(&user_id, &kb_id, &orphan.id, Feedback::Up)
        .await
        .unwrap();
    assert!(outcome.insight.is_none());
    assert!(harness.app.insights().await.is_empty());
}

#[tokio::test]
async fn thumbs_up_on_error_turn_learns_nothing() {
    let harness = TestHarness::builder()
        .with_replies(vec![MockReply::Fail("backend down".into())])
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("q"))
        .await
        .unwrap()
        .answer;
    assert!(answer.is_error);

    let outcome = harness
        .app
        .feedback(&user_id, &kb_id, &answer.id, Feedback::Up)
        .await
        .unwrap();
    assert!(outcome.insight.is_none());
}

#[tokio::test]
async fn feedback_on_unknown_message_is_not_found() {
    let harness = TestHarness::new().await.unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    let result = harness
        .app
        .feedback(&user_id, &kb_id, "missing", Feedback::Up)
        .await;
    assert!(matches!(result, Err(HiveError::NotFound { .. })));
}

#[tokio::test]
async fn retention_cap_prunes_oldest_insights() {
    let harness = TestHarness::builder()
        .with_config(|c| {
            c.context.insight_window = 1;
            c.insights.max_retained = Some(2);
        })
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();

    for i in 0..3 {
        let answer = harness
            .app
            .send(&user_id, &kb_id, SendRequest::text(format!("question {i}")))
            .await
            .unwrap()
            .answer;
        harness
            .app
            .feedback(&user_id, &kb_id, &answer.id, Feedback::Up)
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let contents: Vec<String> = harness
        .app
        .insights()
        .await
        .into_iter()
        .map(|i| i.content)
        .collect();
    assert_eq!(contents.len(), 2);
    assert!(contents[0].contains("question 1"));
    assert!(contents[1].contains("question 2"));
}
