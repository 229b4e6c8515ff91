// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Send path: persistence, backend failures, citations and the in-flight rule.

use std::sync::Arc;

use hive_agent::{PendingFile, SendRequest};
use hive_core::HiveError;
use hive_core::contract::{Part, Tool};
use hive_core::types::{ChatAttachment, ModelTier, Role, SharedInsight};
use hive_test_utils::{MockReply, TestHarness};

#[tokio::test]
async fn send_appends_question_and_answer() {
    let harness = TestHarness::builder()
        .with_texts(["The handbook says 30 days."])
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "HR").await.unwrap();

    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("How much leave?"))
        .await
        .unwrap()
        .answer;
    assert_eq!(answer.role, Role::Model);
    assert_eq!(answer.text, "The handbook says 30 days.");

    let conversation = harness.app.conversation(&user_id, &kb_id).await;
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[0].role, Role::User);
    assert_eq!(conversation[0].text, "How much leave?");
    assert_eq!(conversation[1].id, answer.id);
}

#[tokio::test]
async fn backend_failure_becomes_error_turn() {
    let harness = TestHarness::builder()
        .with_replies(vec![
            MockReply::Text("first answer".into()),
            MockReply::Fail("quota exceeded for model".into()),
        ])
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "HR").await.unwrap();

    harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("one"))
        .await
        .unwrap();
    let before = harness.app.conversation(&user_id, &kb_id).await;

    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("two"))
        .await
        .unwrap()
        .answer;
    assert!(answer.is_error);
    assert!(answer.text.starts_with("quota exceeded for model"));

    let after = harness.app.conversation(&user_id, &kb_id).await;
    assert_eq!(after.len(), before.len() + 2);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(after[before.len()].text, "two");
    assert_eq!(after[before.len() + 1].id, answer.id);
    assert!(!harness.app.is_generating(&user_id, &kb_id));
}

#[tokio::test]
async fn inline_citations_are_extracted_and_stripped() {
    let raw = r#"Paris is the capital. [Source: doc1.pdf, Context: "located in France"] More info. [Source: doc1.pdf, Context: "located in France"]"#;
    let harness = TestHarness::builder().with_texts([raw]).build().await.unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Geo").await.unwrap();

    let answer = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("capital?"))
        .await
        .unwrap()
        .answer;
    let citations = answer.citations.unwrap();
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].source, "doc1.pdf");
    assert_eq!(citations[0].context, "located in France");
    assert!(!answer.text.contains("[Source"));
}

#[tokio::test]
async fn second_send_while_in_flight_is_rejected() {
    let harness = Arc::new(
        TestHarness::builder()
            .with_texts(["slow answer"])
            .gated()
            .build()
            .await
            .unwrap(),
    );
    let (user_id, kb_id) = harness.user_and_kb("alice", "HR").await.unwrap();

    let first = {
        let harness = harness.clone();
        let (user_id, kb_id) = (user_id.clone(), kb_id.clone());
        tokio::spawn(async move {
            harness
                .app
                .send(&user_id, &kb_id, SendRequest::text("first"))
                .await
        })
    };
    harness.backend.wait_for_call().await;
    assert!(harness.app.is_generating(&user_id, &kb_id));

    let second = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("second"))
        .await;
    assert!(matches!(second, Err(HiveError::GenerationInFlight)));
    assert_eq!(harness.backend.call_count(), 1);

    harness.backend.release();
    let answer = first.await.unwrap().unwrap().answer;
    assert_eq!(answer.text, "slow answer");

    let texts: Vec<String> = harness
        .app
        .conversation(&user_id, &kb_id)
        .await
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["first", "slow answer"]);

    // The guard is released once the first generation finishes.
    harness.backend.release();
    assert!(
        harness
            .app
            .send(&user_id, &kb_id, SendRequest::text("third"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn other_conversations_are_not_blocked() {
    let harness = Arc::new(TestHarness::builder().gated().build().await.unwrap());
    let (user_id, kb_id) = harness.user_and_kb("alice", "HR").await.unwrap();
    let other_kb = harness.app.create_knowledge_base("Eng").await.unwrap();

    let first = {
        let harness = harness.clone();
        let (user_id, kb_id) = (user_id.clone(), kb_id.clone());
        tokio::spawn(async move {
            harness
                .app
                .send(&user_id, &kb_id, SendRequest::text("hold"))
                .await
        })
    };
    harness.backend.wait_for_call().await;

    harness.backend.release();
    harness.backend.release();
    let other = harness
        .app
        .send(&user_id, &other_kb.id, SendRequest::text("elsewhere"))
        .await;
    assert!(other.is_ok());
    first.await.unwrap().unwrap();
}

#[tokio::test]
async fn request_carries_files_attachments_history_and_tools() {
    let harness = TestHarness::builder()
        .with_texts(["a1", "a2"])
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    harness
        .app
        .add_files(
            &kb_id,
            vec![PendingFile::new("policy.txt", "text/plain", b"policy".to_vec())],
        )
        .await
        .unwrap();

    harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("q1"))
        .await
        .unwrap();
    let attachment = ChatAttachment::new("shot.png", "image/png", b"png".to_vec());
    harness
        .app
        .send(
            &user_id,
            &kb_id,
            SendRequest::text("q2")
                .with_attachments(vec![attachment])
                .with_tier(ModelTier::Reasoning)
                .with_web_search(true),
        )
        .await
        .unwrap();

    let request = harness.backend.last_request().await.unwrap();
    let config = harness.app.config();
    assert_eq!(request.model, config.models.reasoning_model);
    assert_eq!(request.temperature, config.models.reasoning_temperature);
    assert_eq!(request.tools, Some(vec![Tool::WebSearch {}]));

    assert_eq!(request.contents.len(), 3);
    assert_eq!(request.contents[0].parts, vec![Part::text("q1")]);
    assert_eq!(request.contents[1].parts, vec![Part::text("a1")]);
    assert_eq!(
        request.contents[2].parts,
        vec![
            Part::inline("text/plain", b"policy".to_vec()),
            Part::inline("image/png", b"png".to_vec()),
            Part::text("q2"),
        ]
    );

    let first = &harness.backend.requests().await[0];
    assert_eq!(first.model, config.models.fast_model);
    assert!(first.tools.is_none());
}

#[tokio::test]
async fn recent_insights_reach_the_system_instruction() {
    let harness = TestHarness::new().await.unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();
    let insights = hive_storage::SharedInsightRepository::new(harness.app.store().clone());
    insights
        .add_insight(&SharedInsight::new("Q: vpn?\nA: use the portal...", None))
        .await
        .unwrap();

    harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("hi"))
        .await
        .unwrap();
    let request = harness.backend.last_request().await.unwrap();
    assert!(request.system_instruction.contains("Q: vpn?"));
}

#[tokio::test]
async fn invalid_sends_write_nothing() {
    let harness = TestHarness::builder()
        .with_config(|c| c.uploads.max_attachment_bytes = 4)
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();

    let empty = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("   "))
        .await;
    assert!(matches!(empty, Err(HiveError::Validation(_))));

    // Nothing is left once the only attachment is dropped.
    let big = ChatAttachment::new("big.bin", "application/octet-stream", vec![0; 5]);
    let only_oversized = harness
        .app
        .send(&user_id, &kb_id, SendRequest::text("").with_attachments(vec![big]))
        .await;
    assert!(matches!(only_oversized, Err(HiveError::FileTooLarge { .. })));

    let unknown = harness
        .app
        .send(&user_id, "no-such-kb", SendRequest::text("hi"))
        .await;
    assert!(matches!(unknown, Err(HiveError::NotFound { .. })));

    assert!(harness.app.conversation(&user_id, &kb_id).await.is_empty());
    assert_eq!(harness.backend.call_count(), 0);
}

#[tokio::test]
async fn oversized_attachment_is_dropped_and_the_turn_still_goes_out() {
    let harness = TestHarness::builder()
        .with_texts(["got it"])
        .with_config(|c| c.uploads.max_attachment_bytes = 4)
        .build()
        .await
        .unwrap();
    let (user_id, kb_id) = harness.user_and_kb("alice", "Docs").await.unwrap();

    let outcome = harness
        .app
        .send(
            &user_id,
            &kb_id,
            SendRequest::text("see files").with_attachments(vec![
                ChatAttachment::new("ok.txt", "text/plain", b"ok".to_vec()),
                ChatAttachment::new("big.bin", "application/octet-stream", vec![0; 5]),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(outcome.answer.text, "got it");
    assert!(matches!(
        &outcome.rejected[..],
        [HiveError::FileTooLarge { name, size: 5, limit: 4 }] if name == "big.bin"
    ));
    assert_eq!(harness.backend.call_count(), 1);

    let request = harness.backend.last_request().await.unwrap();
    assert_eq!(
        request.contents.last().unwrap().parts,
        vec![Part::inline("text/plain", b"ok".to_vec()), Part::text("see files")]
    );

    let conversation = harness.app.conversation(&user_id, &kb_id).await;
    assert_eq!(conversation.len(), 2);
    let kept = conversation[0].attachments.as_ref().unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "ok.txt");
}
