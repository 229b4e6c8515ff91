// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback processing: thumbs-up on an answer becomes a shared insight.

use std::sync::Arc;

use tracing::{debug, info};

use hive_core::HiveError;
use hive_core::types::{ChatMessage, Feedback, Role, SharedInsight};
use hive_storage::{ChatHistoryRepository, SharedInsightRepository};

/// What a feedback event produced beyond the recorded tag.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    pub tag: Feedback,
    /// The insight created, if this was a thumbs-up on a model answer
    /// directly preceded by its question.
    pub insight: Option<SharedInsight>,
}

pub struct FeedbackProcessor {
    history: Arc<ChatHistoryRepository>,
    insights: Arc<SharedInsightRepository>,
    excerpt_chars: usize,
}

impl FeedbackProcessor {
    pub fn new(
        history: Arc<ChatHistoryRepository>,
        insights: Arc<SharedInsightRepository>,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            history,
            insights,
            excerpt_chars,
        }
    }

    /// Record `tag` on the message and, for a thumbs-up, derive an insight.
    ///
    /// Thumbs-down never creates or removes insights.
    pub async fn apply(
        &self,
        user_id: &str,
        kb_id: &str,
        message_id: &str,
        tag: Feedback,
    ) -> Result<FeedbackOutcome, HiveError> {
        let conversation = self
            .history
            .set_feedback(user_id, kb_id, message_id, tag)
            .await?;

        if tag != Feedback::Up {
            debug!(user_id, kb_id, message_id, %tag, "feedback recorded");
            return Ok(FeedbackOutcome { tag, insight: None });
        }

        let Some(content) = insight_source(&conversation, message_id)
            .map(|(question, answer)| insight_content(&question.text, &answer.text, self.excerpt_chars))
        else {
            debug!(user_id, kb_id, message_id, "thumbs-up without a preceding question, no insight");
            return Ok(FeedbackOutcome { tag, insight: None });
        };

        let insight = SharedInsight::new(content, Some(kb_id.to_string()));
        self.insights.add_insight(&insight).await?;
        metrics::counter!("hive_insights_created_total").increment(1);
        info!(kb_id, message_id, insight_id = %insight.id, "insight learned from feedback");
        Ok(FeedbackOutcome {
            tag,
            insight: Some(insight),
        })
    }
}

/// The (question, answer) pair for a thumbs-up, if `message_id` is a
/// non-error model turn whose immediately preceding turn is a user turn.
fn insight_source<'a>(
    conversation: &'a [ChatMessage],
    message_id: &str,
) -> Option<(&'a ChatMessage, &'a ChatMessage)> {
    let index = conversation.iter().position(|m| m.id == message_id)?;
    let answer = &conversation[index];
    if answer.role != Role::Model || answer.is_error {
        return None;
    }
    let question = conversation.get(index.checked_sub(1)?)?;
    (question.role == Role::User).then_some((question, answer))
}

/// `Q: <question>\nA: <first n chars of answer>...`
pub fn insight_content(question: &str, answer: &str, excerpt_chars: usize) -> String {
    let excerpt: String = answer.chars().take(excerpt_chars).collect();
    format!("Q: {question}\nA: {excerpt}...")
}
