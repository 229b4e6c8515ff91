// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The send path: persist the question, call the backend, persist the answer.
//!
//! A backend failure never escapes `send`. It becomes an error-flagged model
//! turn appended to the conversation like any other answer.

use std::sync::Arc;

use tracing::{debug, info, warn};

use hive_context::{CitationExtractor, ContextAssembler, Turn};
use hive_core::types::{ChatAttachment, ChatMessage, ModelTier};
use hive_core::{HiveError, ModelBackend};
use hive_storage::{ChatHistoryRepository, KnowledgeBaseRepository, SharedInsightRepository};

use crate::inflight::InFlight;
use crate::uploads::partition_attachments;

/// One user turn to send.
#[derive(Debug, Clone, Default)]
pub struct SendRequest {
    pub text: String,
    pub attachments: Vec<ChatAttachment>,
    pub tier: ModelTier,
    pub web_search: bool,
}

impl SendRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<ChatAttachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}

/// The appended model turn, plus any attachments dropped for size.
#[derive(Debug)]
pub struct SendOutcome {
    pub answer: ChatMessage,
    pub rejected: Vec<HiveError>,
}

pub struct ChatService {
    knowledge_bases: Arc<KnowledgeBaseRepository>,
    history: Arc<ChatHistoryRepository>,
    insights: Arc<SharedInsightRepository>,
    assembler: ContextAssembler,
    extractor: Arc<dyn CitationExtractor>,
    backend: Arc<dyn ModelBackend>,
    inflight: InFlight,
    max_attachment_bytes: u64,
}

impl ChatService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        knowledge_bases: Arc<KnowledgeBaseRepository>,
        history: Arc<ChatHistoryRepository>,
        insights: Arc<SharedInsightRepository>,
        assembler: ContextAssembler,
        extractor: Arc<dyn CitationExtractor>,
        backend: Arc<dyn ModelBackend>,
        max_attachment_bytes: u64,
    ) -> Self {
        Self {
            knowledge_bases,
            history,
            insights,
            assembler,
            extractor,
            backend,
            inflight: InFlight::new(),
            max_attachment_bytes,
        }
    }

    /// Whether a generation is outstanding for this conversation.
    pub fn is_generating(&self, user_id: &str, kb_id: &str) -> bool {
        self.inflight.is_active(user_id, kb_id)
    }

    /// Send one turn and return the model turn that was appended.
    ///
    /// Oversized attachments are dropped and reported in
    /// [`SendOutcome::rejected`]; the rest of the turn still goes out.
    /// Errors are only returned for problems before the backend call
    /// (nothing left to send, unknown knowledge base, a generation already
    /// in flight) and for store write failures.
    pub async fn send(
        &self,
        user_id: &str,
        kb_id: &str,
        request: SendRequest,
    ) -> Result<SendOutcome, HiveError> {
        let text = request.text.trim().to_string();
        let checked = partition_attachments(request.attachments, self.max_attachment_bytes);
        let attachments = checked.accepted;
        if text.is_empty() && attachments.is_empty() {
            // No text, and every attachment (if any) was too large.
            if let Some(first) = checked.rejected.into_iter().next() {
                return Err(first);
            }
            return Err(HiveError::Validation(
                "message must have text or at least one attachment".into(),
            ));
        }

        let Some(_guard) = self.inflight.try_acquire(user_id, kb_id) else {
            metrics::counter!("hive_generations_rejected_total").increment(1);
            debug!(user_id, kb_id, "send rejected: generation in flight");
            return Err(HiveError::GenerationInFlight);
        };

        let knowledge_base = self
            .knowledge_bases
            .get(kb_id)
            .await
            .ok_or_else(|| HiveError::not_found("knowledge base", kb_id))?;
        let prior = self.history.conversation(user_id, kb_id).await;
        let insights = self.insights.list().await;

        let question = ChatMessage::user(text.clone(), attachments.clone());
        self.history
            .append(user_id, kb_id, vec![question])
            .await?;

        let generate_request = self.assembler.assemble(&Turn {
            knowledge_base: &knowledge_base,
            history: &prior,
            text: &text,
            attachments: &attachments,
            tier: request.tier,
            web_search: request.web_search,
            insights: &insights,
        });

        let answer = match self.backend.generate(generate_request).await {
            Ok(response) => {
                let extracted = self.extractor.extract(&response);
                ChatMessage::model(extracted.text, extracted.citations)
            }
            Err(e) => {
                metrics::counter!("hive_backend_failures_total").increment(1);
                warn!(user_id, kb_id, error = %e, "backend call failed");
                ChatMessage::error(e.to_string())
            }
        };

        self.history
            .append(user_id, kb_id, vec![answer.clone()])
            .await?;
        info!(
            user_id,
            kb_id,
            message_id = %answer.id,
            is_error = answer.is_error,
            citations = answer.citations.as_ref().map_or(0, Vec::len),
            dropped_attachments = checked.rejected.len(),
            "turn completed"
        );
        Ok(SendOutcome {
            answer,
            rejected: checked.rejected,
        })
    }
}
