// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the backend request for one chat turn.
//!
//! Part order matters to the backend:
//! - history turns: each attachment, then the text;
//! - the new turn: every knowledge-base file, then the ephemeral
//!   attachments, then the text.
//!
//! Knowledge-base files are only ever sent on the new turn, never replayed
//! inside history.

use tracing::debug;

use hive_config::model::{ContextConfig, ModelsConfig};
use hive_core::contract::{Content, GenerateRequest, Part, Tool};
use hive_core::types::{
    ChatAttachment, ChatMessage, KnowledgeBase, ModelTier, Role, SharedInsight,
};

use crate::system_prompt::SystemPrompt;

/// Everything the assembler needs for one send.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub knowledge_base: &'a KnowledgeBase,
    /// Prior turns of this conversation, oldest first.
    pub history: &'a [ChatMessage],
    pub text: &'a str,
    pub attachments: &'a [ChatAttachment],
    pub tier: ModelTier,
    pub web_search: bool,
    /// All shared insights, oldest first. Only the latest window is used.
    pub insights: &'a [SharedInsight],
}

#[derive(Debug, Clone)]
pub struct ContextAssembler {
    models: ModelsConfig,
    insight_window: usize,
    system_prompt: SystemPrompt,
}

impl ContextAssembler {
    pub fn new(models: &ModelsConfig, context: &ContextConfig) -> Self {
        Self {
            models: models.clone(),
            insight_window: context.insight_window,
            system_prompt: SystemPrompt::default(),
        }
    }

    /// Replace the behavioral instructions.
    pub fn with_system_prompt(mut self, system_prompt: SystemPrompt) -> Self {
        self.system_prompt = system_prompt;
        self
    }

    /// Backend model identifier and temperature for a tier.
    pub fn model_for(&self, tier: ModelTier) -> (&str, f32) {
        match tier {
            ModelTier::Fast => (&self.models.fast_model, self.models.fast_temperature),
            ModelTier::Reasoning => (
                &self.models.reasoning_model,
                self.models.reasoning_temperature,
            ),
        }
    }

    /// The system instruction for the given insight list.
    pub fn system_instruction(&self, insights: &[SharedInsight]) -> String {
        let start = insights.len().saturating_sub(self.insight_window);
        self.system_prompt.render(&insights[start..])
    }

    pub fn assemble(&self, turn: &Turn<'_>) -> GenerateRequest {
        let mut contents: Vec<Content> = turn
            .history
            .iter()
            .filter_map(history_content)
            .collect();
        contents.push(new_turn_content(turn));

        let (model, temperature) = self.model_for(turn.tier);
        let tools = turn.web_search.then(|| vec![Tool::WebSearch {}]);

        debug!(
            kb_id = %turn.knowledge_base.id,
            history_turns = turn.history.len(),
            kb_files = turn.knowledge_base.files.len(),
            attachments = turn.attachments.len(),
            model,
            web_search = turn.web_search,
            "assembled request"
        );

        GenerateRequest {
            model: model.to_string(),
            contents,
            system_instruction: self.system_instruction(turn.insights),
            temperature,
            tools,
        }
    }
}

fn attachment_part(attachment: &ChatAttachment) -> Part {
    Part::inline(attachment.media_type.clone(), attachment.content.clone())
}

/// A prior turn, role for role. Turns with nothing to send are dropped.
fn history_content(message: &ChatMessage) -> Option<Content> {
    let mut parts: Vec<Part> = message
        .attachments
        .iter()
        .flatten()
        .map(attachment_part)
        .collect();
    if !message.text.is_empty() {
        parts.push(Part::text(message.text.clone()));
    }
    if parts.is_empty() {
        return None;
    }
    Some(Content {
        role: message.role,
        parts,
    })
}

fn new_turn_content(turn: &Turn<'_>) -> Content {
    let mut parts: Vec<Part> = turn
        .knowledge_base
        .files
        .iter()
        .map(|f| Part::inline(f.media_type.clone(), f.content.clone()))
        .collect();
    parts.extend(turn.attachments.iter().map(attachment_part));
    if !turn.text.is_empty() {
        parts.push(Part::text(turn.text));
    }
    Content {
        role: Role::User,
        parts,
    }
}
