// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The system instruction sent with every request.

use hive_core::types::SharedInsight;

const BASE_INSTRUCTIONS: &str = "\
You are Hive, a team knowledge assistant. Answer using the documents that \
belong to the active knowledge base, which are attached to the latest user turn.

Rules:
1. Shared knowledge first. Prefer the knowledge-base documents and the shared \
team insights below over general knowledge. If they do not cover the question, \
say so before answering from general knowledge.
2. Ephemeral attachments. Files attached directly to a message apply to that \
message only. Use them to answer it, but do not treat them as part of the \
knowledge base.
3. Citations. When a statement comes from a document, cite it inline as \
[Source: <file name>, Context: \"<short verbatim excerpt>\"].
4. Formatting. Use Markdown. Keep answers concise and lead with the direct answer.";

const INSIGHTS_HEADING: &str = "Shared team insights (answers teammates marked as helpful):";

/// Renders the system instruction.
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    base: String,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        Self {
            base: BASE_INSTRUCTIONS.to_string(),
        }
    }
}

impl SystemPrompt {
    /// A prompt with custom behavioral instructions.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Render the instruction with the given insights, in the order given.
    ///
    /// The insights section is omitted entirely when `insights` is empty.
    pub fn render(&self, insights: &[SharedInsight]) -> String {
        if insights.is_empty() {
            return self.base.clone();
        }
        let mut out = String::with_capacity(self.base.len() + 64 * insights.len());
        out.push_str(&self.base);
        out.push_str("\n\n");
        out.push_str(INSIGHTS_HEADING);
        for insight in insights {
            out.push_str("\n- ");
            // Keep multi-line Q/A content inside its bullet.
            out.push_str(&insight.content.replace('\n', "\n  "));
        }
        out
    }
}
