// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request shaping for the Hive chat loop.
//!
//! - [`SystemPrompt`]: fixed behavioral instructions plus the recent shared
//!   insights section.
//! - [`ContextAssembler`]: merges knowledge-base files, prior turns,
//!   ephemeral attachments and the new text into a [`GenerateRequest`].
//! - [`CitationExtractor`]: turns a backend reply into display text and
//!   structured citations.
//!
//! [`GenerateRequest`]: hive_core::contract::GenerateRequest

pub mod assembler;
pub mod citations;
pub mod system_prompt;

pub use assembler::{ContextAssembler, Turn};
pub use citations::{CitationExtractor, ExtractedAnswer, MarkerCitationExtractor};
pub use system_prompt::SystemPrompt;
