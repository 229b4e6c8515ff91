// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types persisted by the store and exchanged between crates.
//!
//! All persisted types serialize with camelCase keys so the stored JSON
//! matches the collection shapes documented for the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use crate::contract::{
    Candidate, Content, GenerateRequest, GenerateResponse, GroundingChunk, GroundingMetadata,
    InlineData, Part, Tool, WebSource,
};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Backend,
}

/// Generates a collision-negligible identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A team member account. Identity is asserted by username only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

/// One document inside a knowledge base. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub media_type: String,
    pub size: u64,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            media_type: media_type.into(),
            size: content.len() as u64,
            content,
            uploaded_at: Utc::now(),
        }
    }
}

/// A named, shared document corpus visible to every user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<StoredFile>,
}

impl KnowledgeBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: Utc::now(),
            files: Vec::new(),
        }
    }

    /// Total payload bytes across all files.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Author of a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Whether an ephemeral attachment is an image or another file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

/// An ephemeral file bound to one user turn. Never stored in a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    pub id: String,
    pub kind: AttachmentKind,
    pub media_type: String,
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
}

impl ChatAttachment {
    /// Creates an attachment, classifying it as an image from its media type.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        let media_type = media_type.into();
        let kind = if media_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        };
        Self {
            id: new_id(),
            kind,
            media_type,
            name: name.into(),
            content,
        }
    }
}

/// Thumbs-up / thumbs-down tag on a model turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Feedback {
    Up,
    Down,
}

/// A provenance pointer attached to a model answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub context: String,
}

/// One turn in a conversation.
///
/// `feedback` is the only field mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<ChatAttachment>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl ChatMessage {
    /// A user turn. An empty attachment list is stored as `None`.
    pub fn user(text: impl Into<String>, attachments: Vec<ChatAttachment>) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            citations: None,
            attachments: (!attachments.is_empty()).then_some(attachments),
            is_error: false,
            feedback: None,
        }
    }

    /// A model answer. An empty citation list is stored as `None`.
    pub fn model(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            id: new_id(),
            role: Role::Model,
            text: text.into(),
            timestamp: Utc::now(),
            citations: (!citations.is_empty()).then_some(citations),
            attachments: None,
            is_error: false,
            feedback: None,
        }
    }

    /// A model turn standing in for a failed backend call.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::model(text, Vec::new())
        }
    }
}

/// Per-user chat history: knowledge-base id to its ordered turns.
pub type ChatHistory = BTreeMap<String, Vec<ChatMessage>>;

/// A distilled Q/A lesson created from positive feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedInsight {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_base_id: Option<String>,
}

impl SharedInsight {
    pub fn new(content: impl Into<String>, source_base_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            timestamp: Utc::now(),
            source_base_id,
        }
    }
}

/// Backend tier selection: a fast path and a reasoning path.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Fast,
    Reasoning,
}

/// Serde adapter storing binary payloads as standard base64 strings.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
