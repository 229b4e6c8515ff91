// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-scoped application state.
//!
//! The store is opened once by [`HiveApp::open`] and handed explicitly to
//! every repository. The active session (user and selected knowledge base)
//! lives here rather than in any global.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use hive_config::HiveConfig;
use hive_context::{CitationExtractor, ContextAssembler, MarkerCitationExtractor};
use hive_core::types::{ChatMessage, Feedback, KnowledgeBase, SharedInsight, User};
use hive_core::{HealthStatus, HiveError, ModelBackend, PluginAdapter};
use hive_storage::{
    ChatHistoryRepository, KnowledgeBaseRepository, SettingsRepository, SharedInsightRepository,
    Store, UserRepository,
};

use crate::chat::{ChatService, SendOutcome, SendRequest};
use crate::feedback::{FeedbackOutcome, FeedbackProcessor};
use crate::uploads::{PendingFile, UploadBatch, prepare_uploads};

/// The signed-in user and the knowledge base they are working in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub knowledge_base_id: Option<String>,
}

pub struct HiveApp {
    config: HiveConfig,
    store: Arc<Store>,
    users: UserRepository,
    knowledge_bases: Arc<KnowledgeBaseRepository>,
    history: Arc<ChatHistoryRepository>,
    insights: Arc<SharedInsightRepository>,
    settings: SettingsRepository,
    chat: ChatService,
    feedback: FeedbackProcessor,
    session: RwLock<Session>,
}

impl HiveApp {
    /// Open the store named in `config` and wire every service on top of it.
    ///
    /// Fails with [`HiveError::StoreOpen`] when the store cannot be opened.
    pub async fn open(config: HiveConfig, backend: Arc<dyn ModelBackend>) -> Result<Self, HiveError> {
        let store = Store::new(hive_storage::Database::open_config(&config.storage).await?);
        Ok(Self::with_store(config, Arc::new(store), backend))
    }

    /// Wire services over an already open store.
    pub fn with_store(config: HiveConfig, store: Arc<Store>, backend: Arc<dyn ModelBackend>) -> Self {
        Self::with_extractor(config, store, backend, Arc::new(MarkerCitationExtractor))
    }

    /// Wire services with a custom citation extractor.
    pub fn with_extractor(
        config: HiveConfig,
        store: Arc<Store>,
        backend: Arc<dyn ModelBackend>,
        extractor: Arc<dyn CitationExtractor>,
    ) -> Self {
        let knowledge_bases = Arc::new(KnowledgeBaseRepository::new(store.clone()));
        let history = Arc::new(ChatHistoryRepository::new(store.clone()));
        let insights = Arc::new(SharedInsightRepository::with_retention(
            store.clone(),
            config.insights.max_retained,
        ));
        let assembler = ContextAssembler::new(&config.models, &config.context);
        let chat = ChatService::new(
            knowledge_bases.clone(),
            history.clone(),
            insights.clone(),
            assembler,
            extractor,
            backend,
            config.uploads.max_attachment_bytes,
        );
        let feedback = FeedbackProcessor::new(
            history.clone(),
            insights.clone(),
            config.context.answer_excerpt_chars,
        );

        Self {
            users: UserRepository::new(store.clone()),
            settings: SettingsRepository::new(store.clone()),
            knowledge_bases,
            history,
            insights,
            chat,
            feedback,
            session: RwLock::new(Session::default()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &HiveConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn settings(&self) -> &SettingsRepository {
        &self.settings
    }

    // --- session ---

    /// Register a new user and make them the active user.
    pub async fn register(&self, username: &str) -> Result<User, HiveError> {
        let user = self.users.register(username).await?;
        self.session.write().await.user = Some(user.clone());
        Ok(user)
    }

    /// Make an existing user the active user.
    pub async fn login(&self, username: &str) -> Result<User, HiveError> {
        let user = self.users.login(username).await?;
        let mut session = self.session.write().await;
        session.user = Some(user.clone());
        info!(user_id = %user.id, username = %user.username, "logged in");
        Ok(user)
    }

    /// Clear the active user and selection.
    pub async fn logout(&self) {
        *self.session.write().await = Session::default();
    }

    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn active_user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    /// Select the knowledge base new turns go to.
    pub async fn select_knowledge_base(&self, kb_id: &str) -> Result<KnowledgeBase, HiveError> {
        let kb = self
            .knowledge_bases
            .get(kb_id)
            .await
            .ok_or_else(|| HiveError::not_found("knowledge base", kb_id))?;
        self.session.write().await.knowledge_base_id = Some(kb.id.clone());
        Ok(kb)
    }

    /// The selected knowledge base, re-read from the store.
    pub async fn active_knowledge_base(&self) -> Option<KnowledgeBase> {
        let id = self.session.read().await.knowledge_base_id.clone()?;
        self.knowledge_bases.get(&id).await
    }

    // --- knowledge bases ---

    pub async fn knowledge_bases(&self) -> Vec<KnowledgeBase> {
        self.knowledge_bases.list().await
    }

    pub async fn knowledge_base(&self, kb_id: &str) -> Option<KnowledgeBase> {
        self.knowledge_bases.get(kb_id).await
    }

    pub async fn create_knowledge_base(&self, name: &str) -> Result<KnowledgeBase, HiveError> {
        self.knowledge_bases.create(name).await
    }

    /// Delete a knowledge base, clearing the selection if it was active.
    pub async fn delete_knowledge_base(&self, kb_id: &str) -> Result<bool, HiveError> {
        let removed = self.knowledge_bases.delete(kb_id).await?;
        let mut session = self.session.write().await;
        if session.knowledge_base_id.as_deref() == Some(kb_id) {
            session.knowledge_base_id = None;
        }
        Ok(removed)
    }

    /// Size-check a batch and store the accepted files.
    ///
    /// Oversized files come back in `rejected`; the rest are added. An
    /// unknown `kb_id` is `NotFound` even when every file was rejected.
    pub async fn add_files(&self, kb_id: &str, files: Vec<PendingFile>) -> Result<UploadBatch, HiveError> {
        if self.knowledge_bases.get(kb_id).await.is_none() {
            return Err(HiveError::not_found("knowledge base", kb_id));
        }
        let batch = prepare_uploads(files, self.config.uploads.max_file_bytes);
        if !batch.accepted.is_empty() {
            let kb = self
                .knowledge_bases
                .add_files(kb_id, batch.accepted.clone())
                .await?;
            info!(
                kb_id,
                added = batch.accepted.len(),
                rejected = batch.rejected.len(),
                total = kb.files.len(),
                "files uploaded"
            );
        }
        Ok(batch)
    }

    pub async fn remove_file(&self, kb_id: &str, file_id: &str) -> Result<KnowledgeBase, HiveError> {
        self.knowledge_bases.remove_file(kb_id, file_id).await
    }

    // --- chat ---

    /// Send one turn in the (user, knowledge base) conversation.
    pub async fn send(
        &self,
        user_id: &str,
        kb_id: &str,
        request: SendRequest,
    ) -> Result<SendOutcome, HiveError> {
        self.chat.send(user_id, kb_id, request).await
    }

    /// Send one turn as the active user in the selected knowledge base.
    pub async fn send_active(&self, request: SendRequest) -> Result<SendOutcome, HiveError> {
        let (user_id, kb_id) = self.active_conversation().await?;
        self.send(&user_id, &kb_id, request).await
    }

    pub fn is_generating(&self, user_id: &str, kb_id: &str) -> bool {
        self.chat.is_generating(user_id, kb_id)
    }

    pub async fn conversation(&self, user_id: &str, kb_id: &str) -> Vec<ChatMessage> {
        self.history.conversation(user_id, kb_id).await
    }

    // --- feedback & insights ---

    pub async fn feedback(
        &self,
        user_id: &str,
        kb_id: &str,
        message_id: &str,
        tag: Feedback,
    ) -> Result<FeedbackOutcome, HiveError> {
        self.feedback.apply(user_id, kb_id, message_id, tag).await
    }

    /// Feedback as the active user in the selected knowledge base.
    pub async fn feedback_active(
        &self,
        message_id: &str,
        tag: Feedback,
    ) -> Result<FeedbackOutcome, HiveError> {
        let (user_id, kb_id) = self.active_conversation().await?;
        self.feedback(&user_id, &kb_id, message_id, tag).await
    }

    /// All shared insights, oldest first.
    pub async fn insights(&self) -> Vec<SharedInsight> {
        self.insights.list().await
    }

    pub async fn recent_insights(&self, n: usize) -> Vec<SharedInsight> {
        self.insights.recent(n).await
    }

    // --- lifecycle ---

    pub async fn health_check(&self) -> Result<HealthStatus, HiveError> {
        self.store.health_check().await
    }

    /// Flush the store. The handle stays usable; the file is closed when the
    /// last reference drops.
    pub async fn shutdown(&self) -> Result<(), HiveError> {
        self.store.shutdown().await
    }

    async fn active_conversation(&self) -> Result<(String, String), HiveError> {
        let session = self.session.read().await;
        let user = session
            .user
            .as_ref()
            .ok_or_else(|| HiveError::Validation("no user is logged in".into()))?;
        let kb_id = session
            .knowledge_base_id
            .clone()
            .ok_or_else(|| HiveError::Validation("no knowledge base is selected".into()))?;
        Ok((user.id.clone(), kb_id))
    }
}
