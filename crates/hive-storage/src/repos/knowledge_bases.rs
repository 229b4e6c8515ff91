// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base repository.
//!
//! File mutations replace the whole record, so every read-modify-write runs
//! under the per-KB lock to avoid lost updates between concurrent editors.

use std::sync::Arc;

use tracing::{debug, info};

use hive_core::HiveError;
use hive_core::types::{KnowledgeBase, StoredFile};

use crate::collections::{Collection, ReadOutcome};
use crate::locks::KeyedLocks;
use crate::store::Store;

pub struct KnowledgeBaseRepository {
    store: Arc<Store>,
    locks: KeyedLocks,
}

impl KnowledgeBaseRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
        }
    }

    /// All knowledge bases, oldest first.
    pub async fn list(&self) -> Vec<KnowledgeBase> {
        let mut bases: Vec<KnowledgeBase> =
            self.store.get_all(Collection::KnowledgeBases).await.or_empty();
        bases.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        bases
    }

    pub async fn get(&self, id: &str) -> Option<KnowledgeBase> {
        self.store.get(Collection::KnowledgeBases, id).await.found()
    }

    /// Create an empty knowledge base with a fresh id.
    pub async fn create(&self, name: &str) -> Result<KnowledgeBase, HiveError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HiveError::Validation(
                "knowledge base name must not be empty".into(),
            ));
        }
        let kb = KnowledgeBase::new(name);
        self.store.put_keyed(Collection::KnowledgeBases, &kb).await?;
        info!(kb_id = %kb.id, name = %kb.name, "knowledge base created");
        Ok(kb)
    }

    /// Delete a knowledge base and, with it, all of its files.
    ///
    /// Returns whether a record was removed. Clearing an active selection
    /// that pointed at it is the caller's job.
    pub async fn delete(&self, id: &str) -> Result<bool, HiveError> {
        let removed = {
            let _guard = self.locks.lock(id).await;
            self.store.delete(Collection::KnowledgeBases, id).await?
        };
        self.locks.forget(id);
        if removed {
            info!(kb_id = id, "knowledge base deleted");
        }
        Ok(removed)
    }

    /// Append files in order. Returns the updated record.
    pub async fn add_files(
        &self,
        id: &str,
        files: Vec<StoredFile>,
    ) -> Result<KnowledgeBase, HiveError> {
        let _guard = self.locks.lock(id).await;
        let mut kb = self.load(id).await?;
        let added = files.len();
        kb.files.extend(files);
        self.store.put_keyed(Collection::KnowledgeBases, &kb).await?;
        debug!(kb_id = id, added, total = kb.files.len(), "files added");
        Ok(kb)
    }

    /// Remove one file by id, keeping the order of the rest.
    pub async fn remove_file(&self, id: &str, file_id: &str) -> Result<KnowledgeBase, HiveError> {
        let _guard = self.locks.lock(id).await;
        let mut kb = self.load(id).await?;
        let before = kb.files.len();
        kb.files.retain(|f| f.id != file_id);
        if kb.files.len() == before {
            return Err(HiveError::not_found("file", file_id));
        }
        self.store.put_keyed(Collection::KnowledgeBases, &kb).await?;
        debug!(kb_id = id, file_id, total = kb.files.len(), "file removed");
        Ok(kb)
    }

    async fn load(&self, id: &str) -> Result<KnowledgeBase, HiveError> {
        match self.store.get(Collection::KnowledgeBases, id).await {
            ReadOutcome::Found(kb) => Ok(kb),
            _ => Err(HiveError::not_found("knowledge base", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> (tempfile::TempDir, Arc<KnowledgeBaseRepository>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hive.db");
        let store = Arc::new(Store::open(path.to_str().unwrap()).await.unwrap());
        (dir, Arc::new(KnowledgeBaseRepository::new(store)))
    }

    fn file(name: &str) -> StoredFile {
        StoredFile::new(name, "text/plain", name.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn created_base_is_listed_empty() {
        let (_dir, repo) = repo().await;
        let kb = repo.create("Onboarding").await.unwrap();
        let listed = repo.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, kb.id);
        assert_eq!(listed[0].name, "Onboarding");
        assert!(listed[0].files.is_empty());
    }

    #[tokio::test]
    async fn create_surfaces_store_write_failure() {
        let (_dir, repo) = repo().await;
        repo.store
            .database()
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("DROP TABLE knowledge_bases")
            })
            .await
            .unwrap();

        let result = repo.create("Onboarding").await;
        assert!(matches!(result, Err(HiveError::Storage { .. })));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (_dir, repo) = repo().await;
        assert!(matches!(
            repo.create("   ").await,
            Err(HiveError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let (_dir, repo) = repo().await;
        let first = repo.create("first").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.create("second").await.unwrap();
        let ids: Vec<String> = repo.list().await.into_iter().map(|kb| kb.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn remove_file_keeps_remaining_order() {
        let (_dir, repo) = repo().await;
        let kb = repo.create("docs").await.unwrap();
        let kb = repo
            .add_files(&kb.id, vec![file("a"), file("b"), file("c"), file("d")])
            .await
            .unwrap();
        let victim = kb.files[1].id.clone();

        let kb = repo.remove_file(&kb.id, &victim).await.unwrap();
        let names: Vec<&str> = kb.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "d"]);

        let stored = repo.get(&kb.id).await.unwrap();
        assert_eq!(stored.files.len(), 3);
    }

    #[tokio::test]
    async fn remove_unknown_file_is_not_found() {
        let (_dir, repo) = repo().await;
        let kb = repo.create("docs").await.unwrap();
        assert!(matches!(
            repo.remove_file(&kb.id, "nope").await,
            Err(HiveError::NotFound { entity: "file", .. })
        ));
    }

    #[tokio::test]
    async fn mutating_unknown_base_is_not_found() {
        let (_dir, repo) = repo().await;
        assert!(matches!(
            repo.add_files("missing", vec![file("a")]).await,
            Err(HiveError::NotFound { entity: "knowledge base", .. })
        ));
    }

    #[tokio::test]
    async fn delete_removes_base_and_files() {
        let (_dir, repo) = repo().await;
        let kb = repo.create("docs").await.unwrap();
        repo.add_files(&kb.id, vec![file("a")]).await.unwrap();
        assert!(repo.delete(&kb.id).await.unwrap());
        assert!(repo.get(&kb.id).await.is_none());
        assert!(repo.list().await.is_empty());
        assert!(!repo.delete(&kb.id).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_add_files_lose_nothing() {
        let (_dir, repo) = repo().await;
        let kb = repo.create("shared").await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                let id = kb.id.clone();
                tokio::spawn(async move {
                    let batch = (0..3).map(|j| file(&format!("f{i}-{j}"))).collect();
                    repo.add_files(&id, batch).await.unwrap();
                })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap();
        }

        assert_eq!(repo.get(&kb.id).await.unwrap().files.len(), 24);
    }
}
