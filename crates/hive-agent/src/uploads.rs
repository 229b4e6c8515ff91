// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size checks for knowledge-base files and chat attachments.
//!
//! Every check happens before any store write. One oversized file in a
//! batch is rejected on its own; the rest of the batch goes through.

use tracing::warn;

use hive_core::HiveError;
use hive_core::types::{ChatAttachment, StoredFile};

/// A file read from disk or the UI, not yet accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub media_type: String,
    pub content: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content,
        }
    }

    fn check(&self, limit: u64) -> Result<(), HiveError> {
        let size = self.content.len() as u64;
        if size > limit {
            warn!(name = %self.name, size, limit, "file rejected: too large");
            return Err(HiveError::FileTooLarge {
                name: self.name.clone(),
                size,
                limit,
            });
        }
        Ok(())
    }
}

/// Outcome of checking a batch: the accepted items in order, and one
/// `FileTooLarge` per rejected file.
#[derive(Debug)]
pub struct UploadBatch<T = StoredFile> {
    pub accepted: Vec<T>,
    pub rejected: Vec<HiveError>,
}

impl<T> Default for UploadBatch<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> UploadBatch<T> {
    fn push(&mut self, item: Result<T, HiveError>) {
        match item {
            Ok(item) => self.accepted.push(item),
            Err(e) => self.rejected.push(e),
        }
    }
}

/// Turn one pending file into a stored knowledge-base file.
pub fn prepare_upload(file: PendingFile, limit: u64) -> Result<StoredFile, HiveError> {
    file.check(limit)?;
    Ok(StoredFile::new(file.name, file.media_type, file.content))
}

/// Turn one pending file into an ephemeral chat attachment.
pub fn prepare_attachment(file: PendingFile, limit: u64) -> Result<ChatAttachment, HiveError> {
    file.check(limit)?;
    Ok(ChatAttachment::new(file.name, file.media_type, file.content))
}

/// Check a batch of knowledge-base files, keeping order among the accepted.
pub fn prepare_uploads(files: Vec<PendingFile>, limit: u64) -> UploadBatch {
    let mut batch = UploadBatch::default();
    for file in files {
        batch.push(prepare_upload(file, limit));
    }
    batch
}

/// Check a batch of chat attachments, keeping order among the accepted.
pub fn prepare_attachments(files: Vec<PendingFile>, limit: u64) -> UploadBatch<ChatAttachment> {
    let mut batch = UploadBatch::default();
    for file in files {
        batch.push(prepare_attachment(file, limit));
    }
    batch
}

/// Split already built attachments into those within `limit` and the rest.
pub fn partition_attachments(
    attachments: Vec<ChatAttachment>,
    limit: u64,
) -> UploadBatch<ChatAttachment> {
    let mut batch = UploadBatch::default();
    for attachment in attachments {
        let size = attachment.content.len() as u64;
        if size > limit {
            warn!(name = %attachment.name, size, limit, "attachment rejected: too large");
            batch.rejected.push(HiveError::FileTooLarge {
                name: attachment.name,
                size,
                limit,
            });
        } else {
            batch.accepted.push(attachment);
        }
    }
    batch
}
