//! Attachment types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use immoloc_shared::types::{AttachmentId, EntryId, UserId};
use serde::{Deserialize, Serialize};

/// A file attached to an accounting entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: AttachmentId,
    /// Entry the file supports.
    pub entry_id: EntryId,
    /// Owner.
    pub user_id: UserId,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Path inside the attachments bucket.
    pub storage_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

/// Row to insert after the object has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    /// Entry.
    pub entry_id: EntryId,
    /// Owner.
    pub user_id: UserId,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Path inside the attachments bucket.
    pub storage_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
}

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Client-side file name.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Content.
    pub data: Bytes,
}

impl FileUpload {
    /// Creates an upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
