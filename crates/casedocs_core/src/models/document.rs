//! Document attachment models.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Sensitivity tier applied to an attached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Public,
    Private,
    Restricted,
}

impl Classification {
    /// Wire form of the classification.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Restricted => "RESTRICTED",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = AppError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            "RESTRICTED" => Ok(Self::Restricted),
            other => Err(AppError::BadRequest(format!(
                "Unknown classification '{}'",
                other
            ))),
        }
    }
}

/// One file payload received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload, defaulting a missing mime type to `application/octet-stream`.
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            content,
        }
    }
}

/// Optional extras submitted alongside an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub roles: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    /// Identity recorded as the uploader.
    pub uploaded_by: Option<String>,
}

/// Persisted document row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub original_document_name: String,
    pub mime_type: String,
    pub size: u64,
    /// blake3 of the content, lowercase hex.
    pub content_hash: String,
    pub classification: Classification,
    pub roles: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub created_by: Option<String>,
    pub created_on: DateTime<Utc>,
}

/// Folder-side view of a stored document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: Uuid,
    pub original_document_name: String,
    pub mime_type: String,
    pub size: u64,
    pub classification: Classification,
}

impl StoredDocument {
    /// Describe `file` as a new document inside `folder_id`.
    pub fn from_upload(
        folder_id: Uuid,
        file: &UploadedFile,
        classification: Classification,
        extras: &DocumentMetadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            folder_id,
            original_document_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.content.len() as u64,
            content_hash: blake3::hash(&file.content).to_hex().to_string(),
            classification,
            roles: extras.roles.clone(),
            metadata: extras.metadata.clone(),
            created_by: extras.uploaded_by.clone(),
            created_on: Utc::now(),
        }
    }
}

impl From<&StoredDocument> for DocumentRef {
    fn from(value: &StoredDocument) -> Self {
        Self {
            id: value.id,
            original_document_name: value.original_document_name.clone(),
            mime_type: value.mime_type.clone(),
            size: value.size,
            classification: value.classification,
        }
    }
}
