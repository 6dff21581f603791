//! Folder service contract.
//!
//! The HTTP layer only talks to folders through [`FolderService`]. Absence is
//! expressed as `Ok(None)`; there is no separate null channel.

use crate::error::AppError;
use crate::models::document::{Classification, DocumentMetadata, UploadedFile};
use crate::models::folder::Folder;
use uuid::Uuid;

/// Operations the folder handlers delegate to.
pub trait FolderService: Send + Sync {
    /// Look up a folder.
    ///
    /// # Returns
    /// `Ok(Some(folder))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when the backing store fails.
    fn find_by_id(&self, id: Uuid) -> Result<Option<Folder>, AppError>;

    /// Persist a new folder and return the stored representation.
    ///
    /// # Errors
    /// Returns an error when the backing store fails.
    fn create(&self, folder: Folder) -> Result<Folder, AppError>;

    /// Store `files` against an existing folder.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when `folder_id` does not exist; a
    /// missing folder is never created implicitly.
    fn attach_documents(
        &self,
        folder_id: Uuid,
        files: Vec<UploadedFile>,
        classification: Classification,
        metadata: DocumentMetadata,
    ) -> Result<(), AppError>;
}
