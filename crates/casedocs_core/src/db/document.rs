//! Document storage and the folder attach transaction.

use super::tables::{DOCUMENTS, DOCUMENT_CONTENT, FOLDERS};
use crate::error::AppError;
use crate::models::document::{
    Classification, DocumentMetadata, DocumentRef, StoredDocument, UploadedFile,
};
use crate::models::folder::Folder;
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;
use uuid::Uuid;

/// Accessor for the document tables.
pub struct DocumentDb {
    db: Arc<redb::Database>,
}

impl DocumentDb {
    /// Initialize document tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(DOCUMENTS)?;
        write_txn.open_table(DOCUMENT_CONTENT)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Store `files` and append them to `folder_id` in one write transaction.
    ///
    /// Nothing is written unless every file is stored and the folder row is
    /// updated.
    ///
    /// # Returns
    /// The stored document rows, in upload order.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the folder does not exist, or a
    /// storage/serialization error.
    pub fn attach_to_folder(
        &self,
        folder_id: Uuid,
        files: &[UploadedFile],
        classification: Classification,
        extras: &DocumentMetadata,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let write_txn = self.db.begin_write()?;
        let stored = {
            let mut folders = write_txn.open_table(FOLDERS)?;
            let mut documents = write_txn.open_table(DOCUMENTS)?;
            let mut contents = write_txn.open_table(DOCUMENT_CONTENT)?;

            let mut folder: Folder = match folders.get(folder_id)? {
                Some(guard) => bincode::deserialize(guard.value())?,
                None => return Err(AppError::NotFound),
            };

            let mut stored = Vec::with_capacity(files.len());
            for file in files {
                let doc = StoredDocument::from_upload(folder_id, file, classification, extras);
                let encoded = bincode::serialize(&doc)?;
                documents.insert(doc.id, encoded.as_slice())?;
                contents.insert(doc.id, file.content.as_slice())?;
                folder.documents.push(DocumentRef::from(&doc));
                stored.push(doc);
            }

            folder.modified_on = Utc::now();
            if extras.uploaded_by.is_some() {
                folder.last_modified_by = extras.uploaded_by.clone();
            }
            let encoded_folder = bincode::serialize(&folder)?;
            folders.insert(folder_id, encoded_folder.as_slice())?;
            stored
        };
        write_txn.commit()?;
        Ok(stored)
    }

    /// Fetch a document row by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: Uuid) -> Result<Option<StoredDocument>, AppError> {
        let read_txn = self.db.begin_read()?;
        let documents = read_txn.open_table(DOCUMENTS)?;
        match documents.get(id)? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fetch the raw bytes of a document.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn get_content(&self, id: Uuid) -> Result<Option<Vec<u8>>, AppError> {
        let read_txn = self.db.begin_read()?;
        let contents = read_txn.open_table(DOCUMENT_CONTENT)?;
        Ok(contents.get(id)?.map(|value| value.value().to_vec()))
    }
}
