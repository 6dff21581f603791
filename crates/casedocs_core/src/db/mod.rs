//! Database layer backing the reference folder service.

/// Document storage and the attach transaction.
pub mod document;
/// Folder storage helpers.
pub mod folder;
/// redb table definitions.
pub mod tables;

use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use crate::models::document::{Classification, DocumentMetadata, UploadedFile};
use crate::models::folder::Folder;
use crate::service::FolderService;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;


/// Database handle with access to the folder and document tables.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub folders: folder::FolderDb,
    pub documents: document::DocumentDb,
}

impl Database {
    /// Open (or create) the database under `path` and initialize tables.
    ///
    /// `path` is a directory; the redb file lives inside it.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the file is
    /// already held by another process, or table initialization fails.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(REDB_FILE_NAME);
        let db = match redb::Database::create(&file) {
            Ok(db) => Arc::new(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database '{}' is already open in another process.\n\
                     Stop it first, or set DB_PATH to use a different database location.",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::debug!("Opened database at {}", file.display());
        Self::from_shared(db)
    }

    /// Build a handle around an already-open redb instance.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            folders: folder::FolderDb::new(db.clone())?,
            documents: document::DocumentDb::new(db.clone())?,
            db,
        })
    }
}

impl FolderService for Database {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        self.folders.get(id)
    }

    fn create(&self, folder: Folder) -> Result<Folder, AppError> {
        self.folders.create(&folder)?;
        tracing::info!(folder_id = %folder.id, "Created folder");
        Ok(folder)
    }

    fn attach_documents(
        &self,
        folder_id: Uuid,
        files: Vec<UploadedFile>,
        classification: Classification,
        metadata: DocumentMetadata,
    ) -> Result<(), AppError> {
        let stored = self
            .documents
            .attach_to_folder(folder_id, &files, classification, &metadata)?;
        tracing::info!(
            folder_id = %folder_id,
            count = stored.len(),
            classification = %classification,
            "Attached documents"
        );
        Ok(())
    }
}
