//! Folder storage operations backed by redb.

use super::tables::FOLDERS;
use crate::{error::AppError, models::folder::Folder};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;
use uuid::Uuid;

/// Accessor for the `folders` table.
pub struct FolderDb {
    db: Arc<redb::Database>,
}

impl FolderDb {
    /// Initialize the `folders` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(FOLDERS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new folder.
    ///
    /// # Errors
    /// Returns an error if the id already exists or storage fails.
    pub fn create(&self, folder: &Folder) -> Result<(), AppError> {
        let encoded = bincode::serialize(folder)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut folders = write_txn.open_table(FOLDERS)?;
            if folders.get(folder.id)?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Folder id '{}' already exists",
                    folder.id
                )));
            }
            folders.insert(folder.id, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a folder by id.
    ///
    /// # Returns
    /// `Ok(Some(folder))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        let read_txn = self.db.begin_read()?;
        let folders = read_txn.open_table(FOLDERS)?;
        match folders.get(id)? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }
}
