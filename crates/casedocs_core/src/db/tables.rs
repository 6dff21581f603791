//! redb table definitions shared by storage modules.

use redb::TableDefinition;
use uuid::Uuid;

/// Canonical folder rows (`Folder`, bincode-encoded).
pub const FOLDERS: TableDefinition<Uuid, &[u8]> = TableDefinition::new("folders");
/// Document rows (`StoredDocument`, bincode-encoded).
pub const DOCUMENTS: TableDefinition<Uuid, &[u8]> = TableDefinition::new("documents");
/// Raw document bytes keyed by document id.
pub const DOCUMENT_CONTENT: TableDefinition<Uuid, &[u8]> =
    TableDefinition::new("document_content");
