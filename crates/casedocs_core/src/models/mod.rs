//! Data models for API requests and persistence.

/// Document attachment types.
pub mod document;
/// Folder data types.
pub mod folder;
