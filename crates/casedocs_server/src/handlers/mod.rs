//! HTTP request handlers.

/// Folder endpoints.
pub mod folder;
/// Liveness endpoint.
pub mod health;
pub(crate) mod normalize;
pub(crate) mod upload;
