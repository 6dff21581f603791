//! Core domain library for casedocs (config, binding, models, folder service).

/// Inbound field binding with disallowed-field enforcement.
pub mod binding;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// redb-backed reference folder service.
pub mod db;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;
/// Folder service contract consumed by the HTTP layer.
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use binding::DataBinder;
pub use config::Config;
pub use constants::{DEFAULT_PORT, IS_ADMIN};
pub use db::Database;
pub use error::AppError;
pub use service::FolderService;
