//! Folder HTTP handlers.

use super::normalize::normalize_optional;
use super::upload::read_document_upload;
use crate::{auth::Caller, error::HttpError, models::folder::*, AppError, AppState};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use casedocs_core::{DataBinder, IS_ADMIN};
use serde_json::Value;
use uuid::Uuid;

/// Configure a binder for inbound folder representations.
///
/// `isAdmin` is always disallowed, whatever the binder held before.
pub fn init_binder(binder: &mut DataBinder) {
    binder.disallow(IS_ADMIN);
}

fn folder_binder() -> DataBinder {
    let mut binder = DataBinder::new();
    init_binder(&mut binder);
    binder
}

/// A path id that is not a UUID cannot name a folder.
fn parse_folder_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound)
}

/// Create a new folder.
///
/// # Arguments
/// - `state`: Application state.
/// - `caller`: Authorized caller, recorded as the folder's creator.
/// - `body`: Folder representation. A body that is not a JSON object binds
///   no fields.
///
/// # Returns
/// The created folder as JSON.
///
/// # Errors
/// Returns an error if the folder service fails.
pub async fn create_folder(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<Value>,
) -> Result<Json<Folder>, HttpError> {
    let req: CreateFolderRequest = match body {
        Value::Object(_) => folder_binder().bind_json(body)?,
        _ => {
            tracing::debug!("Folder representation is not an object; binding no fields");
            CreateFolderRequest::default()
        }
    };
    let folder = Folder::new(normalize_optional(req.name), Some(caller.user_id));
    let created = state.folders.create(folder)?;
    Ok(Json(created))
}

/// Fetch a folder by id.
///
/// # Returns
/// The folder as JSON, or 404 with an empty body when absent.
///
/// # Errors
/// Returns an error if the folder service fails.
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Folder>, HttpError> {
    let id = parse_folder_id(&id)?;
    let folder = state.folders.find_by_id(id)?.ok_or(AppError::NotFound)?;
    Ok(Json(folder))
}

/// Attach uploaded documents to an existing folder.
///
/// # Arguments
/// - `state`: Application state.
/// - `caller`: Authorized caller, recorded as the uploader.
/// - `id`: Folder identifier from the path.
/// - `multipart`: `files`, `classification`, optional `roles` and `metadata[<key>]` parts.
///
/// # Returns
/// `204 No Content` once the documents are stored.
///
/// # Errors
/// Returns 400 for an invalid upload, 404 when the folder does not exist
/// (nothing is stored), or the folder service's error.
pub async fn post_documents(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<StatusCode, HttpError> {
    let id = parse_folder_id(&id)?;
    let mut upload = read_document_upload(multipart, &folder_binder()).await?;

    if state.folders.find_by_id(id)?.is_none() {
        return Err(AppError::NotFound.into());
    }

    upload.extras.uploaded_by = Some(caller.user_id);
    state
        .folders
        .attach_documents(id, upload.files, upload.classification, upload.extras)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Folder deletion is withdrawn; the route answers 405 without touching state.
pub async fn delete_folder(Path(id): Path<String>) -> HttpError {
    tracing::debug!(folder_id = id.as_str(), "Rejected withdrawn folder delete");
    AppError::MethodWithdrawn { allow: "GET" }.into()
}
