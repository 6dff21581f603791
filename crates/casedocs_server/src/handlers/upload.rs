//! Multipart decoding for document uploads.

use crate::AppError;
use axum::extract::multipart::{Multipart, MultipartError};
use casedocs_core::config::parse_list;
use casedocs_core::models::document::{Classification, DocumentMetadata, UploadedFile};
use casedocs_core::DataBinder;

const FILES_FIELD: &str = "files";
const CLASSIFICATION_FIELD: &str = "classification";
const ROLES_FIELD: &str = "roles";

/// Validated contents of a document upload form.
#[derive(Debug)]
pub(crate) struct DocumentUpload {
    pub files: Vec<UploadedFile>,
    pub classification: Classification,
    pub extras: DocumentMetadata,
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

/// Extract `<key>` from a `metadata[<key>]` field name.
fn metadata_key(field_name: &str) -> Option<&str> {
    field_name
        .strip_prefix("metadata[")
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|key| !key.is_empty())
}

/// Read every part of an upload form through `binder`.
///
/// Fields the binder disallows are skipped, both as top-level parts and as
/// metadata keys.
///
/// # Errors
/// Returns [`AppError::BadRequest`] when the body is malformed, carries no
/// files, or lacks a valid classification.
pub(crate) async fn read_document_upload(
    mut multipart: Multipart,
    binder: &DataBinder,
) -> Result<DocumentUpload, AppError> {
    let mut files = Vec::new();
    let mut classification = None;
    let mut extras = DocumentMetadata::default();
    let mut metadata_fields = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if !binder.is_allowed(&name) {
            tracing::debug!(field = name.as_str(), "Dropped disallowed upload field");
            continue;
        }

        match name.as_str() {
            FILES_FIELD => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let mime_type = field.content_type().map(str::to_string);
                let content = field.bytes().await.map_err(multipart_error)?;
                files.push(UploadedFile::new(file_name, mime_type, content.to_vec()));
            }
            CLASSIFICATION_FIELD => {
                let text = field.text().await.map_err(multipart_error)?;
                classification = Some(text.parse::<Classification>()?);
            }
            ROLES_FIELD => {
                let text = field.text().await.map_err(multipart_error)?;
                extras.roles.extend(parse_list(&text));
            }
            other => match metadata_key(other) {
                Some(key) => {
                    let key = key.to_string();
                    let text = field.text().await.map_err(multipart_error)?;
                    metadata_fields.push((key, text));
                }
                None => {
                    tracing::debug!(field = other, "Ignoring unknown upload field");
                }
            },
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(
            "At least one file is required".to_string(),
        ));
    }
    let classification = classification
        .ok_or_else(|| AppError::BadRequest("A classification is required".to_string()))?;
    extras.metadata = binder.filter_fields(metadata_fields).into_iter().collect();

    Ok(DocumentUpload {
        files,
        classification,
        extras,
    })
}
