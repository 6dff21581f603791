//! Folder data models.

use super::document::DocumentRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Folder stored by the folder service and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub name: Option<String>,
    pub documents: Vec<DocumentRef>,
    pub created_by: Option<String>,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub modified_on: DateTime<Utc>,
}

/// Request payload for creating a folder.
///
/// Only the fields listed here are bindable from a client. A scalar `name`
/// is coerced to text; arrays, objects and null leave it absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub name: Option<String>,
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

impl Folder {
    /// Create an empty folder owned by `created_by`.
    pub fn new(name: Option<String>, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            documents: Vec::new(),
            last_modified_by: created_by.clone(),
            created_by,
            created_on: now,
            modified_on: now,
        }
    }
}
