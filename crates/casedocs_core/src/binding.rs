//! Inbound field binding.
//!
//! A [`DataBinder`] populates request representations from client-supplied
//! fields. Names in its disallowed set are dropped before deserialization, so
//! they can never reach the target type even if the type grows a matching
//! field later.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;

/// Binds client-supplied fields into typed representations.
#[derive(Debug, Clone, Default)]
pub struct DataBinder {
    disallowed: Option<BTreeSet<String>>,
}

impl DataBinder {
    /// A binder with no disallowed-field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently disallowed field names, or `None` when never configured.
    pub fn disallowed_fields(&self) -> Option<&BTreeSet<String>> {
        self.disallowed.as_ref()
    }

    /// Replace the disallowed set.
    pub fn set_disallowed_fields<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallowed = Some(fields.into_iter().map(Into::into).collect());
    }

    /// Add a single field to the disallowed set, keeping existing entries.
    pub fn disallow(&mut self, field: impl Into<String>) {
        self.disallowed
            .get_or_insert_with(BTreeSet::new)
            .insert(field.into());
    }

    /// Whether `field` may be populated from client data.
    pub fn is_allowed(&self, field: &str) -> bool {
        self.disallowed
            .as_ref()
            .map(|set| !set.contains(field))
            .unwrap_or(true)
    }

    /// Keep only `(name, value)` pairs whose name is allowed.
    pub fn filter_fields<I, V>(&self, fields: I) -> Vec<(String, V)>
    where
        I: IntoIterator<Item = (String, V)>,
    {
        fields
            .into_iter()
            .filter(|(name, _)| {
                let allowed = self.is_allowed(name);
                if !allowed {
                    tracing::debug!(field = name.as_str(), "Dropped disallowed inbound field");
                }
                allowed
            })
            .collect()
    }

    /// Deserialize `value` into `T` after stripping disallowed top-level keys.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] when the remaining fields do not form a valid `T`.
    pub fn bind_json<T: DeserializeOwned>(&self, mut value: Value) -> Result<T, AppError> {
        if let (Some(disallowed), Value::Object(map)) = (self.disallowed.as_ref(), &mut value) {
            for field in disallowed {
                if map.remove(field).is_some() {
                    tracing::debug!(field = field.as_str(), "Dropped disallowed inbound field");
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}
