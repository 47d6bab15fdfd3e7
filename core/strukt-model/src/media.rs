//! File and image attachments referenced by entry fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce;

/// A file attached to an entry field.
///
/// Wraps the attribute object the API returns (`id`, `path`, `name`, ...).
/// Only objects with a non-empty `path` are considered files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct File {
    attributes: Map<String, Value>,
}

impl File {
    /// Casts a raw value into a file. Returns `None` unless the value is an
    /// object with a non-empty `path`.
    pub fn cast(raw: &Value) -> Option<Self> {
        let attributes = raw.as_object()?;
        let has_path = attributes.get("path").is_some_and(|p| !coerce::is_blank(p));
        has_path.then(|| Self {
            attributes: attributes.clone(),
        })
    }

    /// Returns the raw attribute object.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns an attribute by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Storage path of the file on the CDN.
    pub fn path(&self) -> Option<&str> {
        self.attributes.get("path").and_then(Value::as_str)
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    /// The identifier written back to the API when the field is saved:
    /// `id`, falling back to the `file` reference.
    pub fn identifier(&self) -> Option<String> {
        ["id", "file"]
            .iter()
            .filter_map(|key| self.attributes.get(*key))
            .find(|v| !coerce::is_blank(v))
            .map(coerce::to_text)
            .filter(|s| !s.is_empty())
    }

    /// Joins the file path onto a CDN base url.
    pub fn url(&self, cdn_base: &str) -> Option<String> {
        let path = self.path()?;
        Some(format!(
            "{}/{}",
            cdn_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

/// An image attached to an entry field. Carries the same attributes as a
/// [`File`] plus image metadata (`file`, `description`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Image {
    file: File,
}

impl Image {
    /// Casts a raw value into an image, with the same rules as [`File::cast`].
    pub fn cast(raw: &Value) -> Option<Self> {
        File::cast(raw).map(|file| Self { file })
    }

    /// The underlying file attributes.
    pub fn as_file(&self) -> &File {
        &self.file
    }

    /// Id of the referenced media file. `0` and empty values become `None`.
    pub fn file_id(&self) -> Option<i64> {
        self.file
            .get("file")
            .map(coerce::to_int)
            .filter(|id| *id != 0)
    }

    pub fn description(&self) -> Option<&str> {
        self.file.get("description").and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.file.path()
    }

    pub fn name(&self) -> Option<&str> {
        self.file.name()
    }

    pub fn identifier(&self) -> Option<String> {
        self.file.identifier()
    }

    pub fn url(&self, cdn_base: &str) -> Option<String> {
        self.file.url(cdn_base)
    }
}
