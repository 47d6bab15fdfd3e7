use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{TransportError, TransportResult};

/// Read access to the content API.
///
/// The engine only issues `GET`s for structure definitions; authentication,
/// retries and timeouts belong to the implementation.
pub trait Transport: Send + Sync {
    /// Fetches the JSON body at `path` (relative to the API root).
    fn get(&self, path: &str) -> TransportResult<Value>;
}

/// The API path of a structure definition.
pub fn structure_path(id: u64) -> String {
    format!("builder/structures/{id}/basic")
}

/// Serves structure definitions from JSON files on disk.
///
/// `builder/structures/{id}/basic` is answered with `{root}/{id}.json`;
/// every other path is not found.
#[derive(Debug, Clone)]
pub struct DirectoryTransport {
    root: PathBuf,
}

impl DirectoryTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, path: &str) -> Option<PathBuf> {
        let id = path
            .strip_prefix("builder/structures/")?
            .strip_suffix("/basic")?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(self.root.join(format!("{id}.json")))
    }
}

impl Transport for DirectoryTransport {
    fn get(&self, path: &str) -> TransportResult<Value> {
        let file = self
            .file_for(path)
            .ok_or_else(|| TransportError::NotFound(path.to_string()))?;
        if !file.exists() {
            return Err(TransportError::NotFound(path.to_string()));
        }
        debug!("Reading {} from {:?}", path, file);
        let contents = std::fs::read_to_string(&file)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
