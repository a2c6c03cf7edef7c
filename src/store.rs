//! Project file persistence.
//!
//! Projects are written as pretty-printed JSON inside a versioned envelope:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "project": { "product": { "name": "Acme", ... } }
//! }
//! ```
//!
//! Writes go to a temporary file next to the destination and are renamed
//! into place, so an existing file is left intact when saving fails.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::errors::StoreError;
use crate::project::Project;

/// Envelope version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Reads and writes whole projects. Owns no business rules.
pub trait ProjectStore {
    fn save(&self, project: &Project, path: &Path) -> Result<(), StoreError>;
    fn open(&self, path: &Path) -> Result<Project, StoreError>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format_version: u32,
    project: &'a Project,
}

#[derive(Deserialize)]
struct Envelope {
    format_version: u32,
    project: Project,
}

/// JSON file store.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProjectStore;

impl JsonProjectStore {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectStore for JsonProjectStore {
    fn save(&self, project: &Project, path: &Path) -> Result<(), StoreError> {
        let envelope = EnvelopeRef {
            format_version: FORMAT_VERSION,
            project,
        };
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| StoreError::corrupt(path, format!("serialization failed: {e}")))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(path, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| StoreError::io(path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(path, e))?;
        tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

        log::debug!(
            "Wrote {} license(s) to {}",
            project.license_count(),
            path.display()
        );
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<Project, StoreError> {
        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;

        if bytes.is_empty() {
            return Err(StoreError::corrupt(path, "file is empty"));
        }

        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|e| {
            let message = if e.is_eof() {
                format!("file is truncated: {e}")
            } else {
                e.to_string()
            };
            StoreError::corrupt(path, message)
        })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(StoreError::corrupt(
                path,
                format!(
                    "unsupported format version {} (expected {})",
                    envelope.format_version, FORMAT_VERSION
                ),
            ));
        }

        log::debug!(
            "Read {} license(s) from {}",
            envelope.project.license_count(),
            path.display()
        );
        Ok(envelope.project)
    }
}
