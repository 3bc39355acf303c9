use crate::db::StorageBackend;
use crate::errors::{AppError, AppResult};
use crate::models::Document;
use std::sync::{Arc, Mutex};

pub const DATA_KEY: &str = "cleanbox-data";

/// Owns the in-memory document and writes it through to the backend after
/// every successful mutation.
pub struct Store {
    backend: Arc<dyn StorageBackend>,
    document: Mutex<Document>,
}

impl Store {
    /// Never fails: unreadable or malformed data degrades to an empty document.
    pub fn load(backend: Arc<dyn StorageBackend>) -> Self {
        let document = match backend.read(DATA_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Document>(&raw) {
                Ok(mut document) => {
                    sync_project_names(&mut document);
                    document
                }
                Err(error) => {
                    tracing::warn!(error = %error, "stored document is malformed, resetting");
                    Document::default()
                }
            },
            Ok(None) => Document::default(),
            Err(error) => {
                tracing::warn!(error = %error, "failed to read stored document, resetting");
                Document::default()
            }
        };
        tracing::debug!(projects = document.projects.len(), "document loaded");

        Self {
            backend,
            document: Mutex::new(document),
        }
    }

    pub fn read<T>(&self, reader: impl FnOnce(&Document) -> T) -> AppResult<T> {
        let document = self.lock()?;
        Ok(reader(&document))
    }

    /// Runs `mutator` and persists the whole document if it succeeds. A
    /// mutator that fails must leave the document untouched.
    pub fn apply<T>(&self, mutator: impl FnOnce(&mut Document) -> AppResult<T>) -> AppResult<T> {
        let mut document = self.lock()?;
        let result = mutator(&mut document)?;
        let raw = serde_json::to_string(&*document)?;
        self.backend.write(DATA_KEY, &raw)?;
        Ok(result)
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Document>> {
        self.document
            .lock()
            .map_err(|_| AppError::Internal("document mutex poisoned".to_string()))
    }
}

/// The map key is authoritative; a stored `name` that disagrees is replaced.
fn sync_project_names(document: &mut Document) {
    for (key, project) in document.projects.iter_mut() {
        if project.name != *key {
            tracing::warn!(key = %key, name = %project.name, "project name out of sync with key, repairing");
            project.name = key.clone();
        }
    }
}
