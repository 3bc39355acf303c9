use crate::db::{Database, StorageBackend};
use crate::errors::AppResult;
use crate::files::{self, UploadSource};
use crate::models::{FileRecord, GlobalHit, Project, SortMode, ThemeMode};
use crate::preferences;
use crate::projects;
use crate::query;
use crate::store::Store;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DB_FILE_NAME: &str = "cleanbox.sqlite";

/// Composition root: owns the store and the backend it writes through to.
pub struct CleanBox {
    store: Store,
    backend: Arc<dyn StorageBackend>,
}

impl CleanBox {
    pub fn open(app_data_dir: &Path) -> AppResult<Arc<Self>> {
        let db = Database::new(&app_data_dir.join(DB_FILE_NAME))?;
        Ok(Self::with_backend(Arc::new(db)))
    }

    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Arc<Self> {
        Arc::new(Self {
            store: Store::load(backend.clone()),
            backend,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn create_project(&self, name: &str) -> AppResult<()> {
        projects::project_create(&self.store, name)
    }

    pub fn list_projects(&self) -> AppResult<Vec<String>> {
        projects::projects_list(&self.store)
    }

    pub fn project_exists(&self, name: &str) -> AppResult<bool> {
        projects::project_exists(&self.store, name)
    }

    pub fn get_project(&self, name: &str) -> AppResult<Option<Project>> {
        projects::project_get(&self.store, name)
    }

    pub fn rename_project(&self, old_name: &str, new_name: &str) -> AppResult<()> {
        projects::project_rename(&self.store, old_name, new_name)
    }

    pub fn delete_project(&self, name: &str) -> AppResult<()> {
        projects::project_delete(&self.store, name)
    }

    pub async fn add_files(&self, project_name: &str, sources: &[UploadSource]) -> AppResult<Vec<FileRecord>> {
        files::files_add(&self.store, project_name, sources).await
    }

    pub fn get_file(&self, project_name: &str, file_id: &str) -> AppResult<Option<FileRecord>> {
        files::file_get(&self.store, project_name, file_id)
    }

    pub fn delete_file(&self, project_name: &str, file_id: &str) -> AppResult<bool> {
        files::file_delete(&self.store, project_name, file_id)
    }

    pub fn rename_file(&self, project_name: &str, file_id: &str, new_name: &str) -> AppResult<Option<FileRecord>> {
        files::file_rename(&self.store, project_name, file_id, new_name)
    }

    pub fn set_tags(&self, project_name: &str, file_id: &str, tags: &[String]) -> AppResult<Option<FileRecord>> {
        files::file_set_tags(&self.store, project_name, file_id, tags)
    }

    pub fn add_tag(&self, project_name: &str, file_id: &str, tag: &str) -> AppResult<Option<FileRecord>> {
        files::file_add_tag(&self.store, project_name, file_id, tag)
    }

    pub fn remove_tag(&self, project_name: &str, file_id: &str, tag: &str) -> AppResult<Option<FileRecord>> {
        files::file_remove_tag(&self.store, project_name, file_id, tag)
    }

    pub fn export_file(&self, project_name: &str, file_id: &str, dest_dir: &Path) -> AppResult<Option<PathBuf>> {
        files::file_export(&self.store, project_name, file_id, dest_dir)
    }

    pub fn scoped_search(&self, project_name: &str, text: &str, mode: SortMode) -> AppResult<Vec<FileRecord>> {
        query::scoped_search(&self.store, project_name, text, mode)
    }

    pub fn global_search(&self, text: &str, mode: SortMode) -> AppResult<Vec<GlobalHit>> {
        query::global_search(&self.store, text, mode)
    }

    pub fn all_files(&self) -> AppResult<Vec<GlobalHit>> {
        query::all_files(&self.store)
    }

    pub fn theme(&self) -> ThemeMode {
        preferences::load_theme(self.backend.as_ref())
    }

    pub fn set_theme(&self, mode: ThemeMode) -> AppResult<ThemeMode> {
        preferences::save_theme(self.backend.as_ref(), mode)?;
        Ok(mode)
    }

    /// Rejects anything but `light`/`dark` without touching the stored theme.
    pub fn set_theme_named(&self, mode: &str) -> AppResult<ThemeMode> {
        let mode = preferences::parse_theme(mode)?;
        self.set_theme(mode)
    }

    pub fn toggle_theme(&self) -> AppResult<ThemeMode> {
        self.set_theme(self.theme().toggled())
    }
}
