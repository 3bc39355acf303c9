use crate::app::CleanBox;
use crate::files::UploadSource;
use crate::models::{FileRecord, GlobalHit, Project, SortMode, ThemeMode};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<CleanBox>,
}

fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}

#[tauri::command]
pub fn project_create(state: tauri::State<'_, AppState>, name: String) -> Result<(), String> {
    state.app.create_project(&name).map_err(to_client_error)
}

#[tauri::command]
pub fn projects_list(state: tauri::State<'_, AppState>) -> Result<Vec<String>, String> {
    state.app.list_projects().map_err(to_client_error)
}

#[tauri::command]
pub fn project_exists(state: tauri::State<'_, AppState>, name: String) -> Result<bool, String> {
    state.app.project_exists(&name).map_err(to_client_error)
}

#[tauri::command]
pub fn project_get(state: tauri::State<'_, AppState>, name: String) -> Result<Option<Project>, String> {
    state.app.get_project(&name).map_err(to_client_error)
}

#[tauri::command]
pub fn project_rename(
    state: tauri::State<'_, AppState>,
    old_name: String,
    new_name: String,
) -> Result<(), String> {
    state
        .app
        .rename_project(&old_name, &new_name)
        .map_err(to_client_error)
}

#[tauri::command]
pub fn project_delete(state: tauri::State<'_, AppState>, name: String) -> Result<(), String> {
    state.app.delete_project(&name).map_err(to_client_error)
}

#[tauri::command]
pub async fn files_add(
    state: tauri::State<'_, AppState>,
    project_name: String,
    paths: Vec<String>,
) -> Result<Vec<FileRecord>, String> {
    let sources: Vec<UploadSource> = paths
        .into_iter()
        .map(|path| UploadSource::Path(PathBuf::from(path)))
        .collect();
    state
        .app
        .add_files(&project_name, &sources)
        .await
        .map_err(to_client_error)
}

#[tauri::command]
pub fn file_get(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
) -> Result<Option<FileRecord>, String> {
    state.app.get_file(&project_name, &file_id).map_err(to_client_error)
}

#[tauri::command]
pub fn file_delete(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
) -> Result<bool, String> {
    state.app.delete_file(&project_name, &file_id).map_err(to_client_error)
}

#[tauri::command]
pub fn file_rename(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
    new_name: String,
) -> Result<Option<FileRecord>, String> {
    state
        .app
        .rename_file(&project_name, &file_id, &new_name)
        .map_err(to_client_error)
}

#[tauri::command]
pub fn file_tags_set(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
    tags: Vec<String>,
) -> Result<Option<FileRecord>, String> {
    state
        .app
        .set_tags(&project_name, &file_id, &tags)
        .map_err(to_client_error)
}

#[tauri::command]
pub fn file_tag_add(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
    tag: String,
) -> Result<Option<FileRecord>, String> {
    state.app.add_tag(&project_name, &file_id, &tag).map_err(to_client_error)
}

#[tauri::command]
pub fn file_tag_remove(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
    tag: String,
) -> Result<Option<FileRecord>, String> {
    state
        .app
        .remove_tag(&project_name, &file_id, &tag)
        .map_err(to_client_error)
}

#[tauri::command]
pub fn file_export(
    state: tauri::State<'_, AppState>,
    project_name: String,
    file_id: String,
    dest_dir: String,
) -> Result<Option<String>, String> {
    state
        .app
        .export_file(&project_name, &file_id, &PathBuf::from(dest_dir))
        .map(|path| path.map(|value| value.to_string_lossy().to_string()))
        .map_err(to_client_error)
}

#[tauri::command]
pub fn files_search(
    state: tauri::State<'_, AppState>,
    project_name: String,
    text: String,
    sort_mode: String,
) -> Result<Vec<FileRecord>, String> {
    state
        .app
        .scoped_search(&project_name, &text, SortMode::from_client(&sort_mode))
        .map_err(to_client_error)
}

#[tauri::command]
pub fn global_search(
    state: tauri::State<'_, AppState>,
    text: String,
    sort_mode: String,
) -> Result<Vec<GlobalHit>, String> {
    state
        .app
        .global_search(&text, SortMode::from_client(&sort_mode))
        .map_err(to_client_error)
}

#[tauri::command]
pub fn theme_get(state: tauri::State<'_, AppState>) -> Result<ThemeMode, String> {
    Ok(state.app.theme())
}

#[tauri::command]
pub fn theme_set(state: tauri::State<'_, AppState>, mode: String) -> Result<ThemeMode, String> {
    state.app.set_theme_named(&mode).map_err(to_client_error)
}
