pub mod app;
#[cfg(feature = "desktop")]
mod commands;
pub mod data_url;
pub mod db;
pub mod errors;
pub mod files;
pub mod logging;
pub mod models;
pub mod preferences;
pub mod projects;
pub mod query;
pub mod store;
pub mod tags;

pub use crate::app::CleanBox;
pub use crate::errors::{AppError, AppResult};
pub use crate::files::UploadSource;
pub use crate::models::{Document, FileRecord, GlobalHit, Project, SortMode, ThemeMode};

#[cfg(feature = "desktop")]
pub fn run() {
    use tauri::Manager;

    tauri::Builder::default()
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir().map_err(|error| error.to_string())?;
            std::fs::create_dir_all(&app_data_dir).map_err(|error| error.to_string())?;
            logging::init_tracing(&app_data_dir)?;

            let core = CleanBox::open(&app_data_dir).map_err(|error| error.to_string())?;
            tracing::info!(
                projects = core.list_projects().map(|names| names.len()).unwrap_or_default(),
                "cleanbox ready"
            );
            app.manage(commands::AppState { app: core });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::project_create,
            commands::projects_list,
            commands::project_exists,
            commands::project_get,
            commands::project_rename,
            commands::project_delete,
            commands::files_add,
            commands::file_get,
            commands::file_delete,
            commands::file_rename,
            commands::file_tags_set,
            commands::file_tag_add,
            commands::file_tag_remove,
            commands::file_export,
            commands::files_search,
            commands::global_search,
            commands::theme_get,
            commands::theme_set
        ])
        .run(tauri::generate_context!())
        .expect("failed to run tauri app");
}
