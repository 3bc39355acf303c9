use crate::db::StorageBackend;
use crate::errors::{AppError, AppResult};
use crate::models::ThemeMode;

pub const THEME_KEY: &str = "cleanbox-theme";

/// Stored as the bare word `light` or `dark`; anything else reads as light.
pub fn load_theme(backend: &dyn StorageBackend) -> ThemeMode {
    match backend.read(THEME_KEY) {
        Ok(Some(raw)) => ThemeMode::parse(&raw).unwrap_or_default(),
        Ok(None) => ThemeMode::default(),
        Err(error) => {
            tracing::warn!(error = %error, "failed to read theme preference");
            ThemeMode::default()
        }
    }
}

/// Client-supplied modes must be exactly `light` or `dark`.
pub fn parse_theme(value: &str) -> AppResult<ThemeMode> {
    ThemeMode::parse(value).ok_or_else(|| AppError::Validation(format!("unknown theme '{}'", value)))
}

pub fn save_theme(backend: &dyn StorageBackend, mode: ThemeMode) -> AppResult<()> {
    backend.write(THEME_KEY, mode.as_str())?;
    tracing::debug!(theme = mode.as_str(), "theme saved");
    Ok(())
}
