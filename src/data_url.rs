use crate::errors::{AppError, AppResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn mime_for_name(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    let mime = if mime.trim().is_empty() { FALLBACK_MIME } else { mime.trim() };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Only base64 data URLs are accepted, the only kind this crate writes.
pub fn decode(url: &str) -> AppResult<DecodedDataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AppError::Validation("data URL must start with 'data:'".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::Validation("data URL has no payload separator".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::Validation("only base64 data URLs are supported".to_string()))?;

    Ok(DecodedDataUrl {
        mime: if mime.is_empty() { FALLBACK_MIME.to_string() } else { mime.to_string() },
        bytes: STANDARD.decode(payload)?,
    })
}
