//! Multipart form field readers shared by the upload handlers.

use actix_multipart::Field;
use futures_util::StreamExt;

use crate::error::{AppError, AppResult};

/// Upper bound for a single text field.
pub const MAX_TEXT_FIELD_BYTES: usize = 10 * 1024 * 1024;

/// Read a text field into a string.
pub async fn read_text(field: &mut Field, name: &str) -> AppResult<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::PayloadTooLarge(format!("Field '{}' is too large", name)));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf)
        .map_err(|_| AppError::InvalidInput(format!("Field '{}' must be UTF-8 text", name)))
}

/// Read a file field, stopping with `too_large` once `max_bytes` is exceeded.
pub async fn read_bytes(
    field: &mut Field,
    max_bytes: u64,
    too_large: impl Fn() -> AppError,
) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        if (data.len() + chunk.len()) as u64 > max_bytes {
            return Err(too_large());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Drain a field the handler does not use.
pub async fn skip(field: &mut Field) {
    while field.next().await.is_some() {}
}
