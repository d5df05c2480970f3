//! Display-name uniqueness check run before a recording is created.
//!
//! The check and the later insert are separate statements, so two concurrent
//! submissions with the same name can both pass.

use tracing::warn;

use super::RecordStore;
use crate::error::AppError;

pub const DUPLICATE_NAME_MESSAGE: &str =
    "A recording with this name already exists. Please choose a different name.";

pub const UNVERIFIABLE_NAME_MESSAGE: &str =
    "Unable to verify file name uniqueness. Please try again.";

/// Outcome of a uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    Unique,
    Duplicate,
    /// The store could not be queried; treated as a rejection.
    Unverifiable,
}

impl NameCheck {
    /// Convert a rejection into the error returned to the caller.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            NameCheck::Unique => Ok(()),
            NameCheck::Duplicate => Err(AppError::Conflict(DUPLICATE_NAME_MESSAGE.to_string())),
            NameCheck::Unverifiable => Err(AppError::ServiceUnavailable(
                UNVERIFIABLE_NAME_MESSAGE.to_string(),
            )),
        }
    }
}

/// Look for an existing recording with the same trimmed name. Fails closed.
pub async fn check_unique_name(store: &dyn RecordStore, name: &str) -> NameCheck {
    match store.recording_ids_named(name.trim(), 1).await {
        Ok(ids) if ids.is_empty() => NameCheck::Unique,
        Ok(_) => NameCheck::Duplicate,
        Err(e) => {
            warn!("Error checking file name uniqueness: {}", e);
            NameCheck::Unverifiable
        }
    }
}
