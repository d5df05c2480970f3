//! Brain document uploads and removal.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::file_validator::validate_document_size;
use super::record_store::DocumentStore;
use super::storage::{ObjectStore, StorageBucket, document_key};
use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::brain::default_document_name;
use crate::models::{BrainDocument, DocumentFileType, NewBrainDocument};

/// A document as received from the upload form.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Display name; defaults to the file name without its extension
    pub name: Option<String>,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Company knowledge base documents backed by object storage.
#[derive(Clone)]
pub struct DocumentLibrary {
    store: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
    max_document_size: u64,
}

impl DocumentLibrary {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        max_document_size: u64,
    ) -> Self {
        Self {
            store,
            objects,
            max_document_size,
        }
    }

    pub fn max_document_size(&self) -> u64 {
        self.max_document_size
    }

    pub async fn list(&self, user: &CurrentUser) -> AppResult<Vec<BrainDocument>> {
        self.store.list_documents(user.id).await
    }

    /// Store the file, then record it. A failed insert leaves the object behind.
    pub async fn upload(
        &self,
        user: &CurrentUser,
        upload: DocumentUpload,
    ) -> AppResult<BrainDocument> {
        validate_document_size(upload.data.len() as u64, self.max_document_size)
            .map_err(|rejection| AppError::PayloadTooLarge(rejection.message()))?;

        let display_name = upload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .unwrap_or_else(|| default_document_name(&upload.file_name));

        let mime_type = upload
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let key = document_key(&user.id, Utc::now().timestamp_millis(), &upload.file_name);
        let object = self
            .objects
            .upload(
                StorageBucket::Documents,
                &key,
                upload.data,
                Some(mime_type.as_str()),
            )
            .await?;

        let company_brain_id = self.store.company_brain_id(user.id).await?;

        let document = self
            .store
            .insert_document(NewBrainDocument {
                user_id: user.id,
                company_brain_id,
                file_name: display_name,
                file_type: DocumentFileType::from_mime(&mime_type),
                file_size: object.size as i64,
                storage_path: key.clone(),
                storage_url: object.public_url,
                mime_type,
            })
            .await
            .inspect_err(|_| {
                warn!(storage_path = %key, "Document insert failed; uploaded object left orphaned");
            })?;

        info!(document_id = %document.id, "Brain document uploaded");
        Ok(document)
    }

    /// Remove the stored object (failure is only logged), then the row.
    pub async fn delete(&self, user: &CurrentUser, id: Uuid) -> AppResult<()> {
        let document = self
            .store
            .get_document(user.id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document".to_string()))?;

        if let Err(e) = self
            .objects
            .remove(StorageBucket::Documents, &document.storage_path)
            .await
        {
            warn!(storage_path = %document.storage_path, "Failed to remove document object: {}", e);
        }

        self.store.delete_document(user.id, id).await?;
        info!(document_id = %id, "Brain document deleted");
        Ok(())
    }
}
