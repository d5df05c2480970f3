//! The persistence seams used by the recording and document workflows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Analysis, AnalysisStatus, BrainDocument, NewAnalysis, NewBrainDocument, NewRecording, Recording,
};

/// Recording and analysis operations the core workflows depend on.
///
/// Each call is a single statement; nothing here is transactional.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Ids of recordings (any owner) whose display name equals `name` exactly.
    async fn recording_ids_named(&self, name: &str, limit: u64) -> AppResult<Vec<Uuid>>;

    async fn insert_recording(&self, new: NewRecording) -> AppResult<Recording>;

    async fn insert_analysis(&self, new: NewAnalysis) -> AppResult<Analysis>;

    async fn get_recording(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Recording>>;

    async fn analysis_for_recording(&self, recording_id: Uuid) -> AppResult<Option<Analysis>>;

    /// Recordings newest first, each with its analysis if one exists.
    async fn list_recordings_with_analyses(
        &self,
        user_id: Uuid,
        lead_id: Option<Uuid>,
    ) -> AppResult<Vec<(Recording, Option<Analysis>)>>;

    async fn set_analysis_status(
        &self,
        analysis_id: Uuid,
        status: AnalysisStatus,
    ) -> AppResult<Analysis>;
}

/// Brain document rows, always scoped to their owner.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Id of the user's company brain, if one has been saved.
    async fn company_brain_id(&self, user_id: Uuid) -> AppResult<Option<Uuid>>;

    /// Newest first.
    async fn list_documents(&self, user_id: Uuid) -> AppResult<Vec<BrainDocument>>;

    async fn get_document(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<BrainDocument>>;

    async fn insert_document(&self, new: NewBrainDocument) -> AppResult<BrainDocument>;

    /// Returns whether a row was removed.
    async fn delete_document(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;
}
