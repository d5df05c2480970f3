//! [`RecordStore`] and [`DocumentStore`] backed by PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Analysis, AnalysisStatus, BrainDocument, NewAnalysis, NewBrainDocument, NewRecording, Recording,
};
use crate::services::{DocumentStore, RecordStore};

use super::DbPool;

#[async_trait]
impl RecordStore for DbPool {
    async fn recording_ids_named(&self, name: &str, limit: u64) -> AppResult<Vec<Uuid>> {
        DbPool::recording_ids_named(self, name, limit).await
    }

    async fn insert_recording(&self, new: NewRecording) -> AppResult<Recording> {
        Ok(DbPool::insert_recording(self, new).await?.into())
    }

    async fn insert_analysis(&self, new: NewAnalysis) -> AppResult<Analysis> {
        Ok(DbPool::insert_analysis(self, new).await?.into())
    }

    async fn get_recording(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Recording>> {
        Ok(DbPool::get_recording(self, user_id, id).await?.map(Recording::from))
    }

    async fn analysis_for_recording(&self, recording_id: Uuid) -> AppResult<Option<Analysis>> {
        Ok(DbPool::analysis_for_recording(self, recording_id)
            .await?
            .map(Analysis::from))
    }

    async fn list_recordings_with_analyses(
        &self,
        user_id: Uuid,
        lead_id: Option<Uuid>,
    ) -> AppResult<Vec<(Recording, Option<Analysis>)>> {
        let rows = DbPool::list_recordings_with_analyses(self, user_id, lead_id).await?;
        Ok(rows
            .into_iter()
            .map(|(r, a)| (Recording::from(r), a.map(Analysis::from)))
            .collect())
    }

    async fn set_analysis_status(
        &self,
        analysis_id: Uuid,
        status: AnalysisStatus,
    ) -> AppResult<Analysis> {
        Ok(DbPool::update_analysis_status(self, analysis_id, status)
            .await?
            .into())
    }
}

#[async_trait]
impl DocumentStore for DbPool {
    async fn company_brain_id(&self, user_id: Uuid) -> AppResult<Option<Uuid>> {
        Ok(DbPool::get_company_brain(self, user_id).await?.map(|b| b.id))
    }

    async fn list_documents(&self, user_id: Uuid) -> AppResult<Vec<BrainDocument>> {
        let rows = DbPool::list_brain_documents(self, user_id).await?;
        Ok(rows.into_iter().map(BrainDocument::from).collect())
    }

    async fn get_document(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<BrainDocument>> {
        Ok(DbPool::get_brain_document(self, user_id, id)
            .await?
            .map(BrainDocument::from))
    }

    async fn insert_document(&self, new: NewBrainDocument) -> AppResult<BrainDocument> {
        Ok(DbPool::insert_brain_document(self, new).await?.into())
    }

    async fn delete_document(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        DbPool::delete_brain_document(self, user_id, id).await
    }
}
