//! Database queries for recordings.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::analysis;
use crate::entity::recording::{self, ActiveModel, Entity as Recording};
use crate::error::{AppError, AppResult};
use crate::models::NewRecording;
use crate::models::recording::RECORDING_STATUS_UPLOADED;

use super::DbPool;

impl DbPool {
    /// Insert a new recording with status `uploaded`.
    pub async fn insert_recording(&self, new: NewRecording) -> AppResult<recording::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(new.user_id),
            lead_id: Set(new.lead_id),
            file_name: Set(new.file_name),
            file_size: Set(new.file_size),
            stored_file_url: Set(new.stored_file_url),
            storage_path: Set(new.storage_path),
            transcript: Set(new.transcript),
            status: Set(RECORDING_STATUS_UPLOADED.to_string()),
            duration_seconds: Set(None),
            call_date: Set(None),
            created_at: Set(Utc::now()),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert recording: {}", e)))?;

        Ok(result)
    }

    /// Ids of recordings whose display name equals `name`, across all users.
    pub async fn recording_ids_named(&self, name: &str, limit: u64) -> AppResult<Vec<Uuid>> {
        let ids = Recording::find()
            .select_only()
            .column(recording::Column::Id)
            .filter(recording::Column::FileName.eq(name))
            .limit(limit)
            .into_tuple::<Uuid>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query recording names: {}", e)))?;

        Ok(ids)
    }

    /// Get a recording owned by `user_id`.
    pub async fn get_recording(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<recording::Model>> {
        let result = Recording::find_by_id(id)
            .filter(recording::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get recording: {}", e)))?;

        Ok(result)
    }

    /// List a user's recordings with their analyses, newest first.
    pub async fn list_recordings_with_analyses(
        &self,
        user_id: Uuid,
        lead_id: Option<Uuid>,
    ) -> AppResult<Vec<(recording::Model, Option<analysis::Model>)>> {
        let mut select = Recording::find().filter(recording::Column::UserId.eq(user_id));

        if let Some(lead_id) = lead_id {
            select = select.filter(recording::Column::LeadId.eq(lead_id));
        }

        let rows = select
            .find_also_related(analysis::Entity)
            .order_by_desc(recording::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list recordings: {}", e)))?;

        Ok(rows)
    }

    /// Delete a recording. The analysis row is removed by the foreign key cascade.
    ///
    /// Returns whether a row was deleted.
    pub async fn delete_recording(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = Recording::delete_many()
            .filter(recording::Column::Id.eq(id))
            .filter(recording::Column::UserId.eq(user_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete recording: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Count a user's recordings.
    pub async fn count_recordings(&self, user_id: Uuid) -> AppResult<u64> {
        let total = Recording::find()
            .filter(recording::Column::UserId.eq(user_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count recordings: {}", e)))?;

        Ok(total)
    }
}
