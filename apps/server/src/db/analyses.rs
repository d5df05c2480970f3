//! Database queries for analyses.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::analysis::{self, ActiveModel, Entity as Analysis};
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisStatus, NewAnalysis};

use super::DbPool;

impl DbPool {
    /// Insert the empty `pending` placeholder for a recording.
    pub async fn insert_analysis(&self, new: NewAnalysis) -> AppResult<analysis::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            recording_id: Set(new.recording_id),
            user_id: Set(new.user_id),
            status: Set(AnalysisStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert analysis: {}", e)))?;

        Ok(result)
    }

    /// Get an analysis owned by `user_id`.
    pub async fn get_analysis(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<analysis::Model>> {
        let result = Analysis::find_by_id(id)
            .filter(analysis::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get analysis: {}", e)))?;

        Ok(result)
    }

    /// Get the analysis attached to a recording, if any.
    pub async fn analysis_for_recording(
        &self,
        recording_id: Uuid,
    ) -> AppResult<Option<analysis::Model>> {
        let result = Analysis::find()
            .filter(analysis::Column::RecordingId.eq(recording_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get analysis: {}", e)))?;

        Ok(result)
    }

    /// Overwrite an analysis status. Last writer wins.
    pub async fn update_analysis_status(
        &self,
        id: Uuid,
        status: AnalysisStatus,
    ) -> AppResult<analysis::Model> {
        let analysis = Analysis::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get analysis: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Analysis {}", id)))?;

        let mut active: ActiveModel = analysis.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update analysis status: {}", e)))?;

        Ok(result)
    }

    /// Status and headline scores of every analysis a user owns.
    pub async fn analysis_summaries(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<(String, Option<f64>, Option<f64>)>> {
        use sea_orm::QuerySelect;

        let rows = Analysis::find()
            .select_only()
            .column(analysis::Column::Status)
            .column(analysis::Column::SentimentScore)
            .column(analysis::Column::EngagementScore)
            .filter(analysis::Column::UserId.eq(user_id))
            .into_tuple::<(String, Option<f64>, Option<f64>)>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to summarize analyses: {}", e)))?;

        Ok(rows)
    }
}
