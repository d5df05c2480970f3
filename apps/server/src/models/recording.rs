//! Recording domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::analysis::{Analysis, StatusPhase};
use crate::entity::recording;

/// Status written on every new recording.
pub const RECORDING_STATUS_UPLOADED: &str = "uploaded";

/// Recording as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Recording {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub stored_file_url: Option<String>,
    pub storage_path: Option<String>,
    pub transcript: Option<String>,
    pub status: String,
    pub duration_seconds: Option<i32>,
    pub call_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<recording::Model> for Recording {
    fn from(m: recording::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            lead_id: m.lead_id,
            file_name: m.file_name,
            file_size: m.file_size,
            stored_file_url: m.stored_file_url,
            storage_path: m.storage_path,
            transcript: m.transcript,
            status: m.status,
            duration_seconds: m.duration_seconds,
            call_date: m.call_date,
            created_at: m.created_at,
        }
    }
}

/// Fields for a recording insert. Exactly one of `stored_file_url` and `transcript` is set.
#[derive(Debug, Clone)]
pub struct NewRecording {
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub stored_file_url: Option<String>,
    pub storage_path: Option<String>,
    pub transcript: Option<String>,
}

/// Response for a successful submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddRecordingResponse {
    pub recording: Recording,
    /// Absent when the analysis placeholder could not be created
    pub analysis_id: Option<Uuid>,
    pub message: String,
}

/// Query parameters for listing recordings.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListRecordingsQuery {
    pub lead_id: Option<Uuid>,
}

/// A recording paired with its analysis and the derived status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordingStatusView {
    pub recording: Recording,
    pub analysis: Option<Analysis>,
    pub phase: StatusPhase,
    pub status_label: String,
    pub can_retry: bool,
}

impl RecordingStatusView {
    /// A recording without an analysis reads as queued.
    pub fn derive(recording: Recording, analysis: Option<Analysis>) -> Self {
        let phase = analysis
            .as_ref()
            .map(Analysis::phase)
            .unwrap_or(StatusPhase::Queued);

        Self {
            recording,
            analysis,
            phase,
            status_label: phase.label().to_string(),
            can_retry: phase.is_retryable(),
        }
    }
}

/// Response for the retry endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RetryResponse {
    pub recording_id: Uuid,
    pub analysis_id: Uuid,
    pub message: String,
}

/// Response for a deleted resource.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub id: Uuid,
    pub deleted: bool,
}
