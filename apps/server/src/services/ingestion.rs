//! The "add recording" workflow.
//!
//! Steps run in order, each awaited before the next:
//! uniqueness check, upload (audio only), recording insert, analysis
//! placeholder insert, background webhook submission, refresh event.
//! Success is decided once the recording row exists; nothing is rolled back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::file_validator::{FileRejection, file_extension, validate_recording_file};
use super::notifier::{AnalysisDispatch, WebhookPayload};
use super::storage::{ObjectStore, StorageBucket, recording_key};
use super::uniqueness::check_unique_name;
use super::{EventBroadcaster, RecordStore};
use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{DashboardEvent, NewAnalysis, NewRecording, Recording};

pub const AUDIO_QUEUED_MESSAGE: &str = "Your recording has been uploaded and queued for analysis.";
pub const TRANSCRIPT_QUEUED_MESSAGE: &str = "Your transcript has been saved and queued for analysis.";

/// An uploaded audio or video file.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// The two mutually exclusive ways to supply a call.
#[derive(Debug, Clone)]
pub enum RecordingInput {
    Audio(AudioUpload),
    Transcript(String),
}

#[derive(Debug, Clone)]
pub struct AddRecordingRequest {
    pub name: String,
    pub input: RecordingInput,
    pub lead_id: Option<Uuid>,
}

/// What the caller gets back on success.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    pub recording: Recording,
    pub analysis_id: Option<Uuid>,
    pub message: &'static str,
}

/// Orchestrates recording submission.
#[derive(Clone)]
pub struct IngestionWorkflow {
    store: Arc<dyn RecordStore>,
    objects: Arc<dyn ObjectStore>,
    dispatch: Arc<dyn AnalysisDispatch>,
    events: EventBroadcaster,
    max_recording_size: u64,
}

impl IngestionWorkflow {
    pub fn new(
        store: Arc<dyn RecordStore>,
        objects: Arc<dyn ObjectStore>,
        dispatch: Arc<dyn AnalysisDispatch>,
        events: EventBroadcaster,
        max_recording_size: u64,
    ) -> Self {
        Self {
            store,
            objects,
            dispatch,
            events,
            max_recording_size,
        }
    }

    /// Upload limit for audio files, in bytes.
    pub fn max_recording_size(&self) -> u64 {
        self.max_recording_size
    }

    /// Validate inputs before any side effect.
    fn validate(&self, request: &AddRecordingRequest) -> AppResult<()> {
        let has_name = !request.name.trim().is_empty();

        match &request.input {
            RecordingInput::Audio(upload) => {
                if !has_name {
                    return Err(AppError::InvalidInput(
                        "Please select a file and provide a name".to_string(),
                    ));
                }
                validate_recording_file(
                    &upload.file_name,
                    upload.content_type.as_deref(),
                    upload.data.len() as u64,
                    self.max_recording_size,
                )
                .map_err(|rejection| match rejection {
                    FileRejection::TooLarge { .. } => {
                        AppError::PayloadTooLarge(rejection.message())
                    }
                    FileRejection::InvalidType => AppError::InvalidInput(rejection.message()),
                })?;
            }
            RecordingInput::Transcript(text) => {
                if !has_name || text.trim().is_empty() {
                    return Err(AppError::InvalidInput(
                        "Please provide both a transcript and a recording name".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Run the workflow for `user`.
    pub async fn add_recording(
        &self,
        user: &CurrentUser,
        request: AddRecordingRequest,
    ) -> AppResult<IngestionOutcome> {
        self.validate(&request)?;

        let name = request.name.trim().to_string();

        check_unique_name(self.store.as_ref(), &name)
            .await
            .into_result()?;

        let (stored, transcript, message) = match request.input {
            RecordingInput::Audio(upload) => {
                let key = recording_key(
                    &user.id,
                    Utc::now().timestamp_millis(),
                    &name,
                    file_extension(&upload.file_name),
                );
                let object = self
                    .objects
                    .upload(
                        StorageBucket::Recordings,
                        &key,
                        upload.data,
                        upload.content_type.as_deref(),
                    )
                    .await?;
                (Some((key, object)), None, AUDIO_QUEUED_MESSAGE)
            }
            RecordingInput::Transcript(text) => {
                (None, Some(text.trim().to_string()), TRANSCRIPT_QUEUED_MESSAGE)
            }
        };

        let storage_path = stored.as_ref().map(|(key, _)| key.clone());
        let stored_file_url = stored.as_ref().map(|(_, obj)| obj.public_url.clone());

        let new_recording = NewRecording {
            user_id: user.id,
            lead_id: request.lead_id,
            file_name: name.clone(),
            file_size: stored.as_ref().map(|(_, obj)| obj.size as i64),
            stored_file_url: stored_file_url.clone(),
            storage_path: storage_path.clone(),
            transcript: transcript.clone(),
        };

        let recording = match self.store.insert_recording(new_recording).await {
            Ok(recording) => recording,
            Err(e) => {
                if let Some(key) = &storage_path {
                    warn!(storage_path = %key, "Recording insert failed; uploaded object left orphaned");
                }
                return Err(e);
            }
        };

        let analysis_id = match self
            .store
            .insert_analysis(NewAnalysis {
                recording_id: recording.id,
                user_id: user.id,
            })
            .await
        {
            Ok(analysis) => Some(analysis.id),
            Err(e) => {
                warn!(recording_id = %recording.id, "Failed to create analysis record: {}", e);
                None
            }
        };

        self.dispatch.submit(WebhookPayload {
            recording_id: recording.id,
            analysis_id,
            recording_name: name.clone(),
            recording_url: stored_file_url,
            transcript,
        });

        self.events.send(DashboardEvent::recording_added(
            recording.id,
            analysis_id,
            name,
            recording.lead_id,
        ));

        info!(
            recording_id = %recording.id,
            analysis_id = ?analysis_id,
            "Recording added"
        );

        Ok(IngestionOutcome {
            recording,
            analysis_id,
            message,
        })
    }
}
