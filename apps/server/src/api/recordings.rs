//! Recording API handlers: submission, status listing, retry and deletion.

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::form;
use crate::auth::Authenticated;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AddRecordingResponse, DashboardEvent, DeletedResponse, ListRecordingsQuery,
    RecordingStatusView, RetryResponse,
};
use crate::services::file_validator::{FileRejection, validate_recording_file};
use crate::services::{
    AddRecordingRequest, AudioUpload, EventBroadcaster, IngestionWorkflow, ObjectStore,
    RecordingInput, StatusReconciler, StorageBucket,
};

/// Multipart form for adding a recording (documentation only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct AddRecordingForm {
    /// `audio` or `transcript`
    mode: String,
    /// Display name, unique across recordings
    name: String,
    /// Audio or video file (audio mode)
    #[schema(value_type = Option<String>, format = Binary)]
    file: Option<Vec<u8>>,
    /// Transcript text (transcript mode)
    transcript: Option<String>,
    lead_id: Option<Uuid>,
}

/// Fields collected from the submission form.
#[derive(Default)]
struct SubmissionForm {
    mode: Option<String>,
    name: Option<String>,
    transcript: Option<String>,
    lead_id: Option<String>,
    /// Read result of the file field; only an audio submission surfaces its error
    file: Option<AppResult<AudioUpload>>,
}

/// Stream the file field, rejecting by type before reading and by size while reading.
async fn read_audio_field(
    field: &mut actix_multipart::Field,
    file_name: String,
    max_bytes: u64,
) -> AppResult<AudioUpload> {
    let content_type = field.content_type().map(|m| m.essence_str().to_string());

    if let Err(FileRejection::InvalidType) =
        validate_recording_file(&file_name, content_type.as_deref(), 0, max_bytes)
    {
        return Err(AppError::InvalidInput(FileRejection::InvalidType.message()));
    }

    let data = form::read_bytes(field, max_bytes, || {
        AppError::PayloadTooLarge(FileRejection::TooLarge { max_bytes }.message())
    })
    .await?;

    Ok(AudioUpload {
        file_name,
        content_type,
        data,
    })
}

async fn read_submission(payload: &mut Multipart, max_bytes: u64) -> AppResult<SubmissionForm> {
    let mut submission = SubmissionForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
        let field_name = content_disposition.get_name().unwrap_or("").to_string();
        let file_name = content_disposition.get_filename().map(String::from);

        match field_name.as_str() {
            "file" if submission.is_transcript() => {
                debug!("Ignoring file attached to a transcript submission");
                form::skip(&mut field).await;
            }
            "file" => {
                let file_name = file_name.unwrap_or_default();
                let upload = read_audio_field(&mut field, file_name, max_bytes).await;
                if upload.is_err() {
                    form::skip(&mut field).await;
                }
                submission.file = Some(upload);
            }
            "mode" => submission.mode = Some(form::read_text(&mut field, "mode").await?),
            "name" => submission.name = Some(form::read_text(&mut field, "name").await?),
            "transcript" => {
                submission.transcript = Some(form::read_text(&mut field, "transcript").await?)
            }
            "lead_id" => submission.lead_id = Some(form::read_text(&mut field, "lead_id").await?),
            other => {
                warn!(field = %other, "Ignoring unknown form field");
                form::skip(&mut field).await;
            }
        }
    }

    Ok(submission)
}

impl SubmissionForm {
    fn is_transcript(&self) -> bool {
        self.mode.as_deref().map(str::trim) == Some("transcript")
    }

    fn into_request(self) -> AppResult<AddRecordingRequest> {
        let mode = self.mode.as_deref().map(str::trim).unwrap_or("audio");

        let input = match mode {
            "audio" => match self.file {
                Some(upload) => RecordingInput::Audio(upload?),
                None => {
                    return Err(AppError::InvalidInput(
                        "Please select a file and provide a name".to_string(),
                    ));
                }
            },
            "transcript" => RecordingInput::Transcript(self.transcript.unwrap_or_default()),
            other => {
                return Err(AppError::InvalidInput(format!(
                    "mode must be 'audio' or 'transcript' (got '{}')",
                    other
                )));
            }
        };

        let lead_id = match self.lead_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Uuid>()?),
        };

        Ok(AddRecordingRequest {
            name: self.name.unwrap_or_default(),
            input,
            lead_id,
        })
    }
}

/// Add a recording from an audio file or a pasted transcript.
#[utoipa::path(
    post,
    path = "/api/v1/recordings",
    tag = "Recordings",
    request_body(content = AddRecordingForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Recording saved and queued for analysis", body = AddRecordingResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate recording name", body = crate::error::ErrorResponse),
        (status = 413, description = "File too large", body = crate::error::ErrorResponse),
        (status = 502, description = "Storage upload failed", body = crate::error::ErrorResponse),
        (status = 503, description = "Name uniqueness could not be verified", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_recording(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    workflow: web::Data<IngestionWorkflow>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let submission = read_submission(&mut payload, workflow.max_recording_size()).await?;
    let request = submission.into_request()?;

    if let Some(lead_id) = request.lead_id {
        if pool.get_lead(auth.user.id, lead_id).await?.is_none() {
            return Err(AppError::InvalidInput(format!("Unknown lead_id {}", lead_id)));
        }
    }

    let outcome = workflow.add_recording(&auth.user, request).await?;

    Ok(HttpResponse::Created().json(AddRecordingResponse {
        recording: outcome.recording,
        analysis_id: outcome.analysis_id,
        message: outcome.message.to_string(),
    }))
}

/// List recordings with their analysis status, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recordings",
    tag = "Recordings",
    params(
        ("lead_id" = Option<Uuid>, Query, description = "Only recordings of this lead")
    ),
    responses(
        (status = 200, description = "Recordings with derived status", body = Vec<RecordingStatusView>),
    )
)]
pub async fn list_recordings(
    auth: Authenticated,
    reconciler: web::Data<StatusReconciler>,
    query: web::Query<ListRecordingsQuery>,
) -> AppResult<HttpResponse> {
    let views = reconciler.snapshot(&auth.user, query.lead_id).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// Get one recording with its analysis status.
#[utoipa::path(
    get,
    path = "/api/v1/recordings/{recording_id}",
    tag = "Recordings",
    params(
        ("recording_id" = Uuid, Path, description = "Recording UUID")
    ),
    responses(
        (status = 200, description = "Recording with derived status", body = RecordingStatusView),
        (status = 404, description = "Recording not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_recording(
    auth: Authenticated,
    reconciler: web::Data<StatusReconciler>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = reconciler.status_of(&auth.user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Resubmit a failed recording to the analysis pipeline.
#[utoipa::path(
    post,
    path = "/api/v1/recordings/{recording_id}/retry",
    tag = "Recordings",
    params(
        ("recording_id" = Uuid, Path, description = "Recording UUID")
    ),
    responses(
        (status = 202, description = "Recording queued for reprocessing", body = RetryResponse),
        (status = 400, description = "Analysis is not in a failed state", body = crate::error::ErrorResponse),
        (status = 404, description = "Recording not found", body = crate::error::ErrorResponse),
        (status = 502, description = "Pipeline did not accept the request", body = crate::error::ErrorResponse),
    )
)]
pub async fn retry_recording(
    auth: Authenticated,
    reconciler: web::Data<StatusReconciler>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = reconciler.retry(&auth.user, path.into_inner()).await?;

    Ok(HttpResponse::Accepted().json(RetryResponse {
        recording_id: outcome.recording_id,
        analysis_id: outcome.analysis_id,
        message: outcome.message.to_string(),
    }))
}

/// Delete a recording and its analysis.
#[utoipa::path(
    delete,
    path = "/api/v1/recordings/{recording_id}",
    tag = "Recordings",
    params(
        ("recording_id" = Uuid, Path, description = "Recording UUID")
    ),
    responses(
        (status = 200, description = "Recording deleted", body = DeletedResponse),
        (status = 404, description = "Recording not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_recording(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    objects: web::Data<Arc<dyn ObjectStore>>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let recording_id = path.into_inner();

    let recording = pool
        .get_recording(auth.user.id, recording_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recording".to_string()))?;

    if let Some(key) = &recording.storage_path {
        if let Err(e) = objects.remove(StorageBucket::Recordings, key).await {
            warn!(storage_path = %key, "Failed to remove recording object: {}", e);
        }
    }

    pool.delete_recording(auth.user.id, recording_id).await?;
    broadcaster.send(DashboardEvent::recording_deleted(recording_id));

    info!(recording_id = %recording_id, "Recording deleted");

    Ok(HttpResponse::Ok().json(DeletedResponse {
        id: recording_id,
        deleted: true,
    }))
}

/// Configure recording routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/recordings")
            .route(web::get().to(list_recordings))
            .route(web::post().to(add_recording)),
    )
    .service(
        web::resource("/recordings/{recording_id}")
            .route(web::get().to(get_recording))
            .route(web::delete().to(delete_recording)),
    )
    .service(
        web::resource("/recordings/{recording_id}/retry").route(web::post().to(retry_recording)),
    );
}
