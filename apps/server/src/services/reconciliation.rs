//! Analysis status view and manual retry.
//!
//! Analysis status is shared, last-writer-wins state: the external pipeline
//! and the retry path both write it without coordination.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::notifier::{AnalysisDispatch, WebhookPayload};
use super::{EventBroadcaster, RecordStore};
use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisStatus, DashboardEvent, RecordingStatusView};

pub const RETRY_QUEUED_MESSAGE: &str = "Your recording has been queued for reprocessing.";
pub const RETRY_FAILED_MESSAGE: &str = "Failed to send recording for reprocessing. Please try again.";

/// Result of a successful retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub recording_id: Uuid,
    pub analysis_id: Uuid,
    pub message: &'static str,
}

/// Reads recording/analysis pairs and drives retries.
#[derive(Clone)]
pub struct StatusReconciler {
    store: Arc<dyn RecordStore>,
    dispatch: Arc<dyn AnalysisDispatch>,
    events: EventBroadcaster,
}

impl StatusReconciler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        dispatch: Arc<dyn AnalysisDispatch>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            store,
            dispatch,
            events,
        }
    }

    /// Current status of every recording the user owns, newest first.
    pub async fn snapshot(
        &self,
        user: &CurrentUser,
        lead_id: Option<Uuid>,
    ) -> AppResult<Vec<RecordingStatusView>> {
        let rows = self
            .store
            .list_recordings_with_analyses(user.id, lead_id)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(recording, analysis)| RecordingStatusView::derive(recording, analysis))
            .collect())
    }

    /// Status of one recording.
    pub async fn status_of(
        &self,
        user: &CurrentUser,
        recording_id: Uuid,
    ) -> AppResult<RecordingStatusView> {
        let recording = self
            .store
            .get_recording(user.id, recording_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recording".to_string()))?;
        let analysis = self.store.analysis_for_recording(recording.id).await?;

        Ok(RecordingStatusView::derive(recording, analysis))
    }

    /// Resubmit a failed recording.
    ///
    /// The analysis is marked `processing` before the webhook call and put
    /// back to `failed` if the pipeline does not accept the request. Only
    /// recordings whose status view offers a retry are accepted.
    pub async fn retry(&self, user: &CurrentUser, recording_id: Uuid) -> AppResult<RetryOutcome> {
        let recording = self
            .store
            .get_recording(user.id, recording_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recording".to_string()))?;

        // A recording without an analysis reads as queued, so it is not retryable either
        let analysis = self.store.analysis_for_recording(recording.id).await?;
        let view = RecordingStatusView::derive(recording.clone(), analysis);
        let current = view
            .analysis
            .as_ref()
            .map(|a| a.status.clone())
            .unwrap_or_else(|| view.status_label.clone());
        let analysis = match view.analysis {
            Some(analysis) if view.can_retry => analysis,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Only failed analyses can be retried (current status: {})",
                    current
                )));
            }
        };

        self.store
            .set_analysis_status(analysis.id, AnalysisStatus::Processing)
            .await?;
        self.events.send(DashboardEvent::analysis_updated(
            recording.id,
            analysis.id,
            AnalysisStatus::Processing.as_str(),
        ));

        let payload = WebhookPayload {
            recording_id: recording.id,
            analysis_id: Some(analysis.id),
            recording_name: recording.file_name.clone(),
            recording_url: recording.stored_file_url.clone(),
            transcript: recording.transcript.clone(),
        };

        let accepted = match self.dispatch.resend(&payload).await {
            Ok(receipt) if receipt.is_accepted() => true,
            Ok(receipt) => {
                warn!(recording_id = %recording.id, ?receipt, "Retry rejected by pipeline");
                false
            }
            Err(e) => {
                warn!(recording_id = %recording.id, "Retry could not reach pipeline: {}", e);
                false
            }
        };

        if !accepted {
            if let Err(e) = self
                .store
                .set_analysis_status(analysis.id, AnalysisStatus::Failed)
                .await
            {
                warn!(analysis_id = %analysis.id, "Failed to revert analysis status: {}", e);
            }
            self.events.send(DashboardEvent::analysis_updated(
                recording.id,
                analysis.id,
                AnalysisStatus::Failed.as_str(),
            ));
            return Err(AppError::Upstream(RETRY_FAILED_MESSAGE.to_string()));
        }

        info!(recording_id = %recording.id, analysis_id = %analysis.id, "Retry submitted");

        Ok(RetryOutcome {
            recording_id: recording.id,
            analysis_id: analysis.id,
            message: RETRY_QUEUED_MESSAGE,
        })
    }
}
