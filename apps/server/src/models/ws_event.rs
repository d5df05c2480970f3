//! WebSocket event types for dashboard invalidation.
//!
//! Events carry just enough for a client to decide what to refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event sent to connected dashboard clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum DashboardEvent {
    /// A recording and (usually) its analysis placeholder were created.
    RecordingAdded(RecordingAddedPayload),
    /// A recording was deleted; its analysis went with it.
    RecordingDeleted(RecordingDeletedPayload),
    /// An analysis status was written by this server.
    AnalysisUpdated(AnalysisUpdatedPayload),
    /// Leads or lead groups changed.
    LeadsChanged(LeadsChangedPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingAddedPayload {
    pub recording_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<Uuid>,
    pub recording_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingDeletedPayload {
    pub recording_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisUpdatedPayload {
    pub recording_id: Uuid,
    pub analysis_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadsChangedPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

/// Wrapper that includes timestamp with every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEventMessage {
    #[serde(flatten)]
    pub event: DashboardEvent,
    pub timestamp: DateTime<Utc>,
}

impl DashboardEventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: DashboardEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

impl DashboardEvent {
    pub fn recording_added(
        recording_id: Uuid,
        analysis_id: Option<Uuid>,
        recording_name: impl Into<String>,
        lead_id: Option<Uuid>,
    ) -> Self {
        DashboardEvent::RecordingAdded(RecordingAddedPayload {
            recording_id,
            analysis_id,
            recording_name: recording_name.into(),
            lead_id,
        })
    }

    pub fn recording_deleted(recording_id: Uuid) -> Self {
        DashboardEvent::RecordingDeleted(RecordingDeletedPayload { recording_id })
    }

    pub fn analysis_updated(recording_id: Uuid, analysis_id: Uuid, status: impl Into<String>) -> Self {
        DashboardEvent::AnalysisUpdated(AnalysisUpdatedPayload {
            recording_id,
            analysis_id,
            status: status.into(),
        })
    }

    pub fn lead_changed(lead_id: Uuid) -> Self {
        DashboardEvent::LeadsChanged(LeadsChangedPayload {
            lead_id: Some(lead_id),
            group_id: None,
        })
    }

    pub fn group_changed(group_id: Uuid) -> Self {
        DashboardEvent::LeadsChanged(LeadsChangedPayload {
            lead_id: None,
            group_id: Some(group_id),
        })
    }
}
