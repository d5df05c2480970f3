//! Analysis domain models and the status taxonomy shared with the external pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::analysis;

/// Status values this server writes to an analysis row.
///
/// The external pipeline writes its own values; read them through [`StatusPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Placeholder created at ingestion.
    Pending,
    /// A retry was submitted.
    Processing,
    /// A retry could not be submitted.
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse phase derived from a raw analysis status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusPhase {
    Queued,
    Transcribing,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Unknown,
}

impl StatusPhase {
    /// Map any status the store may hold. Matching ignores case and surrounding whitespace.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "uploaded" | "pending" | "queued" => Self::Queued,
            "transcribing" | "transcribed" => Self::Transcribing,
            "processing" | "in_progress" | "analyzing" => Self::Processing,
            "completed" | "analyzed" => Self::Completed,
            "failed" | "error" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Transcribing => "Transcribing",
            Self::Processing => "Analyzing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Only failed analyses expose a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// No further transition is expected from the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Analysis record as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Analysis {
    pub id: Uuid,
    pub recording_id: Uuid,
    pub user_id: Uuid,
    /// Raw status as stored
    pub status: String,
    pub sentiment_score: Option<f64>,
    pub engagement_score: Option<f64>,
    pub confidence_score_executive: Option<f64>,
    pub confidence_score_person: Option<f64>,
    #[schema(value_type = Object)]
    pub participants: Option<JsonValue>,
    pub lead_type: Option<String>,
    pub objections_handled: Option<String>,
    pub objections_detected_count: Option<i32>,
    pub objections_handled_count: Option<i32>,
    pub next_steps: Option<String>,
    pub improvements: Option<String>,
    pub call_outcome: Option<String>,
    pub short_summary: Option<String>,
    pub detailed_call_analysis: Option<String>,
    pub lead_type_explanation: Option<String>,
    pub sentiment_explanation: Option<String>,
    pub engagement_explanation: Option<String>,
    pub confidence_explanation_executive: Option<String>,
    pub confidence_explanation_person: Option<String>,
    pub objections_detected: Option<String>,
    pub objections_handling_details: Option<String>,
    pub next_steps_detailed: Option<String>,
    pub improvements_for_team: Option<String>,
    pub call_outcome_rationale: Option<String>,
    pub evidence_quotes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Analysis {
    /// Empty placeholder with every result field unset.
    pub fn placeholder(id: Uuid, recording_id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            recording_id,
            user_id,
            status: AnalysisStatus::Pending.as_str().to_string(),
            sentiment_score: None,
            engagement_score: None,
            confidence_score_executive: None,
            confidence_score_person: None,
            participants: None,
            lead_type: None,
            objections_handled: None,
            objections_detected_count: None,
            objections_handled_count: None,
            next_steps: None,
            improvements: None,
            call_outcome: None,
            short_summary: None,
            detailed_call_analysis: None,
            lead_type_explanation: None,
            sentiment_explanation: None,
            engagement_explanation: None,
            confidence_explanation_executive: None,
            confidence_explanation_person: None,
            objections_detected: None,
            objections_handling_details: None,
            next_steps_detailed: None,
            improvements_for_team: None,
            call_outcome_rationale: None,
            evidence_quotes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn phase(&self) -> StatusPhase {
        StatusPhase::from_raw(&self.status)
    }
}

impl From<analysis::Model> for Analysis {
    fn from(m: analysis::Model) -> Self {
        Self {
            id: m.id,
            recording_id: m.recording_id,
            user_id: m.user_id,
            status: m.status,
            sentiment_score: m.sentiment_score,
            engagement_score: m.engagement_score,
            confidence_score_executive: m.confidence_score_executive,
            confidence_score_person: m.confidence_score_person,
            participants: m.participants,
            lead_type: m.lead_type,
            objections_handled: m.objections_handled,
            objections_detected_count: m.objections_detected_count,
            objections_handled_count: m.objections_handled_count,
            next_steps: m.next_steps,
            improvements: m.improvements,
            call_outcome: m.call_outcome,
            short_summary: m.short_summary,
            detailed_call_analysis: m.detailed_call_analysis,
            lead_type_explanation: m.lead_type_explanation,
            sentiment_explanation: m.sentiment_explanation,
            engagement_explanation: m.engagement_explanation,
            confidence_explanation_executive: m.confidence_explanation_executive,
            confidence_explanation_person: m.confidence_explanation_person,
            objections_detected: m.objections_detected,
            objections_handling_details: m.objections_handling_details,
            next_steps_detailed: m.next_steps_detailed,
            improvements_for_team: m.improvements_for_team,
            call_outcome_rationale: m.call_outcome_rationale,
            evidence_quotes: m.evidence_quotes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields needed to create the placeholder analysis for a recording.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub recording_id: Uuid,
    pub user_id: Uuid,
}
