//! Lead domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use super::analysis::Analysis;
use super::recording::Recording;
use crate::entity::lead;
use crate::error::{AppError, AppResult};

/// Lead classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    Hot,
    Warm,
    Cold,
    Closing,
}

impl LeadType {
    pub const ALL: [LeadType; 4] = [Self::Hot, Self::Warm, Self::Cold, Self::Closing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Closing => "closing",
        }
    }

    /// Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Some(Self::Hot),
            "warm" => Some(Self::Warm),
            "cold" => Some(Self::Cold),
            "closing" => Some(Self::Closing),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Lead {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub other: Option<JsonValue>,
    pub group_id: Option<Uuid>,
    pub lead_type: Option<String>,
    pub project: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<lead::Model> for Lead {
    fn from(m: lead::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            email: m.email,
            contact: m.contact,
            description: m.description,
            other: m.other,
            group_id: m.group_id,
            lead_type: m.lead_type,
            project: m.project,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for creating or replacing a lead.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeadRequest {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub other: Option<JsonValue>,
    pub group_id: Option<Uuid>,
    pub lead_type: Option<String>,
    pub project: Option<String>,
}

/// A lead request after validation.
#[derive(Debug, Clone)]
pub struct ValidLead {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub description: Option<String>,
    pub other: Option<JsonValue>,
    pub group_id: Option<Uuid>,
    pub lead_type: Option<LeadType>,
    pub project: Option<String>,
}

impl LeadRequest {
    /// Trim required fields and normalize the lead type.
    pub fn validate(self) -> AppResult<ValidLead> {
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        let contact = required(self.contact, "contact")?;

        let lead_type = match self.lead_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(LeadType::parse(raw).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "lead_type must be one of hot, warm, cold, closing (got '{}')",
                    raw
                ))
            })?),
        };

        Ok(ValidLead {
            name,
            email,
            contact,
            description: non_empty(self.description),
            other: self.other,
            group_id: self.group_id,
            lead_type,
            project: non_empty(self.project),
        })
    }
}

fn required(value: String, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query parameters for listing leads.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListLeadsQuery {
    pub group_id: Option<Uuid>,
    pub lead_type: Option<String>,
    /// Matched against name, email, contact and project
    pub search: Option<String>,
}

/// Lead with call activity, as shown on the leads overview.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadWithStats {
    #[serde(flatten)]
    pub lead: Lead,
    pub call_count: u64,
    /// Sentiment score of the newest call's analysis
    pub last_call_quality: Option<f64>,
    /// Lead type the newest call's analysis assigned
    pub lead_status: Option<String>,
}

/// Number of leads per classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LeadTypeCounts {
    pub hot: u64,
    pub warm: u64,
    pub cold: u64,
    pub closing: u64,
    pub unclassified: u64,
}

impl LeadTypeCounts {
    /// Tally raw lead_type values, ignoring case.
    pub fn tally<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut counts = Self::default();
        for value in values {
            match value.and_then(LeadType::parse) {
                Some(LeadType::Hot) => counts.hot += 1,
                Some(LeadType::Warm) => counts.warm += 1,
                Some(LeadType::Cold) => counts.cold += 1,
                Some(LeadType::Closing) => counts.closing += 1,
                None => counts.unclassified += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadStatsResponse {
    pub leads: Vec<LeadWithStats>,
    pub counts: LeadTypeCounts,
}

/// Recording of a lead together with its analysis.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadRecording {
    pub recording: Recording,
    pub analysis: Option<Analysis>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadDetailResponse {
    pub lead: Lead,
    pub recordings: Vec<LeadRecording>,
}
