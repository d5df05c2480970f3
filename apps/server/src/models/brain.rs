//! Company brain (knowledge base) models and document DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{brain_document, company_brain};

/// Status written on every new brain document.
pub const DOCUMENT_STATUS_UPLOADED: &str = "uploaded";

/// Company profile fields. Used both as the stored view and the upsert body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CompanyBrainFields {
    pub company_name: Option<String>,
    pub company_tagline: Option<String>,
    pub company_description: Option<String>,
    pub industry: Option<String>,
    pub founded_year: Option<i32>,
    pub company_size: Option<String>,
    pub headquarters_location: Option<String>,
    pub website_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub mission_statement: Option<String>,
    pub vision_statement: Option<String>,
    pub core_values: Option<Vec<String>>,
    pub unique_selling_points: Option<Vec<String>>,
    pub target_audience: Option<String>,
    #[schema(value_type = Object)]
    pub products_services: Option<JsonValue>,
    pub pricing_model: Option<String>,
    pub key_features: Option<Vec<String>>,
    pub founder_info: Option<String>,
    #[schema(value_type = Object)]
    pub leadership_team: Option<JsonValue>,
    pub team_size_details: Option<String>,
    pub additional_context: Option<String>,
    #[schema(value_type = Object)]
    pub custom_fields: Option<JsonValue>,
}

impl CompanyBrainFields {
    /// Encode a string list column as JSON.
    pub fn list_to_json(list: &Option<Vec<String>>) -> Option<JsonValue> {
        list.as_ref()
            .map(|items| JsonValue::Array(items.iter().cloned().map(JsonValue::String).collect()))
    }

    /// Decode a string list column, skipping non-string entries.
    pub fn list_from_json(value: Option<&JsonValue>) -> Option<Vec<String>> {
        value.and_then(JsonValue::as_array).map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyBrain {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: CompanyBrainFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<company_brain::Model> for CompanyBrain {
    fn from(m: company_brain::Model) -> Self {
        let fields = CompanyBrainFields {
            core_values: CompanyBrainFields::list_from_json(m.core_values.as_ref()),
            unique_selling_points: CompanyBrainFields::list_from_json(
                m.unique_selling_points.as_ref(),
            ),
            key_features: CompanyBrainFields::list_from_json(m.key_features.as_ref()),
            company_name: m.company_name,
            company_tagline: m.company_tagline,
            company_description: m.company_description,
            industry: m.industry,
            founded_year: m.founded_year,
            company_size: m.company_size,
            headquarters_location: m.headquarters_location,
            website_url: m.website_url,
            contact_email: m.contact_email,
            contact_phone: m.contact_phone,
            mission_statement: m.mission_statement,
            vision_statement: m.vision_statement,
            target_audience: m.target_audience,
            products_services: m.products_services,
            pricing_model: m.pricing_model,
            founder_info: m.founder_info,
            leadership_team: m.leadership_team,
            team_size_details: m.team_size_details,
            additional_context: m.additional_context,
            custom_fields: m.custom_fields,
        };

        Self {
            id: m.id,
            user_id: m.user_id,
            fields,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Document category derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFileType {
    Image,
    Video,
    Audio,
    Pdf,
    Document,
    Other,
}

impl DocumentFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Pdf => "pdf",
            Self::Document => "document",
            Self::Other => "other",
        }
    }

    /// Media prefixes win over substring matches.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.contains("pdf") {
            Self::Pdf
        } else if mime.contains("document") || mime.contains("word") {
            Self::Document
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrainDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_brain_id: Option<Uuid>,
    /// Display name chosen at upload
    pub file_name: String,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub storage_path: String,
    pub storage_url: Option<String>,
    pub mime_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub tags: Option<JsonValue>,
    pub category: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<brain_document::Model> for BrainDocument {
    fn from(m: brain_document::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            company_brain_id: m.company_brain_id,
            file_name: m.file_name,
            file_type: m.file_type,
            file_size: m.file_size,
            storage_path: m.storage_path,
            storage_url: m.storage_url,
            mime_type: m.mime_type,
            title: m.title,
            description: m.description,
            tags: m.tags,
            category: m.category,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Fields for a brain document insert.
#[derive(Debug, Clone)]
pub struct NewBrainDocument {
    pub user_id: Uuid,
    pub company_brain_id: Option<Uuid>,
    pub file_name: String,
    pub file_type: DocumentFileType,
    pub file_size: i64,
    pub storage_path: String,
    pub storage_url: String,
    pub mime_type: String,
}

/// Display name for a document uploaded without one: the file name minus its extension.
pub fn default_document_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}
