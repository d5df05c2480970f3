//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Call Intelligence Server",
        version = "0.1.0",
        description = "API server for call recording ingestion, analysis status tracking, leads and the company knowledge base"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Recording endpoints
        api::recordings::add_recording,
        api::recordings::list_recordings,
        api::recordings::get_recording,
        api::recordings::retry_recording,
        api::recordings::delete_recording,
        // Analysis endpoints
        api::analyses::get_analysis,
        // Lead endpoints
        api::leads::list_leads,
        api::leads::lead_stats,
        api::leads::create_lead,
        api::leads::get_lead,
        api::leads::update_lead,
        api::leads::delete_lead,
        api::leads::lead_recordings,
        // Lead group endpoints
        api::lead_groups::list_lead_groups,
        api::lead_groups::create_lead_group,
        api::lead_groups::rename_lead_group,
        api::lead_groups::delete_lead_group,
        // Brain endpoints
        api::brain::get_brain,
        api::brain::save_brain,
        api::brain::list_documents,
        api::brain::upload_document,
        api::brain::delete_document,
        // Dashboard
        api::dashboard::dashboard_stats,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::DeletedResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            api::health::DependencyCheck,
            // Recordings
            api::recordings::AddRecordingForm,
            models::Recording,
            models::AddRecordingResponse,
            models::ListRecordingsQuery,
            models::RecordingStatusView,
            models::RetryResponse,
            // Analyses
            models::Analysis,
            models::AnalysisStatus,
            models::StatusPhase,
            // Leads
            models::LeadType,
            models::Lead,
            models::LeadRequest,
            models::ListLeadsQuery,
            models::LeadWithStats,
            models::LeadTypeCounts,
            models::LeadStatsResponse,
            models::LeadRecording,
            models::LeadDetailResponse,
            models::LeadGroup,
            models::LeadGroupWithCount,
            models::LeadGroupRequest,
            // Brain
            api::brain::DocumentUploadForm,
            models::CompanyBrainFields,
            models::CompanyBrain,
            models::DocumentFileType,
            models::BrainDocument,
            // Dashboard
            models::DashboardStats,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Recordings", description = "Recording submission, status and retry"),
        (name = "Analyses", description = "Call analysis results"),
        (name = "Leads", description = "Lead management and call activity"),
        (name = "Lead Groups", description = "Grouping of leads"),
        (name = "Brain", description = "Company profile and knowledge base documents"),
        (name = "Dashboard", description = "Aggregate statistics")
    )
)]
pub struct ApiDoc;
