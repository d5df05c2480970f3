//! Domain models for the call intelligence server.

pub mod analysis;
pub mod brain;
pub mod dashboard;
pub mod lead;
pub mod lead_group;
pub mod recording;
pub mod ws_event;

// Re-export commonly used types
pub use analysis::{Analysis, AnalysisStatus, NewAnalysis, StatusPhase};
pub use brain::{
    BrainDocument, CompanyBrain, CompanyBrainFields, DocumentFileType, NewBrainDocument,
};
pub use dashboard::DashboardStats;
pub use lead::{
    Lead, LeadDetailResponse, LeadRecording, LeadRequest, LeadStatsResponse, LeadType,
    LeadTypeCounts, LeadWithStats, ListLeadsQuery, ValidLead,
};
pub use lead_group::{LeadGroup, LeadGroupRequest, LeadGroupWithCount};
pub use recording::{
    AddRecordingResponse, DeletedResponse, ListRecordingsQuery, NewRecording, Recording,
    RecordingStatusView, RetryResponse,
};
pub use ws_event::{DashboardEvent, DashboardEventMessage};
