//! Business logic services.

pub mod documents;
pub mod event_broadcaster;
pub mod file_validator;
pub mod ingestion;
pub mod notifier;
pub mod reconciliation;
pub mod record_store;
pub mod storage;
pub mod uniqueness;

pub use documents::{DocumentLibrary, DocumentUpload};
pub use event_broadcaster::EventBroadcaster;
pub use ingestion::{
    AddRecordingRequest, AudioUpload, IngestionOutcome, IngestionWorkflow, RecordingInput,
};
pub use notifier::{AnalysisDispatch, Notifier, NotifyTransport, TransportReceipt, WebhookPayload};
pub use reconciliation::{RetryOutcome, StatusReconciler};
pub use record_store::{DocumentStore, RecordStore};
pub use storage::{ObjectStore, Storage, StorageBucket, StoredObject};
