//! In-memory fakes for the workflow seams.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use call_intel_lib::auth::CurrentUser;
use call_intel_lib::error::{AppError, AppResult};
use call_intel_lib::models::recording::RECORDING_STATUS_UPLOADED;
use call_intel_lib::models::{
    Analysis, AnalysisStatus, BrainDocument, NewAnalysis, NewBrainDocument, NewRecording, Recording,
};
use call_intel_lib::services::notifier::NotifyError;
use call_intel_lib::services::{
    AnalysisDispatch, DocumentLibrary, DocumentStore, EventBroadcaster, IngestionWorkflow,
    ObjectStore, RecordStore, StatusReconciler, StorageBucket, StoredObject, TransportReceipt,
    WebhookPayload,
};
use chrono::Utc;
use tokio::sync::Barrier;
use uuid::Uuid;

pub const MAX_RECORDING_SIZE: u64 = 100 * 1024 * 1024;

pub fn test_user() -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        email: "rep@example.com".to_string(),
    }
}

/// Record store backed by vectors.
#[derive(Default)]
pub struct MemoryStore {
    pub recordings: Mutex<Vec<Recording>>,
    pub analyses: Mutex<Vec<Analysis>>,
    pub fail_recording_insert: AtomicBool,
    pub fail_analysis_insert: AtomicBool,
    pub fail_name_lookup: AtomicBool,
    /// When set, name lookups wait here after reading so callers interleave.
    pub lookup_gate: Option<Arc<Barrier>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup_gate(parties: usize) -> Self {
        Self {
            lookup_gate: Some(Arc::new(Barrier::new(parties))),
            ..Self::default()
        }
    }

    pub fn recording_count(&self) -> usize {
        self.recordings.lock().unwrap().len()
    }

    pub fn analysis_count(&self) -> usize {
        self.analyses.lock().unwrap().len()
    }

    pub fn analysis_status(&self, analysis_id: Uuid) -> Option<String> {
        self.analyses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == analysis_id)
            .map(|a| a.status.clone())
    }

    /// Overwrite a status the way the external pipeline would.
    pub fn force_status(&self, analysis_id: Uuid, status: &str) {
        if let Some(a) = self
            .analyses
            .lock()
            .unwrap()
            .iter_mut()
            .find(|a| a.id == analysis_id)
        {
            a.status = status.to_string();
        }
    }

    /// Drop an analysis row, leaving its recording.
    pub fn remove_analysis(&self, analysis_id: Uuid) {
        self.analyses.lock().unwrap().retain(|a| a.id != analysis_id);
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn recording_ids_named(&self, name: &str, limit: u64) -> AppResult<Vec<Uuid>> {
        if self.fail_name_lookup.load(Ordering::SeqCst) {
            return Err(AppError::Database("connection reset".to_string()));
        }

        let ids: Vec<Uuid> = self
            .recordings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.file_name == name)
            .take(limit as usize)
            .map(|r| r.id)
            .collect();

        if let Some(gate) = &self.lookup_gate {
            gate.wait().await;
        }

        Ok(ids)
    }

    async fn insert_recording(&self, new: NewRecording) -> AppResult<Recording> {
        if self.fail_recording_insert.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "null value in column \"user_id\" violates not-null constraint".to_string(),
            ));
        }

        let recording = Recording {
            id: Uuid::now_v7(),
            user_id: new.user_id,
            lead_id: new.lead_id,
            file_name: new.file_name,
            file_size: new.file_size,
            stored_file_url: new.stored_file_url,
            storage_path: new.storage_path,
            transcript: new.transcript,
            status: RECORDING_STATUS_UPLOADED.to_string(),
            duration_seconds: None,
            call_date: None,
            created_at: Utc::now(),
        };
        self.recordings.lock().unwrap().push(recording.clone());
        Ok(recording)
    }

    async fn insert_analysis(&self, new: NewAnalysis) -> AppResult<Analysis> {
        if self.fail_analysis_insert.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "permission denied for table analyses".to_string(),
            ));
        }

        let analysis = Analysis::placeholder(Uuid::now_v7(), new.recording_id, new.user_id, Utc::now());
        self.analyses.lock().unwrap().push(analysis.clone());
        Ok(analysis)
    }

    async fn get_recording(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Recording>> {
        Ok(self
            .recordings
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn analysis_for_recording(&self, recording_id: Uuid) -> AppResult<Option<Analysis>> {
        Ok(self
            .analyses
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.recording_id == recording_id)
            .cloned())
    }

    async fn list_recordings_with_analyses(
        &self,
        user_id: Uuid,
        lead_id: Option<Uuid>,
    ) -> AppResult<Vec<(Recording, Option<Analysis>)>> {
        let analyses = self.analyses.lock().unwrap().clone();
        let mut rows: Vec<(Recording, Option<Analysis>)> = self
            .recordings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| lead_id.is_none() || r.lead_id == lead_id)
            .map(|r| {
                let analysis = analyses.iter().find(|a| a.recording_id == r.id).cloned();
                (r.clone(), analysis)
            })
            .collect();
        rows.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        Ok(rows)
    }

    async fn set_analysis_status(
        &self,
        analysis_id: Uuid,
        status: AnalysisStatus,
    ) -> AppResult<Analysis> {
        let mut analyses = self.analyses.lock().unwrap();
        let analysis = analyses
            .iter_mut()
            .find(|a| a.id == analysis_id)
            .ok_or_else(|| AppError::NotFound(format!("Analysis {}", analysis_id)))?;
        analysis.status = status.as_str().to_string();
        analysis.updated_at = Utc::now();
        Ok(analysis.clone())
    }
}

/// One object written to [`MemoryObjects`].
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub bucket: StorageBucket,
    pub key: String,
    pub size: usize,
    pub content_type: Option<String>,
}

/// Object store that keeps uploads in memory and refuses overwrites.
#[derive(Default)]
pub struct MemoryObjects {
    pub uploads: Mutex<Vec<StoredUpload>>,
    pub fail_uploads: AtomicBool,
    pub fail_removals: AtomicBool,
}

impl MemoryObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn contains(&self, bucket: StorageBucket, key: &str) -> bool {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.bucket == bucket && u.key == key)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn upload(
        &self,
        bucket: StorageBucket,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> AppResult<StoredObject> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("new row violates row-level security policy".to_string()));
        }

        let mut uploads = self.uploads.lock().unwrap();
        if uploads.iter().any(|u| u.bucket == bucket && u.key == key) {
            return Err(AppError::Storage("The resource already exists".to_string()));
        }
        uploads.push(StoredUpload {
            bucket,
            key: key.to_string(),
            size: data.len(),
            content_type: content_type.map(String::from),
        });

        Ok(StoredObject {
            public_url: self.public_url(bucket, key),
            size: data.len() as u64,
        })
    }

    fn public_url(&self, bucket: StorageBucket, key: &str) -> String {
        let bucket = match bucket {
            StorageBucket::Recordings => "recordings",
            StorageBucket::Documents => "brain-documents",
        };
        format!("http://objects.test/{}/{}", bucket, key)
    }

    async fn remove(&self, bucket: StorageBucket, key: &str) -> AppResult<()> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(AppError::Storage("Access Denied".to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .retain(|u| !(u.bucket == bucket && u.key == key));
        Ok(())
    }

    async fn check_bucket(&self, _bucket: StorageBucket) -> AppResult<()> {
        Ok(())
    }
}

/// Document rows in memory.
///
/// When `objects` is set, each row deletion notes whether the stored file
/// was still present at that moment.
#[derive(Default)]
pub struct MemoryDocuments {
    pub documents: Mutex<Vec<BrainDocument>>,
    pub brain_id: Option<Uuid>,
    pub fail_insert: AtomicBool,
    pub object_present_at_delete: Mutex<Vec<bool>>,
    pub objects: Option<Arc<MemoryObjects>>,
}

impl MemoryDocuments {
    pub fn watching(objects: Arc<MemoryObjects>) -> Self {
        Self {
            objects: Some(objects),
            ..Self::default()
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocuments {
    async fn company_brain_id(&self, _user_id: Uuid) -> AppResult<Option<Uuid>> {
        Ok(self.brain_id)
    }

    async fn list_documents(&self, user_id: Uuid) -> AppResult<Vec<BrainDocument>> {
        let mut documents: Vec<BrainDocument> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    async fn get_document(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<BrainDocument>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id && d.user_id == user_id)
            .cloned())
    }

    async fn insert_document(&self, new: NewBrainDocument) -> AppResult<BrainDocument> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::Database("relation \"brain_documents\" does not exist".to_string()));
        }

        let now = Utc::now();
        let document = BrainDocument {
            id: Uuid::now_v7(),
            user_id: new.user_id,
            company_brain_id: new.company_brain_id,
            file_name: new.file_name,
            file_type: new.file_type.as_str().to_string(),
            file_size: Some(new.file_size),
            storage_path: new.storage_path,
            storage_url: Some(new.storage_url),
            mime_type: Some(new.mime_type),
            title: None,
            description: None,
            tags: None,
            category: None,
            status: "uploaded".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.documents.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn delete_document(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut documents = self.documents.lock().unwrap();
        let Some(index) = documents
            .iter()
            .position(|d| d.id == id && d.user_id == user_id)
        else {
            return Ok(false);
        };

        if let Some(objects) = &self.objects {
            let present = objects.contains(StorageBucket::Documents, &documents[index].storage_path);
            self.object_present_at_delete.lock().unwrap().push(present);
        }
        documents.remove(index);
        Ok(true)
    }
}

/// Dispatch that records payloads instead of calling the pipeline.
///
/// `resend` answers with `resend_status` (or a transport error when `None`)
/// and notes the analysis status the store held at that moment.
pub struct RecordingDispatch {
    pub submitted: Mutex<Vec<WebhookPayload>>,
    pub resent: Mutex<Vec<WebhookPayload>>,
    pub status_during_resend: Mutex<Vec<Option<String>>>,
    resend_status: Option<u16>,
    store: Option<Arc<MemoryStore>>,
}

impl RecordingDispatch {
    pub fn new() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            resent: Mutex::new(Vec::new()),
            status_during_resend: Mutex::new(Vec::new()),
            resend_status: Some(200),
            store: None,
        }
    }

    pub fn answering(resend_status: Option<u16>, store: Arc<MemoryStore>) -> Self {
        Self {
            resend_status,
            store: Some(store),
            ..Self::new()
        }
    }

    pub fn submitted(&self) -> Vec<WebhookPayload> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisDispatch for RecordingDispatch {
    fn submit(&self, payload: WebhookPayload) {
        self.submitted.lock().unwrap().push(payload);
    }

    async fn resend(&self, payload: &WebhookPayload) -> Result<TransportReceipt, NotifyError> {
        if let (Some(store), Some(analysis_id)) = (&self.store, payload.analysis_id) {
            self.status_during_resend
                .lock()
                .unwrap()
                .push(store.analysis_status(analysis_id));
        }
        self.resent.lock().unwrap().push(payload.clone());

        match self.resend_status {
            Some(status) => Ok(TransportReceipt::Delivered { status }),
            None => Err(NotifyError::Transport("connection refused".to_string())),
        }
    }
}

/// Ingestion workflow wired to the given fakes.
pub fn ingestion(
    store: Arc<MemoryStore>,
    objects: Arc<MemoryObjects>,
    dispatch: Arc<dyn AnalysisDispatch>,
    events: EventBroadcaster,
) -> IngestionWorkflow {
    IngestionWorkflow::new(store, objects, dispatch, events, MAX_RECORDING_SIZE)
}

/// Document library wired to the given fakes.
pub fn document_library(
    store: Arc<MemoryDocuments>,
    objects: Arc<MemoryObjects>,
    max_document_size: u64,
) -> DocumentLibrary {
    DocumentLibrary::new(store, objects, max_document_size)
}

pub fn reconciler(
    store: Arc<MemoryStore>,
    dispatch: Arc<dyn AnalysisDispatch>,
    events: EventBroadcaster,
) -> StatusReconciler {
    StatusReconciler::new(store, dispatch, events)
}

/// `len` bytes of fake MP3 data.
pub fn mp3_bytes(len: usize) -> Vec<u8> {
    vec![0xFF; len]
}
