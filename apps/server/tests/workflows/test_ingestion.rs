//! Recording ingestion workflow scenarios.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use call_intel_lib::config::WebhookSettings;
use call_intel_lib::error::AppError;
use call_intel_lib::models::DashboardEvent;
use call_intel_lib::services::ingestion::{AUDIO_QUEUED_MESSAGE, TRANSCRIPT_QUEUED_MESSAGE};
use call_intel_lib::services::uniqueness::{DUPLICATE_NAME_MESSAGE, UNVERIFIABLE_NAME_MESSAGE};
use call_intel_lib::services::{
    AddRecordingRequest, AnalysisDispatch, AudioUpload, EventBroadcaster, Notifier, RecordingInput,
    StorageBucket,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_helpers::*;

fn audio_request(name: &str, file_name: &str, len: usize) -> AddRecordingRequest {
    AddRecordingRequest {
        name: name.to_string(),
        input: RecordingInput::Audio(AudioUpload {
            file_name: file_name.to_string(),
            content_type: Some("audio/mpeg".to_string()),
            data: mp3_bytes(len),
        }),
        lead_id: None,
    }
}

fn transcript_request(name: &str, text: &str) -> AddRecordingRequest {
    AddRecordingRequest {
        name: name.to_string(),
        input: RecordingInput::Transcript(text.to_string()),
        lead_id: None,
    }
}

/// Audio submission stores the file and leaves the transcript empty.
#[actix_rt::test]
async fn test_audio_submission_creates_recording_with_file() {
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjects::new());
    let dispatch = Arc::new(RecordingDispatch::new());
    let workflow = ingestion(store.clone(), objects.clone(), dispatch.clone(), EventBroadcaster::new());
    let user = test_user();

    let outcome = workflow
        .add_recording(&user, audio_request("Discovery call", "discovery.mp3", 1024))
        .await
        .expect("audio submission should succeed");

    assert_eq!(outcome.message, AUDIO_QUEUED_MESSAGE);
    assert!(outcome.recording.stored_file_url.is_some());
    assert!(outcome.recording.transcript.is_none());
    assert_eq!(outcome.recording.file_size, Some(1024));

    let uploads = objects.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].bucket, StorageBucket::Recordings);
    assert!(uploads[0].key.starts_with(&format!("{}/", user.id)));
    assert!(uploads[0].key.ends_with("_Discovery call.mp3"));
    assert_eq!(
        outcome.recording.storage_path.as_deref(),
        Some(uploads[0].key.as_str())
    );
}

/// Transcript submission skips storage entirely.
#[actix_rt::test]
async fn test_transcript_submission_creates_recording_without_file() {
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjects::new());
    let dispatch = Arc::new(RecordingDispatch::new());
    let workflow = ingestion(store.clone(), objects.clone(), dispatch.clone(), EventBroadcaster::new());

    let outcome = workflow
        .add_recording(
            &test_user(),
            transcript_request("  Pricing follow-up  ", "  Rep: Hi there. Prospect: Hello.  "),
        )
        .await
        .expect("transcript submission should succeed");

    assert_eq!(outcome.message, TRANSCRIPT_QUEUED_MESSAGE);
    assert_eq!(outcome.recording.file_name, "Pricing follow-up");
    assert_eq!(
        outcome.recording.transcript.as_deref(),
        Some("Rep: Hi there. Prospect: Hello.")
    );
    assert!(outcome.recording.stored_file_url.is_none());
    assert!(outcome.recording.file_size.is_none());
    assert_eq!(objects.upload_count(), 0);

    let submitted = dispatch.submitted();
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].recording_url.is_none());
    assert_eq!(
        submitted[0].transcript.as_deref(),
        Some("Rep: Hi there. Prospect: Hello.")
    );
}

/// Two submissions that both pass the name check before either inserts
/// both succeed. The check is advisory, not a constraint.
#[actix_rt::test]
async fn test_concurrent_duplicate_names_can_both_succeed() {
    let store = Arc::new(MemoryStore::with_lookup_gate(2));
    let objects = Arc::new(MemoryObjects::new());
    let dispatch = Arc::new(RecordingDispatch::new());
    let workflow = ingestion(store.clone(), objects, dispatch, EventBroadcaster::new());
    let user = test_user();

    let (first, second) = tokio::join!(
        workflow.add_recording(&user, transcript_request("Weekly sync", "first")),
        workflow.add_recording(&user, transcript_request("Weekly sync", "second")),
    );

    assert!(first.is_ok(), "{:?}", first.err());
    assert!(second.is_ok(), "{:?}", second.err());
    assert_eq!(store.recording_count(), 2);
}

/// Sequential duplicates are rejected before anything is written.
#[actix_rt::test]
async fn test_duplicate_name_rejected_without_side_effects() {
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjects::new());
    let dispatch = Arc::new(RecordingDispatch::new());
    let workflow = ingestion(store.clone(), objects.clone(), dispatch.clone(), EventBroadcaster::new());
    let user = test_user();

    workflow
        .add_recording(&user, transcript_request("Renewal call", "hello"))
        .await
        .expect("first submission should succeed");

    let err = workflow
        .add_recording(&user, audio_request(" Renewal call ", "renewal.mp3", 512))
        .await
        .expect_err("duplicate should be rejected");

    match err {
        AppError::Conflict(message) => assert_eq!(message, DUPLICATE_NAME_MESSAGE),
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert_eq!(store.recording_count(), 1);
    assert_eq!(objects.upload_count(), 0);
    assert_eq!(dispatch.submitted().len(), 1);
}

/// A failed name lookup blocks the submission.
#[actix_rt::test]
async fn test_name_lookup_failure_blocks_submission() {
    let store = Arc::new(MemoryStore::new());
    store.fail_name_lookup.store(true, Ordering::SeqCst);
    let objects = Arc::new(MemoryObjects::new());
    let workflow = ingestion(
        store.clone(),
        objects.clone(),
        Arc::new(RecordingDispatch::new()),
        EventBroadcaster::new(),
    );

    let err = workflow
        .add_recording(&test_user(), audio_request("Intro call", "intro.mp3", 64))
        .await
        .expect_err("unverifiable name should block");

    match err {
        AppError::ServiceUnavailable(message) => assert_eq!(message, UNVERIFIABLE_NAME_MESSAGE),
        other => panic!("expected ServiceUnavailable, got {:?}", other),
    }
    assert_eq!(store.recording_count(), 0);
    assert_eq!(objects.upload_count(), 0);
}

/// The recording survives a failed analysis insert and the call still succeeds.
#[actix_rt::test]
async fn test_analysis_insert_failure_still_reports_success() {
    let store = Arc::new(MemoryStore::new());
    store.fail_analysis_insert.store(true, Ordering::SeqCst);
    let dispatch = Arc::new(RecordingDispatch::new());
    let workflow = ingestion(
        store.clone(),
        Arc::new(MemoryObjects::new()),
        dispatch.clone(),
        EventBroadcaster::new(),
    );

    let outcome = workflow
        .add_recording(&test_user(), transcript_request("Churn risk", "we might leave"))
        .await
        .expect("analysis failure must not fail the submission");

    assert!(outcome.analysis_id.is_none());
    assert_eq!(store.recording_count(), 1);
    assert_eq!(store.analysis_count(), 0);

    let submitted = dispatch.submitted();
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].analysis_id.is_none());
}

/// A failed recording insert stops the workflow and leaves the upload orphaned.
#[actix_rt::test]
async fn test_recording_insert_failure_aborts_after_upload() {
    let store = Arc::new(MemoryStore::new());
    store.fail_recording_insert.store(true, Ordering::SeqCst);
    let objects = Arc::new(MemoryObjects::new());
    let dispatch = Arc::new(RecordingDispatch::new());
    let events = EventBroadcaster::new();
    let mut rx = events.subscribe();
    let workflow = ingestion(store.clone(), objects.clone(), dispatch.clone(), events);

    let err = workflow
        .add_recording(&test_user(), audio_request("Renewal call", "renewal.mp3", 1024))
        .await
        .expect_err("insert failure must abort");

    assert!(matches!(err, AppError::Database(_)));
    assert!(err.to_string().starts_with("Database error: "));
    assert_eq!(objects.upload_count(), 1);
    assert_eq!(store.recording_count(), 0);
    assert_eq!(store.analysis_count(), 0);
    assert!(dispatch.submitted().is_empty());
    assert!(rx.try_recv().is_err());
}

/// Storage failure aborts before any row exists.
#[actix_rt::test]
async fn test_upload_failure_creates_no_rows() {
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjects::new());
    objects.fail_uploads.store(true, Ordering::SeqCst);
    let dispatch = Arc::new(RecordingDispatch::new());
    let workflow = ingestion(store.clone(), objects, dispatch.clone(), EventBroadcaster::new());

    let err = workflow
        .add_recording(&test_user(), audio_request("Demo", "demo.wav", 256))
        .await
        .expect_err("upload failure should abort");

    assert!(matches!(err, AppError::Storage(_)));
    assert!(err.to_string().contains("row-level security"));
    assert_eq!(store.recording_count(), 0);
    assert_eq!(store.analysis_count(), 0);
    assert!(dispatch.submitted().is_empty());
}

/// Validation runs before the name check and uses mode-specific wording.
#[actix_rt::test]
async fn test_invalid_inputs_rejected_up_front() {
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(MemoryObjects::new());
    let workflow = ingestion(
        store.clone(),
        objects.clone(),
        Arc::new(RecordingDispatch::new()),
        EventBroadcaster::new(),
    );
    let user = test_user();

    let too_big = workflow
        .add_recording(&user, audio_request("Big", "big.mp3", 101 * 1024 * 1024))
        .await
        .expect_err("oversized file");
    assert!(matches!(too_big, AppError::PayloadTooLarge(_)));

    let wrong_type = workflow
        .add_recording(
            &user,
            AddRecordingRequest {
                name: "Notes".to_string(),
                input: RecordingInput::Audio(AudioUpload {
                    file_name: "clip.txt".to_string(),
                    content_type: Some("text/plain".to_string()),
                    data: vec![b'a'; 10],
                }),
                lead_id: None,
            },
        )
        .await
        .expect_err("text file");
    assert!(matches!(wrong_type, AppError::InvalidInput(_)));

    let blank = workflow
        .add_recording(&user, transcript_request("Call", "   "))
        .await
        .expect_err("blank transcript");
    assert_eq!(
        blank.to_string(),
        "Invalid input: Please provide both a transcript and a recording name"
    );

    let unnamed = workflow
        .add_recording(&user, audio_request("  ", "call.mp3", 10))
        .await
        .expect_err("missing name");
    assert_eq!(
        unnamed.to_string(),
        "Invalid input: Please select a file and provide a name"
    );

    assert_eq!(store.recording_count(), 0);
    assert_eq!(objects.upload_count(), 0);
}

/// Subscribers hear about every new recording.
#[actix_rt::test]
async fn test_submission_broadcasts_recording_added() {
    let events = EventBroadcaster::new();
    let mut rx = events.subscribe();
    let workflow = ingestion(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryObjects::new()),
        Arc::new(RecordingDispatch::new()),
        events,
    );

    let outcome = workflow
        .add_recording(&test_user(), transcript_request("Kickoff", "hello"))
        .await
        .expect("submission should succeed");

    let message = rx.recv().await.expect("event");
    assert_eq!(
        message.event,
        DashboardEvent::recording_added(outcome.recording.id, outcome.analysis_id, "Kickoff", None)
    );
}

/// Full path with the real notifier: 2 MiB mp3, pending analysis, one webhook call.
#[actix_rt::test]
async fn test_end_to_end_sales_call_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/call-analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::from_settings(&WebhookSettings {
        url: format!("{}/webhook/call-analysis", server.uri()),
        timeout_secs: 5,
    })
    .expect("client");
    let dispatch: Arc<dyn AnalysisDispatch> = Arc::new(notifier);

    let store = Arc::new(MemoryStore::new());
    let workflow = ingestion(
        store.clone(),
        Arc::new(MemoryObjects::new()),
        dispatch,
        EventBroadcaster::new(),
    );

    let outcome = workflow
        .add_recording(
            &test_user(),
            audio_request("Sales Call - John Doe", "john-doe.mp3", 2 * 1024 * 1024),
        )
        .await
        .expect("submission should succeed");

    assert_eq!(store.recording_count(), 1);
    assert_eq!(outcome.recording.file_size, Some(2_097_152));
    assert_eq!(outcome.recording.status, "uploaded");

    let analyses = store.analyses.lock().unwrap().clone();
    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].status, "pending");
    assert!(analyses[0].sentiment_score.is_none());
    assert!(analyses[0].engagement_score.is_none());
    assert_eq!(outcome.analysis_id, Some(analyses[0].id));

    // Delivery runs in the background
    let mut received = Vec::new();
    for _ in 0..100 {
        received = server.received_requests().await.unwrap_or_default();
        if !received.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(received.len(), 1, "webhook should be called once");

    let body: serde_json::Value = serde_json::from_slice(&received[0].body).expect("json body");
    assert_eq!(body["recording_id"], outcome.recording.id.to_string());
    assert_eq!(body["analysis_id"], analyses[0].id.to_string());
    assert_eq!(body["recording_name"], "Sales Call - John Doe");
    assert!(body["recording_url"].is_string());
    assert!(body["transcript"].is_null());
}
