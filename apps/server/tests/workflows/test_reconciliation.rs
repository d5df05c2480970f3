//! Status view and retry scenarios.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use call_intel_lib::auth::CurrentUser;
use call_intel_lib::error::AppError;
use call_intel_lib::models::{DashboardEvent, NewAnalysis, NewRecording, StatusPhase};
use call_intel_lib::services::reconciliation::{RETRY_FAILED_MESSAGE, RETRY_QUEUED_MESSAGE};
use call_intel_lib::services::{
    AddRecordingRequest, AnalysisDispatch, EventBroadcaster, RecordStore, RecordingInput,
};
use uuid::Uuid;

use super::test_helpers::*;

struct Seeded {
    user: CurrentUser,
    recording_id: Uuid,
    analysis_id: Uuid,
}

/// One transcript recording whose analysis holds `status`.
async fn seed(store: &MemoryStore, status: &str) -> Seeded {
    let user = test_user();
    let recording = store
        .insert_recording(NewRecording {
            user_id: user.id,
            lead_id: None,
            file_name: "Quarterly review".to_string(),
            file_size: None,
            stored_file_url: None,
            storage_path: None,
            transcript: Some("Rep: thanks for joining".to_string()),
        })
        .await
        .expect("recording");
    let analysis = store
        .insert_analysis(NewAnalysis {
            recording_id: recording.id,
            user_id: user.id,
        })
        .await
        .expect("analysis");
    store.force_status(analysis.id, status);

    Seeded {
        user,
        recording_id: recording.id,
        analysis_id: analysis.id,
    }
}

/// The pipeline sees `processing` while the resend is in flight; a 500 puts it back.
#[actix_rt::test]
async fn test_retry_marks_processing_then_reverts_on_server_error() {
    let store = Arc::new(MemoryStore::new());
    let seeded = seed(&store, "failed").await;
    let dispatch = Arc::new(RecordingDispatch::answering(Some(500), store.clone()));
    let events = EventBroadcaster::new();
    let mut rx = events.subscribe();
    let reconciler = reconciler(store.clone(), dispatch.clone(), events);

    let err = reconciler
        .retry(&seeded.user, seeded.recording_id)
        .await
        .expect_err("a 500 should fail the retry");

    match err {
        AppError::Upstream(message) => assert_eq!(message, RETRY_FAILED_MESSAGE),
        other => panic!("expected Upstream, got {:?}", other),
    }
    assert_eq!(
        *dispatch.status_during_resend.lock().unwrap(),
        vec![Some("processing".to_string())]
    );
    assert_eq!(
        store.analysis_status(seeded.analysis_id).as_deref(),
        Some("failed")
    );

    let first = rx.recv().await.expect("processing event").event;
    let second = rx.recv().await.expect("failed event").event;
    assert_eq!(
        first,
        DashboardEvent::analysis_updated(seeded.recording_id, seeded.analysis_id, "processing")
    );
    assert_eq!(
        second,
        DashboardEvent::analysis_updated(seeded.recording_id, seeded.analysis_id, "failed")
    );
}

#[actix_rt::test]
async fn test_retry_reverts_on_transport_error() {
    let store = Arc::new(MemoryStore::new());
    let seeded = seed(&store, "failed").await;
    let dispatch = Arc::new(RecordingDispatch::answering(None, store.clone()));
    let reconciler = reconciler(store.clone(), dispatch, EventBroadcaster::new());

    let err = reconciler
        .retry(&seeded.user, seeded.recording_id)
        .await
        .expect_err("unreachable pipeline should fail the retry");

    assert!(matches!(err, AppError::Upstream(_)));
    assert_eq!(
        store.analysis_status(seeded.analysis_id).as_deref(),
        Some("failed")
    );
}

#[actix_rt::test]
async fn test_successful_retry_leaves_processing() {
    let store = Arc::new(MemoryStore::new());
    let seeded = seed(&store, "ERROR").await;
    let dispatch = Arc::new(RecordingDispatch::answering(Some(202), store.clone()));
    let reconciler = reconciler(store.clone(), dispatch.clone(), EventBroadcaster::new());

    let outcome = reconciler
        .retry(&seeded.user, seeded.recording_id)
        .await
        .expect("retry should succeed");

    assert_eq!(outcome.message, RETRY_QUEUED_MESSAGE);
    assert_eq!(outcome.analysis_id, seeded.analysis_id);
    assert_eq!(
        store.analysis_status(seeded.analysis_id).as_deref(),
        Some("processing")
    );

    let resent = dispatch.resent.lock().unwrap().clone();
    assert_eq!(resent.len(), 1);
    assert_eq!(resent[0].analysis_id, Some(seeded.analysis_id));
    assert_eq!(resent[0].recording_name, "Quarterly review");
    assert_eq!(resent[0].transcript.as_deref(), Some("Rep: thanks for joining"));
    assert!(resent[0].recording_url.is_none());
}

/// Only failed analyses can be retried.
#[actix_rt::test]
async fn test_retry_rejected_unless_failed() {
    for status in ["pending", "processing", "completed"] {
        let store = Arc::new(MemoryStore::new());
        let seeded = seed(&store, status).await;
        let dispatch = Arc::new(RecordingDispatch::answering(Some(200), store.clone()));
        let reconciler = reconciler(store.clone(), dispatch.clone(), EventBroadcaster::new());

        let err = reconciler
            .retry(&seeded.user, seeded.recording_id)
            .await
            .expect_err("non-failed status should be rejected");

        assert!(matches!(err, AppError::InvalidInput(_)), "{}: {:?}", status, err);
        assert!(dispatch.resent.lock().unwrap().is_empty());
        assert_eq!(
            store.analysis_status(seeded.analysis_id).as_deref(),
            Some(status)
        );
    }
}

/// A recording whose analysis was never created reads as queued and cannot be retried.
#[actix_rt::test]
async fn test_retry_rejected_without_analysis() {
    let store = Arc::new(MemoryStore::new());
    store.fail_analysis_insert.store(true, Ordering::SeqCst);
    let dispatch = Arc::new(RecordingDispatch::answering(Some(200), store.clone()));
    let user = test_user();
    let outcome = ingestion(
        store.clone(),
        Arc::new(MemoryObjects::new()),
        dispatch.clone(),
        EventBroadcaster::new(),
    )
    .add_recording(
        &user,
        AddRecordingRequest {
            name: "Pricing follow-up".to_string(),
            input: RecordingInput::Transcript("Rep: about the quote".to_string()),
            lead_id: None,
        },
    )
    .await
    .expect("submission succeeds without an analysis");
    let reconciler = reconciler(store.clone(), dispatch.clone(), EventBroadcaster::new());

    let view = reconciler
        .status_of(&user, outcome.recording.id)
        .await
        .expect("view");
    assert_eq!(view.phase, StatusPhase::Queued);
    assert!(!view.can_retry);

    let err = reconciler
        .retry(&user, outcome.recording.id)
        .await
        .expect_err("no analysis means nothing to retry");

    match err {
        AppError::InvalidInput(message) => assert!(message.contains("Queued"), "{}", message),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
    assert_eq!(dispatch.submitted().len(), 1);
    assert!(dispatch.resent.lock().unwrap().is_empty());
    assert_eq!(store.analysis_count(), 0);
}

#[actix_rt::test]
async fn test_retry_unknown_recording_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let seeded = seed(&store, "failed").await;
    let dispatch: Arc<dyn AnalysisDispatch> = Arc::new(RecordingDispatch::new());
    let reconciler = reconciler(store.clone(), dispatch, EventBroadcaster::new());

    // Another user's recording is invisible
    let err = reconciler
        .retry(&test_user(), seeded.recording_id)
        .await
        .expect_err("foreign recording");
    assert!(matches!(err, AppError::NotFound(_)));

    let err = reconciler
        .retry(&seeded.user, Uuid::new_v4())
        .await
        .expect_err("unknown recording");
    assert!(matches!(err, AppError::NotFound(_)));
}

/// The status view reflects whatever the pipeline last wrote.
#[actix_rt::test]
async fn test_snapshot_derives_labels_from_raw_status() {
    let store = Arc::new(MemoryStore::new());
    let seeded = seed(&store, "Transcribing").await;
    let reconciler = reconciler(
        store.clone(),
        Arc::new(RecordingDispatch::new()),
        EventBroadcaster::new(),
    );

    let view = reconciler
        .status_of(&seeded.user, seeded.recording_id)
        .await
        .expect("view");
    assert_eq!(view.phase, StatusPhase::Transcribing);
    assert!(!view.can_retry);

    store.force_status(seeded.analysis_id, "failed");
    let views = reconciler.snapshot(&seeded.user, None).await.expect("views");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].status_label, "Failed");
    assert!(views[0].can_retry);

    store.remove_analysis(seeded.analysis_id);
    let view = reconciler
        .status_of(&seeded.user, seeded.recording_id)
        .await
        .expect("view");
    assert_eq!(view.phase, StatusPhase::Queued);
    assert!(view.analysis.is_none());
    assert!(!view.can_retry);
}
