//! Webhook transports against a mock pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use call_intel_lib::config::WebhookSettings;
use call_intel_lib::services::notifier::{
    DeliveryOutcome, DetachedTransport, FireAndForgetTransport, NotifyError, StandardTransport,
};
use call_intel_lib::services::{
    AnalysisDispatch, Notifier, NotifyTransport, TransportReceipt, WebhookPayload,
};
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const HOOK_PATH: &str = "/webhook/call-analysis";

fn payload() -> WebhookPayload {
    WebhookPayload {
        recording_id: Uuid::new_v4(),
        analysis_id: Some(Uuid::new_v4()),
        recording_name: "Sales Call - John Doe".to_string(),
        recording_url: Some("http://objects.test/recordings/call.mp3".to_string()),
        transcript: None,
    }
}

fn hook_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), HOOK_PATH)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client")
}

/// A transport that always fails to connect.
struct Unreachable;

#[async_trait]
impl NotifyTransport for Unreachable {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn send(&self, _url: &str, _body: &str) -> Result<TransportReceipt, NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

/// Wait for a background request to land.
async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<Request> {
    for _ in 0..100 {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= count {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    server.received_requests().await.unwrap_or_default()
}

#[actix_rt::test]
async fn test_standard_transport_sends_json_headers_and_body() {
    let server = MockServer::start().await;
    let payload = payload();
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(serde_json::json!({
            "recording_id": payload.recording_id,
            "analysis_id": payload.analysis_id,
            "recording_name": "Sales Call - John Doe",
            "recording_url": "http://objects.test/recordings/call.mp3",
            "transcript": null,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"queued\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let body = serde_json::to_string(&payload).expect("encode");
    let receipt = StandardTransport::new(client())
        .send(&hook_url(&server), &body)
        .await
        .expect("send");

    assert_eq!(receipt, TransportReceipt::Delivered { status: 200 });
    assert!(receipt.is_accepted());
}

/// A 500 still counts as delivered, so no fallback tier fires.
#[actix_rt::test]
async fn test_server_error_does_not_trigger_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::from_settings(&WebhookSettings {
        url: hook_url(&server),
        timeout_secs: 5,
    })
    .expect("notifier");

    let outcome = notifier.deliver(&payload()).await;

    assert_eq!(
        outcome,
        DeliveryOutcome::Submitted {
            transport: "standard",
            receipt: TransportReceipt::Delivered { status: 500 },
        }
    );
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
}

#[actix_rt::test]
async fn test_fire_and_forget_tier_used_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let notifier = Notifier::new(
        hook_url(&server),
        vec![
            Arc::new(Unreachable),
            Arc::new(FireAndForgetTransport::new(client())),
        ],
    );

    let outcome = notifier.deliver(&payload()).await;

    assert_eq!(
        outcome,
        DeliveryOutcome::Submitted {
            transport: "fire_and_forget",
            receipt: TransportReceipt::Sent,
        }
    );

    let received = server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_ne!(
        received[0].headers.get("accept").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
}

/// The detached tier reports success once its task is spawned.
#[actix_rt::test]
async fn test_detached_tier_dispatches_in_background() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let notifier = Notifier::new(
        hook_url(&server),
        vec![
            Arc::new(Unreachable),
            Arc::new(Unreachable),
            Arc::new(DetachedTransport::new(Duration::from_secs(5))),
        ],
    );

    let outcome = notifier.deliver(&payload()).await;
    assert_eq!(
        outcome,
        DeliveryOutcome::Submitted {
            transport: "detached",
            receipt: TransportReceipt::Sent,
        }
    );

    let received = wait_for_requests(&server, 1).await;
    assert_eq!(received.len(), 1);
}

/// `submit` returns immediately and delivers in the background.
#[actix_rt::test]
async fn test_submit_delivers_without_blocking() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = Notifier::from_settings(&WebhookSettings {
        url: hook_url(&server),
        timeout_secs: 5,
    })
    .expect("notifier");

    notifier.submit(payload());

    let received = wait_for_requests(&server, 1).await;
    assert_eq!(received.len(), 1);
}

/// Retry resends reflect the pipeline's answer.
#[actix_rt::test]
async fn test_resend_reports_status() {
    let accepted = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&accepted)
        .await;
    let rejected = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&rejected)
        .await;

    let settings = |url: String| WebhookSettings {
        url,
        timeout_secs: 5,
    };

    let ok = Notifier::from_settings(&settings(hook_url(&accepted)))
        .expect("notifier")
        .resend(&payload())
        .await
        .expect("receipt");
    assert!(ok.is_accepted());

    let not_ok = Notifier::from_settings(&settings(hook_url(&rejected)))
        .expect("notifier")
        .resend(&payload())
        .await
        .expect("receipt");
    assert_eq!(not_ok, TransportReceipt::Delivered { status: 503 });
    assert!(!not_ok.is_accepted());
}
