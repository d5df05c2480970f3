//! Best-effort delivery of analysis jobs to the external pipeline webhook.
//!
//! A submission walks an ordered list of transports and stops at the first
//! one that reports the request as submitted. Outcomes are logged, never
//! returned to the user, and never retried beyond the list.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::WebhookSettings;

/// JSON body posted to the pipeline. Absent values are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub recording_id: Uuid,
    pub analysis_id: Option<Uuid>,
    pub recording_name: String,
    pub recording_url: Option<String>,
    pub transcript: Option<String>,
}

/// Transport-level failure.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No transport configured")]
    NoTransport,
}

/// What a transport can say about a request it handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportReceipt {
    /// A response came back with this status.
    Delivered { status: u16 },
    /// The request left; the response was not observed.
    Sent,
}

impl TransportReceipt {
    /// Whether the pipeline is known or assumed to have accepted the request.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::Delivered { status } => (200..300).contains(status),
            Self::Sent => true,
        }
    }
}

/// One way of getting a payload to the endpoint.
#[async_trait]
pub trait NotifyTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, url: &str, body: &str) -> Result<TransportReceipt, NotifyError>;
}

/// Standard request that waits for and reads the response.
///
/// A non-2xx status is logged but still counts as delivered.
pub struct StandardTransport {
    client: reqwest::Client,
}

impl StandardTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotifyTransport for StandardTransport {
    fn name(&self) -> &'static str {
        "standard"
    }

    async fn send(&self, url: &str, body: &str) -> Result<TransportReceipt, NotifyError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if status.is_success() {
            debug!("Webhook responded {}: {}", status.as_u16(), text);
        } else {
            warn!(
                "Webhook returned {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
        }

        Ok(TransportReceipt::Delivered {
            status: status.as_u16(),
        })
    }
}

/// Sends without `Accept` and ignores the response.
pub struct FireAndForgetTransport {
    client: reqwest::Client,
}

impl FireAndForgetTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotifyTransport for FireAndForgetTransport {
    fn name(&self) -> &'static str {
        "fire_and_forget"
    }

    async fn send(&self, url: &str, body: &str) -> Result<TransportReceipt, NotifyError> {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(TransportReceipt::Sent)
    }
}

/// Last resort: a fresh HTTP/1.1 connection driven by a detached task.
///
/// Reports success as soon as the task is spawned.
pub struct DetachedTransport {
    timeout: Duration,
}

impl DetachedTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl NotifyTransport for DetachedTransport {
    fn name(&self) -> &'static str {
        "detached"
    }

    async fn send(&self, url: &str, body: &str) -> Result<TransportReceipt, NotifyError> {
        let client = reqwest::Client::builder()
            .http1_only()
            .pool_max_idle_per_host(0)
            .timeout(self.timeout)
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;

        let request = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());

        tokio::spawn(async move {
            match request.send().await {
                Ok(response) => debug!(
                    "Detached webhook dispatch answered {}",
                    response.status().as_u16()
                ),
                Err(e) => warn!("Detached webhook dispatch failed: {}", e),
            }
        });

        Ok(TransportReceipt::Sent)
    }
}

/// Result of walking the transport list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Submitted {
        transport: &'static str,
        receipt: TransportReceipt,
    },
    AllFailed,
}

/// Hands payloads to the pipeline.
#[async_trait]
pub trait AnalysisDispatch: Send + Sync {
    /// Start delivery in the background and return immediately.
    fn submit(&self, payload: WebhookPayload);

    /// Send once through the primary transport and report what came back.
    async fn resend(&self, payload: &WebhookPayload) -> Result<TransportReceipt, NotifyError>;
}

/// Webhook notifier with ordered fallback transports.
#[derive(Clone)]
pub struct Notifier {
    endpoint: String,
    transports: Vec<Arc<dyn NotifyTransport>>,
}

impl Notifier {
    pub fn new(endpoint: impl Into<String>, transports: Vec<Arc<dyn NotifyTransport>>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transports,
        }
    }

    /// Standard, then fire-and-forget, then detached.
    pub fn from_settings(settings: &WebhookSettings) -> Result<Self, NotifyError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;

        Ok(Self::new(
            settings.url.clone(),
            vec![
                Arc::new(StandardTransport::new(client.clone())),
                Arc::new(FireAndForgetTransport::new(client)),
                Arc::new(DetachedTransport::new(timeout)),
            ],
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Try each transport in order until one submits the payload.
    pub async fn deliver(&self, payload: &WebhookPayload) -> DeliveryOutcome {
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                error!(recording_id = %payload.recording_id, "Failed to encode webhook payload: {}", e);
                return DeliveryOutcome::AllFailed;
            }
        };

        for transport in &self.transports {
            match transport.send(&self.endpoint, &body).await {
                Ok(receipt) => {
                    info!(
                        recording_id = %payload.recording_id,
                        transport = transport.name(),
                        "Webhook submitted"
                    );
                    return DeliveryOutcome::Submitted {
                        transport: transport.name(),
                        receipt,
                    };
                }
                Err(e) => {
                    warn!(
                        recording_id = %payload.recording_id,
                        transport = transport.name(),
                        "Webhook attempt failed: {}",
                        e
                    );
                }
            }
        }

        error!(recording_id = %payload.recording_id, "All webhook attempts failed");
        DeliveryOutcome::AllFailed
    }
}

#[async_trait]
impl AnalysisDispatch for Notifier {
    fn submit(&self, payload: WebhookPayload) {
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier.deliver(&payload).await;
        });
    }

    async fn resend(&self, payload: &WebhookPayload) -> Result<TransportReceipt, NotifyError> {
        let transport = self.transports.first().ok_or(NotifyError::NoTransport)?;
        let body = serde_json::to_string(payload)?;
        transport.send(&self.endpoint, &body).await
    }
}
