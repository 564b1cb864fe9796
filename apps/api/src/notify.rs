//! Take-down notification collaborator.
//!
//! When resolving a content complaint pushes a target past the configured
//! threshold of upheld reports, the moderation engine hands the target off
//! here on a spawned task. Delivery failures are logged, never surfaced to
//! the resolving request.
//!
//! Carried in `AppState` as `Arc<dyn TakedownNotifier>`.

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

/// A take-down notification for a content target that crossed the
/// upheld-report threshold.
#[derive(Debug, Clone)]
pub struct TakedownNotice {
    pub target_type: String,
    pub target_id: String,
    pub upheld_count: i64,
}

#[async_trait]
pub trait TakedownNotifier: Send + Sync {
    /// Delivers the notice. Errors are handled internally; callers dispatch
    /// from a spawned task and never observe delivery failures.
    async fn notify(&self, notice: TakedownNotice);
}

/// Posts notices to an external webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl TakedownNotifier for WebhookNotifier {
    async fn notify(&self, notice: TakedownNotice) {
        let body = json!({
            "target_type": notice.target_type,
            "target_id": notice.target_id,
            "upheld_count": notice.upheld_count,
        });
        match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    "Take-down notice delivered for {} {}",
                    notice.target_type, notice.target_id
                );
            }
            Ok(resp) => {
                error!("Take-down webhook returned {}", resp.status());
            }
            Err(e) => {
                error!("Take-down webhook failed: {e}");
            }
        }
    }
}

/// Notifier used when no webhook endpoint is configured. Logs and drops.
pub struct NoopNotifier;

#[async_trait]
impl TakedownNotifier for NoopNotifier {
    async fn notify(&self, notice: TakedownNotice) {
        info!(
            "Take-down threshold reached for {} {} ({} upheld) — no webhook configured",
            notice.target_type, notice.target_id, notice.upheld_count
        );
    }
}
