//! Registration notifications posted to a chat webhook

use async_trait::async_trait;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

use crate::{
    config::{NotifyConfig, WebhookPayload},
    error::{AppError, AppResult},
    models::{EquipmentRecord, Submitter},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> AppResult<()>;
}

/// Posts messages as JSON to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    payload: WebhookPayload,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, payload: WebhookPayload, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build webhook client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            payload,
        })
    }

    fn body(&self, message: &str) -> serde_json::Value {
        match self.payload {
            WebhookPayload::Content => json!({ "content": message }),
            WebhookPayload::Message => json!({ "message": message }),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.body(message))
            .send()
            .await
            .map_err(|e| AppError::Notify(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Webhook responded with {}", status);
        if !status.is_success() {
            return Err(AppError::Notify(format!("Webhook returned {}", status)));
        }
        Ok(())
    }
}

/// Used when no webhook is configured
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, message: &str) -> AppResult<()> {
        tracing::info!("No webhook configured, dropping notification: {}", message);
        Ok(())
    }
}

pub fn from_config(config: &NotifyConfig) -> AppResult<Arc<dyn Notifier>> {
    match config.webhook_url.as_deref().filter(|url| !url.trim().is_empty()) {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(
            url,
            config.payload,
            Duration::from_secs(config.timeout_secs),
        )?)),
        None => Ok(Arc::new(NoopNotifier)),
    }
}

/// Human-readable announcement of a new record
pub fn registration_message(submitter: &Submitter, record: &EquipmentRecord) -> String {
    format!(
        "New equipment registered!\nRegistered by: {}\nEquipment ID: {}\nName: {}\nDetails: {}",
        submitter.label(),
        record.id,
        record.name,
        record.details
    )
}

/// Send a notification in the background. Failures are logged, never returned.
pub fn spawn_notification(notifier: Arc<dyn Notifier>, message: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.notify(&message).await {
            Ok(()) => tracing::debug!("Notification sent"),
            Err(e) => tracing::warn!("Notification failed: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use chrono::Utc;
    use tokio::sync::Mutex;

    type Received = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn webhook_server(status: StatusCode) -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route(
                "/hook",
                post(
                    move |State(received): State<Received>, Json(body): Json<serde_json::Value>| async move {
                        received.lock().await.push(body);
                        status
                    },
                ),
            )
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/hook", addr), received)
    }

    fn record() -> EquipmentRecord {
        EquipmentRecord {
            id: 6,
            name: "Drill".to_string(),
            details: "18V cordless".to_string(),
            qr_image: String::new(),
            photo_url: String::new(),
            created_at: Utc::now(),
            submitter_email: "user@example.com".to_string(),
        }
    }

    #[test]
    fn test_message_format() {
        let submitter = Submitter::new("user@example.com", Some("Taro".to_string()));
        assert_eq!(
            registration_message(&submitter, &record()),
            "New equipment registered!\nRegistered by: Taro\nEquipment ID: 6\nName: Drill\nDetails: 18V cordless"
        );

        let anonymous = Submitter::new("user@example.com", None);
        assert!(registration_message(&anonymous, &record()).contains("Registered by: user@example.com"));
    }

    #[tokio::test]
    async fn test_webhook_payload_shapes() {
        let (url, received) = webhook_server(StatusCode::NO_CONTENT).await;

        WebhookNotifier::new(&url, WebhookPayload::Content, Duration::from_secs(5))
            .unwrap()
            .notify("hello")
            .await
            .unwrap();
        WebhookNotifier::new(&url, WebhookPayload::Message, Duration::from_secs(5))
            .unwrap()
            .notify("hello")
            .await
            .unwrap();

        let received = received.lock().await;
        assert_eq!(received[0], json!({ "content": "hello" }));
        assert_eq!(received[1], json!({ "message": "hello" }));
    }

    #[tokio::test]
    async fn test_webhook_error_status() {
        let (url, _) = webhook_server(StatusCode::INTERNAL_SERVER_ERROR).await;
        let notifier = WebhookNotifier::new(&url, WebhookPayload::Content, Duration::from_secs(5)).unwrap();
        assert!(matches!(notifier.notify("hello").await, Err(AppError::Notify(_))));
    }

    #[tokio::test]
    async fn test_spawned_failure_is_swallowed() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_| Err(AppError::Notify("down".to_string())));

        let handle = spawn_notification(Arc::new(notifier), "hello".to_string());
        assert!(handle.await.is_ok());
    }

    #[test]
    fn test_from_config_without_url_is_noop() {
        assert!(from_config(&NotifyConfig::default()).is_ok());
    }
}
