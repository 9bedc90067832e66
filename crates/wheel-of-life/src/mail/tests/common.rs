use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::assessment::{AssessmentInput, Category, Rating};
use crate::config::{MailConfig, SenderIdentity};
use crate::mail::composer::MailMessage;
use crate::mail::request::SendResultsRequest;
use crate::mail::service::ResultsMailer;
use crate::mail::transport::{DeliveryError, MailTransport};

/// Records every delivery attempt and accepts it.
#[derive(Debug, Default)]
pub(super) struct RecordingTransport {
    attempts: Mutex<Vec<(String, MailMessage)>>,
}

impl RecordingTransport {
    pub(super) fn attempts(&self) -> Vec<(String, MailMessage)> {
        self.attempts.lock().expect("transport mutex poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(
        &self,
        sender: SenderIdentity<'_>,
        message: &MailMessage,
    ) -> Result<(), DeliveryError> {
        self.attempts
            .lock()
            .expect("transport mutex poisoned")
            .push((sender.account.to_string(), message.clone()));
        Ok(())
    }
}

/// Counts attempts and always fails.
#[derive(Debug, Default)]
pub(super) struct FailingTransport {
    attempts: Mutex<usize>,
}

impl FailingTransport {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("transport mutex poisoned")
    }
}

#[async_trait]
impl MailTransport for FailingTransport {
    async fn deliver(
        &self,
        _sender: SenderIdentity<'_>,
        _message: &MailMessage,
    ) -> Result<(), DeliveryError> {
        *self.attempts.lock().expect("transport mutex poisoned") += 1;
        Err(DeliveryError::Transport("550 mailbox unavailable".to_string()))
    }
}

/// Never finishes within any reasonable deadline.
#[derive(Debug, Default)]
pub(super) struct StalledTransport;

#[async_trait]
impl MailTransport for StalledTransport {
    async fn deliver(
        &self,
        _sender: SenderIdentity<'_>,
        _message: &MailMessage,
    ) -> Result<(), DeliveryError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

pub(super) fn configured_mail() -> MailConfig {
    MailConfig::default().with_sender("coach@example.com", "app-password")
}

pub(super) fn rating(value: u8) -> Rating {
    Rating::new(value).expect("valid rating")
}

pub(super) fn assessment() -> AssessmentInput {
    AssessmentInput::default()
        .with_satisfaction(Category::Health, rating(7))
        .with_motivation(Category::Health, rating(9))
        .with_satisfaction(Category::Finances, rating(2))
        .with_motivation(Category::Finances, rating(8))
}

pub(super) fn request() -> SendResultsRequest {
    SendResultsRequest::new("someone@example.com", assessment()).with_name("Avery")
}

pub(super) fn mailer_with<T>(config: MailConfig, transport: Arc<T>) -> Arc<ResultsMailer<T>>
where
    T: MailTransport + 'static,
{
    Arc::new(ResultsMailer::new(config, transport))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
