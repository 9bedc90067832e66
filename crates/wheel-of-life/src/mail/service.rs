use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::composer::{compose, HIGHLIGHT_COUNT};
use super::request::{SendResultsRequest, ValidationError};
use super::transport::{DeliveryError, MailTransport};
use crate::assessment::{score, Category};
use crate::config::{MailConfig, MailNotConfigured};

/// Scores an assessment and emails the highlights, one delivery attempt per call.
#[derive(Debug)]
pub struct ResultsMailer<T> {
    config: MailConfig,
    transport: Arc<T>,
}

impl<T> ResultsMailer<T>
where
    T: MailTransport + 'static,
{
    pub fn new(config: MailConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Validate, check sender configuration, score, compose, deliver.
    ///
    /// Validation and configuration failures return before the transport is touched.
    pub async fn send(
        &self,
        request: SendResultsRequest,
    ) -> Result<MailReceipt, MailDispatchError> {
        let request = request.validate().inspect_err(|err| {
            warn!(error = %err, "rejected results email request");
        })?;

        let sender = self.config.sender().inspect_err(|err| {
            warn!(error = %err, "results email requested but mail is not configured");
        })?;

        let result = score(&request.assessment);
        let message = compose(&result, &request.recipient, request.name.as_deref());

        let attempt = self.transport.deliver(sender, &message);
        let delivered = match self.config.send_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .unwrap_or(Err(DeliveryError::TimedOut(limit))),
            None => attempt.await,
        };

        if let Err(err) = delivered {
            error!(recipient = %request.recipient, error = %err, "results email delivery failed");
            return Err(err.into());
        }

        info!(
            recipient = %request.recipient,
            updates_opt_in = request.updates,
            "results email sent"
        );

        Ok(MailReceipt {
            recipient: request.recipient.to_string(),
            subject: message.subject,
            top_categories: result
                .top(HIGHLIGHT_COUNT)
                .iter()
                .map(|entry| entry.category)
                .collect(),
            sent_at: Utc::now(),
        })
    }
}

/// Confirmation returned after the transport accepted a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailReceipt {
    pub recipient: String,
    pub subject: String,
    pub top_categories: Vec<Category>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum MailDispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotConfigured(#[from] MailNotConfigured),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
