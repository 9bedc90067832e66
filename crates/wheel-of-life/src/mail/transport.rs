use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

use super::composer::MailMessage;
use crate::config::{MailConfig, SenderIdentity};

/// Outbound delivery seam. Implementations make exactly one attempt per call.
#[async_trait]
pub trait MailTransport: Debug + Send + Sync {
    async fn deliver(
        &self,
        sender: SenderIdentity<'_>,
        message: &MailMessage,
    ) -> Result<(), DeliveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("sender address '{0}' is not a valid mailbox")]
    Sender(String),
    #[error("unable to build message: {0}")]
    Message(String),
    #[error("smtp transport failed: {0}")]
    Transport(String),
    #[error("delivery timed out after {0:?}")]
    TimedOut(Duration),
}

const SUBMISSIONS_PORT: u16 = 465;

/// SMTP relay transport. Port 465 uses implicit TLS, any other port STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpMailTransport {
    host: String,
    port: u16,
}

impl SmtpMailTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.smtp_host.clone(), config.smtp_port)
    }

    fn mailer(
        &self,
        sender: SenderIdentity<'_>,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let builder = if self.port == SUBMISSIONS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
        }
        .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let credentials = Credentials::new(
            sender.account.to_string(),
            sender.credential.expose_secret().to_string(),
        );

        Ok(builder.port(self.port).credentials(credentials).build())
    }
}

pub(crate) fn build_message(
    sender: SenderIdentity<'_>,
    message: &MailMessage,
) -> Result<Message, DeliveryError> {
    let from_address = sender
        .account
        .parse()
        .map_err(|_| DeliveryError::Sender(sender.account.to_string()))?;
    let from = Mailbox::new(Some(sender.display_name.to_string()), from_address);
    let to = Mailbox::new(message.recipient_name.clone(), message.recipient.clone());

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))
        .map_err(|err| DeliveryError::Message(err.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(
        &self,
        sender: SenderIdentity<'_>,
        message: &MailMessage,
    ) -> Result<(), DeliveryError> {
        let email = build_message(sender, message)?;
        let mailer = self.mailer(sender)?;

        let response = mailer
            .send(email)
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        debug!(code = %response.code(), host = %self.host, "smtp relay accepted message");
        Ok(())
    }
}
